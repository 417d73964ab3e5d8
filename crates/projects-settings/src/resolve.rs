//! # Resolver
//!
//! Turns raw, untrusted settings into a fully populated [`SettingsDocument`].
//!
//! ## Contract
//!
//! - **Total**: every input produces a document. There is no error path.
//! - **Field by field**: each field is checked on its own. A project missing
//!   `views` keeps its `name`; a bad `quoteStrings` does not reset the limits.
//! - **Recursive**: the same rules apply to every project, view and command.
//! - **Idempotent**: `resolve(resolve(x))` equals `resolve(x)`.
//!
//! Older layouts are first brought forward by [`crate::migrate`].
//!
//! ## Recovery Rules
//!
//! | Input                                    | Result                         |
//! |------------------------------------------|--------------------------------|
//! | missing field, `null`, wrong type        | field default                  |
//! | unknown enum value / data source kind    | field default                  |
//! | negative or fractional limit             | field default                  |
//! | non-object project or view               | dropped                        |
//! | command without a string `project`       | dropped                        |
//! | non-string entry in a string list        | dropped                        |
//! | repeated `excludedNotes` pattern         | first occurrence kept          |
//! | several projects with `isDefault: true`  | only the first keeps the flag  |
//! | repeated or missing project / view id    | made unique, see below         |
//! | command with an empty `view`             | targets the project            |
//!
//! ## Ids
//!
//! Project ids are unique within the document and view ids within their
//! project. The first holder of an id keeps it. A later duplicate gets the
//! first free `<id>-2`, `<id>-3`, ... and an empty id is derived from the
//! name (`"My Board"` becomes `my-board`). Output ids are never empty, so a
//! second pass finds nothing to change.
//!
//! Unknown extra fields are ignored.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::migrate::migrate_from;
use crate::model::{
    Command, DataSource, DataviewConfig, FieldConfig, FolderConfig, Frontmatter, Preferences,
    Project, QuoteStrings, SettingsDocument, TagConfig, View,
};
use crate::raw::RawObject;
use crate::schema::SchemaVersion;

/// Resolve raw settings of any shape and version into the current schema.
pub fn resolve(raw: &Value) -> SettingsDocument {
    let version = SchemaVersion::detect(raw);
    let current: Cow<'_, Value> = if version.is_current() {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(migrate_from(raw.clone(), version))
    };
    resolve_current(&current)
}

/// Resolve data already in the current layout. No migration is attempted.
pub fn resolve_current(raw: &Value) -> SettingsDocument {
    let obj = RawObject::of(raw);

    let mut projects: Vec<Project> = obj
        .list("projects")
        .unwrap_or_default()
        .iter()
        .filter_map(resolve_project)
        .collect();
    keep_single_default(&mut projects);
    assign_unique_ids(
        projects.iter_mut().map(|p| (&mut p.id, p.name.as_str())),
        "project",
    );

    SettingsDocument {
        version: SchemaVersion::CURRENT.number(),
        projects,
        preferences: resolve_preferences(obj.get("preferences").unwrap_or(&Value::Null)),
    }
}

/// Default a single project. Returns `None` for values that are not objects.
pub fn resolve_project(raw: &Value) -> Option<Project> {
    let obj = RawObject::of(raw);
    if !obj.is_object() {
        debug!("dropping project that is not an object");
        return None;
    }
    let defaults = Project::default();

    let mut views: Vec<View> = obj
        .list("views")
        .unwrap_or_default()
        .iter()
        .filter_map(resolve_view)
        .collect();
    assign_unique_ids(
        views.iter_mut().map(|v| (&mut v.id, v.name.as_str())),
        "view",
    );

    Some(Project {
        id: obj.string("id").unwrap_or(defaults.id),
        name: obj.string("name").unwrap_or(defaults.name),
        field_config: resolve_field_config(&obj),
        default_name: obj.string("defaultName").unwrap_or(defaults.default_name),
        templates: obj.strings("templates").unwrap_or(defaults.templates),
        excluded_notes: obj
            .strings("excludedNotes")
            .map(dedup)
            .unwrap_or(defaults.excluded_notes),
        is_default: obj.boolean("isDefault").unwrap_or(defaults.is_default),
        data_source: resolve_data_source(obj.get("dataSource").unwrap_or(&Value::Null)),
        new_notes_folder: obj
            .string("newNotesFolder")
            .unwrap_or(defaults.new_notes_folder),
        views,
    })
}

fn resolve_field_config(obj: &RawObject<'_>) -> FieldConfig {
    let Some(fields) = obj.map("fieldConfig") else {
        return FieldConfig::new();
    };
    fields
        .iter()
        .filter_map(|(name, descriptor)| match descriptor.as_object() {
            Some(d) => Some((name.clone(), d.clone())),
            None => {
                debug!(field = %name, "dropping field descriptor that is not an object");
                None
            }
        })
        .collect()
}

/// Default a data source. Unknown kinds fall back to the default folder source.
pub fn resolve_data_source(raw: &Value) -> DataSource {
    let obj = RawObject::of(raw);
    let config = obj.child("config");

    match obj.string("kind").as_deref() {
        Some("folder") => DataSource::Folder(FolderConfig {
            path: config.string("path").unwrap_or_default(),
            recursive: config.boolean("recursive").unwrap_or_default(),
        }),
        Some("tag") => DataSource::Tag(TagConfig {
            tag: config.string("tag").unwrap_or_default(),
            hierarchy: config.boolean("hierarchy").unwrap_or_default(),
        }),
        Some("dataview") => DataSource::Dataview(DataviewConfig {
            query: config.string("query").unwrap_or_default(),
        }),
        other => {
            if obj.is_object() {
                debug!(kind = ?other, "unrecognized data source, using default folder");
            }
            DataSource::default()
        }
    }
}

/// Default a single view. Returns `None` for values that are not objects.
pub fn resolve_view(raw: &Value) -> Option<View> {
    let obj = RawObject::of(raw);
    if !obj.is_object() {
        debug!("dropping view that is not an object");
        return None;
    }
    let defaults = View::default();

    Some(View {
        id: obj.string("id").unwrap_or(defaults.id),
        name: obj.string("name").unwrap_or(defaults.name),
        view_type: obj.string("type").unwrap_or(defaults.view_type),
        config: obj.map("config").cloned().unwrap_or(defaults.config),
    })
}

pub fn resolve_preferences(raw: &Value) -> Preferences {
    let obj = RawObject::of(raw);
    let defaults = Preferences::default();

    Preferences {
        project_view_limit: obj
            .count("projectViewLimit")
            .unwrap_or(defaults.project_view_limit),
        project_size_limit: obj
            .count("projectSizeLimit")
            .unwrap_or(defaults.project_size_limit),
        frontmatter: resolve_frontmatter(&obj.child("frontmatter")),
        commands: obj
            .list("commands")
            .unwrap_or_default()
            .iter()
            .filter_map(resolve_command)
            .collect(),
    }
}

fn resolve_frontmatter(obj: &RawObject<'_>) -> Frontmatter {
    let quote_strings = match obj.string("quoteStrings") {
        Some(name) => QuoteStrings::parse(&name).unwrap_or_else(|| {
            debug!(value = %name, "unrecognized quoteStrings, using default");
            QuoteStrings::default()
        }),
        None => QuoteStrings::default(),
    };
    Frontmatter { quote_strings }
}

/// Default a command. A command without a project cannot target anything, so
/// it is dropped. A `view` that is not a non-empty string is treated as
/// absent, making the command target the project.
pub fn resolve_command(raw: &Value) -> Option<Command> {
    let obj = RawObject::of(raw);
    let Some(project) = obj.string("project") else {
        debug!("dropping command without a project");
        return None;
    };
    Some(Command {
        project,
        view: obj.string("view").filter(|view| !view.is_empty()),
    })
}

fn keep_single_default(projects: &mut [Project]) {
    let mut seen = false;
    for project in projects.iter_mut().filter(|p| p.is_default) {
        if seen {
            debug!(project = %project.id, "clearing extra default project");
            project.is_default = false;
        }
        seen = true;
    }
}

/// Give every entry a non-empty id no earlier entry holds.
///
/// Explicit ids are claimed first, in order, so a generated id never takes an
/// id the user wrote down.
fn assign_unique_ids<'a>(
    entries: impl Iterator<Item = (&'a mut String, &'a str)>,
    fallback: &str,
) {
    let mut entries: Vec<(&mut String, &str)> = entries.collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut pending = Vec::new();

    for (index, (id, _)) in entries.iter().enumerate() {
        if id.is_empty() || !taken.insert(id.to_string()) {
            pending.push(index);
        }
    }

    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    for index in pending {
        let (id, name) = &mut entries[index];
        let base = if !id.is_empty() {
            id.to_string()
        } else {
            Some(slug(*name))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        let suffix = next_suffix.entry(base.clone()).or_insert(1);
        let mut candidate = base.clone();
        while taken.contains(&candidate) {
            *suffix += 1;
            candidate = format!("{base}-{suffix}");
        }
        taken.insert(candidate.clone());

        debug!(from = %id, to = %candidate, "assigning unique {fallback} id");
        **id = candidate;
    }
}

/// Lowercase alphanumerics joined by single dashes.
fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
