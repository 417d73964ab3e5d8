//! # Settings Model
//!
//! Typed form of the persisted settings document. Everything here is what the
//! resolver *produces*; nothing here is tolerant of bad input. To turn untyped
//! data into these types use [`crate::resolve::resolve`].
//!
//! ## Wire Format
//!
//! Field names are camelCase on disk, matching the version 2 layout:
//!
//! ```text
//! { "version": 2,
//!   "projects": [ { "id", "name", "fieldConfig", "defaultName", "templates",
//!                   "excludedNotes", "isDefault", "dataSource": { "kind", "config" },
//!                   "newNotesFolder", "views": [ { "id", "name", "type", "config" } ] } ],
//!   "preferences": { "projectViewLimit", "projectSizeLimit",
//!                    "frontmatter": { "quoteStrings" },
//!                    "commands": [ { "project", "view"? } ] } }
//! ```
//!
//! ## Defaults
//!
//! Every type implements [`Default`] with the values a missing field resolves
//! to. These impls are the current schema's default table; see
//! [`crate::schema`] for the version registry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::schema::SchemaVersion;

pub type ProjectId = String;
pub type ViewId = String;

/// Per-field type descriptor, kept as an opaque JSON object.
pub type FieldDescriptor = Map<String, Value>;

/// Field name to descriptor. Ordering carries no meaning, so a sorted map keeps
/// serialization stable.
pub type FieldConfig = BTreeMap<String, FieldDescriptor>;

pub const DEFAULT_PROJECT_VIEW_LIMIT: u64 = 300;
pub const DEFAULT_PROJECT_SIZE_LIMIT: u64 = 1000;
pub const DEFAULT_VIEW_TYPE: &str = "table";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    pub version: u32,
    pub projects: Vec<Project>,
    pub preferences: Preferences,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            version: SchemaVersion::CURRENT.number(),
            projects: Vec::new(),
            preferences: Preferences::default(),
        }
    }
}

impl SettingsDocument {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// The project flagged as default, if any.
    pub fn default_project(&self) -> Option<&Project> {
        self.projects.iter().find(|p| p.is_default)
    }

    /// Copy of this document with `preferences` replaced.
    pub fn with_preferences(&self, preferences: Preferences) -> Self {
        Self {
            preferences,
            ..self.clone()
        }
    }

    /// Serialize to the untyped tree persisted on disk.
    pub fn to_raw(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub field_config: FieldConfig,
    /// Template for the names of new notes.
    pub default_name: String,
    pub templates: Vec<String>,
    /// Path patterns, unique, in first-seen order.
    pub excluded_notes: Vec<String>,
    pub is_default: bool,
    pub data_source: DataSource,
    pub new_notes_folder: String,
    pub views: Vec<View>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            field_config: FieldConfig::new(),
            default_name: String::new(),
            templates: Vec::new(),
            excluded_notes: Vec::new(),
            is_default: false,
            data_source: DataSource::default(),
            new_notes_folder: String::new(),
            views: Vec::new(),
        }
    }
}

impl Project {
    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }
}

/// Where a project's notes come from.
///
/// Serialized as `{ "kind": "...", "config": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "config", rename_all = "lowercase")]
pub enum DataSource {
    Folder(FolderConfig),
    Tag(TagConfig),
    Dataview(DataviewConfig),
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Folder(FolderConfig::default())
    }
}

impl DataSource {
    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::Folder(_) => "folder",
            DataSource::Tag(_) => "tag",
            DataSource::Dataview(_) => "dataview",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderConfig {
    pub path: String,
    pub recursive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagConfig {
    pub tag: String,
    /// Also match nested tags (`#work` matches `#work/meetings`).
    pub hierarchy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataviewConfig {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: ViewId,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: String,
    /// View-type specific configuration, passed through untouched.
    pub config: Map<String, Value>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            view_type: DEFAULT_VIEW_TYPE.to_string(),
            config: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub project_view_limit: u64,
    pub project_size_limit: u64,
    pub frontmatter: Frontmatter,
    pub commands: Vec<Command>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            project_view_limit: DEFAULT_PROJECT_VIEW_LIMIT,
            project_size_limit: DEFAULT_PROJECT_SIZE_LIMIT,
            frontmatter: Frontmatter::default(),
            commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub quote_strings: QuoteStrings,
}

/// How string values are quoted when writing front matter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStrings {
    /// Quote only when needed.
    #[default]
    Plain,
    /// Always double-quote.
    QuoteDouble,
}

impl QuoteStrings {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStrings::Plain => "PLAIN",
            QuoteStrings::QuoteDouble => "QUOTE_DOUBLE",
        }
    }

    /// Parse the persisted name. Anything else is unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PLAIN" => Some(QuoteStrings::Plain),
            "QUOTE_DOUBLE" => Some(QuoteStrings::QuoteDouble),
            _ => None,
        }
    }
}

/// A project, or one of its views, exposed as an invocable command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    pub project: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewId>,
}

impl Command {
    pub fn project(project: impl Into<ProjectId>) -> Self {
        Self {
            project: project.into(),
            view: None,
        }
    }

    pub fn view(project: impl Into<ProjectId>, view: impl Into<ViewId>) -> Self {
        Self {
            project: project.into(),
            view: Some(view.into()),
        }
    }

    /// Whether this command targets the project itself rather than a view.
    pub fn targets_project(&self) -> bool {
        self.view.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_document_is_current_version() {
        let doc = SettingsDocument::default();
        assert_eq!(doc.version, 2);
        assert!(doc.projects.is_empty());
        assert_eq!(doc.preferences.project_view_limit, 300);
        assert_eq!(doc.preferences.project_size_limit, 1000);
    }

    #[test]
    fn data_source_serializes_as_kind_and_config() {
        let source = DataSource::Folder(FolderConfig {
            path: "Work".to_string(),
            recursive: true,
        });
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({ "kind": "folder", "config": { "path": "Work", "recursive": true } })
        );

        let source = DataSource::Tag(TagConfig {
            tag: "#book".to_string(),
            hierarchy: false,
        });
        assert_eq!(source.kind(), "tag");
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({ "kind": "tag", "config": { "tag": "#book", "hierarchy": false } })
        );
    }

    #[test]
    fn command_without_view_omits_the_field() {
        let cmd = Command::project("foo");
        assert!(cmd.targets_project());
        assert_eq!(serde_json::to_value(&cmd).unwrap(), json!({ "project": "foo" }));

        let cmd = Command::view("foo", "board");
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({ "project": "foo", "view": "board" })
        );
    }

    #[test]
    fn quote_strings_uses_screaming_case() {
        assert_eq!(
            serde_json::to_value(QuoteStrings::QuoteDouble).unwrap(),
            json!("QUOTE_DOUBLE")
        );
        assert_eq!(QuoteStrings::parse("PLAIN"), Some(QuoteStrings::Plain));
        assert_eq!(QuoteStrings::parse("plain"), None);
        assert_eq!(QuoteStrings::QuoteDouble.as_str(), "QUOTE_DOUBLE");
    }

    #[test]
    fn view_type_is_renamed_on_the_wire() {
        let view = View {
            id: "v1".to_string(),
            name: "Board".to_string(),
            view_type: "board".to_string(),
            config: Map::new(),
        };
        let raw = serde_json::to_value(&view).unwrap();
        assert_eq!(raw["type"], json!("board"));
        assert!(raw.get("viewType").is_none());
    }

    #[test]
    fn lookups_by_id() {
        let doc = SettingsDocument {
            projects: vec![
                Project {
                    id: "a".to_string(),
                    views: vec![View {
                        id: "v".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                Project {
                    id: "b".to_string(),
                    is_default: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!(doc.project("a").and_then(|p| p.view("v")).is_some());
        assert!(doc.project("c").is_none());
        assert_eq!(doc.default_project().map(|p| p.id.as_str()), Some("b"));
    }
}
