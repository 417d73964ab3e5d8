//! # Migrations
//!
//! Reshapes raw settings written by older versions into the current layout.
//!
//! Each [`Migration`] moves data exactly one version forward. [`migrate`]
//! detects where the data starts and applies every step from there, oldest
//! first, so arbitrarily old data reaches the current version through the same
//! chain. Steps only rename and restructure; filling in defaults is the
//! resolver's job.
//!
//! Steps must be total. Whatever a step receives, it returns syntactically
//! valid data for the next version, even if that means dropping what it
//! could not interpret.
//!
//! Migrations are not idempotent on their own. They are only ever applied to
//! data whose detected version is below [`SchemaVersion::CURRENT`], which makes
//! [`migrate`] a no-op on current data.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::schema::SchemaVersion;

/// One step of the migration chain.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from: SchemaVersion,
    pub to: SchemaVersion,
    pub description: &'static str,
    pub step: fn(Value) -> Value,
}

impl Migration {
    pub fn apply(&self, raw: Value) -> Value {
        (self.step)(raw)
    }
}

/// The step that takes data out of `version`, if it is not already current.
pub fn migration_from(version: SchemaVersion) -> Option<Migration> {
    match version {
        SchemaVersion::Legacy => Some(Migration {
            from: SchemaVersion::Legacy,
            to: SchemaVersion::V2,
            description: "Tag legacy settings as version 2 and nest flat preferences",
            step: legacy_to_v2,
        }),
        SchemaVersion::V2 => None,
    }
}

/// The whole chain, oldest first.
pub fn migrations() -> Vec<Migration> {
    SchemaVersion::ALL
        .iter()
        .filter_map(|v| migration_from(*v))
        .collect()
}

/// Bring `raw` up to the current version.
pub fn migrate(raw: Value) -> Value {
    let version = SchemaVersion::detect(&raw);
    migrate_from(raw, version)
}

/// Run the chain starting at an already known `version`.
pub fn migrate_from(mut raw: Value, version: SchemaVersion) -> Value {
    if version.is_current() {
        return raw;
    }

    info!(
        from = version.number(),
        to = SchemaVersion::CURRENT.number(),
        "migrating settings"
    );

    let mut current = version;
    while let Some(migration) = migration_from(current) {
        debug!(
            from = migration.from.number(),
            to = migration.to.number(),
            "{}",
            migration.description
        );
        raw = migration.apply(raw);
        current = migration.to;
    }
    raw
}

/// Preference keys that legacy files may carry at the top level.
const FLAT_PREFERENCE_KEYS: [&str; 4] = [
    "projectViewLimit",
    "projectSizeLimit",
    "frontmatter",
    "commands",
];

fn legacy_to_v2(raw: Value) -> Value {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => {
            debug!(kind = value_kind(&other), "legacy settings are not an object, discarding");
            Map::new()
        }
    };

    let mut preferences = match fields.remove("preferences") {
        Some(Value::Object(prefs)) => prefs,
        _ => Map::new(),
    };
    for key in FLAT_PREFERENCE_KEYS {
        if let Some(value) = fields.remove(key) {
            preferences.entry(key).or_insert(value);
        }
    }

    fields.insert("preferences".to_string(), Value::Object(preferences));
    fields.insert(
        "version".to_string(),
        Value::from(SchemaVersion::V2.number()),
    );
    Value::Object(fields)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
