//! # Schema Registry
//!
//! The closed set of settings layouts this crate knows how to read.
//!
//! | Version | Tag on disk        | Notes                                      |
//! |---------|--------------------|--------------------------------------------|
//! | 1       | no `version` field | Legacy layout, only ever migrated forward. |
//! | 2       | `"version": 2`     | Current. Defaults live on the model types. |
//!
//! Adding a version means adding a [`SchemaVersion`] variant, its [`Schema`]
//! entry and one migration step in [`crate::migrate`]. Every dispatch on the
//! version is an exhaustive `match`, so the compiler points at each place that
//! needs the new arm.

use serde_json::Value;
use tracing::debug;

use crate::model::SettingsDocument;
use crate::raw::RawObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    Legacy,
    V2,
}

impl SchemaVersion {
    pub const CURRENT: SchemaVersion = SchemaVersion::V2;

    /// Oldest first.
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::Legacy, SchemaVersion::V2];

    pub fn number(self) -> u32 {
        match self {
            SchemaVersion::Legacy => 1,
            SchemaVersion::V2 => 2,
        }
    }

    pub fn from_number(number: u64) -> Option<Self> {
        match number {
            1 => Some(SchemaVersion::Legacy),
            2 => Some(SchemaVersion::V2),
            _ => None,
        }
    }

    /// The version a migration step out of `self` produces.
    pub fn next(self) -> Option<Self> {
        match self {
            SchemaVersion::Legacy => Some(SchemaVersion::V2),
            SchemaVersion::V2 => None,
        }
    }

    pub fn is_current(self) -> bool {
        self == Self::CURRENT
    }

    /// Work out which layout `raw` is in.
    ///
    /// Only a `version` tag naming a known version is trusted. A missing tag,
    /// a tag of the wrong type, or a number nobody has defined all mean
    /// legacy data.
    pub fn detect(raw: &Value) -> Self {
        let obj = RawObject::of(raw);
        let Some(tag) = obj.get("version") else {
            return SchemaVersion::Legacy;
        };
        match obj.count("version").and_then(Self::from_number) {
            Some(version) => version,
            None => {
                debug!(tag = %tag, "unrecognized settings version, treating as legacy");
                SchemaVersion::Legacy
            }
        }
    }
}

/// Static description of one schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub version: SchemaVersion,
    pub description: &'static str,
    /// Top-level keys this version persists.
    pub keys: &'static [&'static str],
}

pub fn schema(version: SchemaVersion) -> Schema {
    match version {
        SchemaVersion::Legacy => Schema {
            version,
            description: "Unversioned layout written before settings carried a version tag",
            keys: &["projects", "preferences"],
        },
        SchemaVersion::V2 => Schema {
            version,
            description: "Versioned document with projects and preferences",
            keys: &["version", "projects", "preferences"],
        },
    }
}

/// All known schemas, oldest first.
pub fn schemas() -> Vec<Schema> {
    SchemaVersion::ALL.iter().copied().map(schema).collect()
}

/// A fully defaulted document at the current version.
pub fn defaults() -> SettingsDocument {
    SettingsDocument::default()
}
