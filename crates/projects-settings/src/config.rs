//! # Store Configuration
//!
//! Where [`crate::store::fs_backend::FsBackend`] keeps the settings file.
//!
//! | Key         | Default     | Description                                |
//! |-------------|-------------|--------------------------------------------|
//! | `data_dir`  | `.`         | Directory holding the settings file        |
//! | `file_name` | `data.json` | Settings file name inside `data_dir`       |
//! | `pretty`    | `true`      | Write indented JSON instead of one line    |
//!
//! The config itself is serde-friendly so hosts can embed it in their own
//! configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "data.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            pretty: true,
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Full path of the settings file.
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}
