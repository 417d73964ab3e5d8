use thiserror::Error;

/// Errors raised by the store and its backends.
///
/// Resolution and migration never fail; only persistence and project edits
/// that would break a document invariant surface an error.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project already exists: {0}")]
    DuplicateProject(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
