use crate::error::Result;
use serde_json::Value;
use std::path::PathBuf;

/// Abstract interface for raw settings I/O.
///
/// This trait handles the "how" of persistence (filesystem vs memory), while
/// [`super::SettingsStore`] handles the "what" (resolution, snapshots,
/// subscribers).
pub trait StorageBackend {
    /// Load the persisted settings tree.
    /// Returns Ok(None) when nothing has been saved yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn load(&self) -> Result<Option<Value>>;

    /// Persist the settings tree.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save(&self, raw: &Value) -> Result<()>;

    /// Where the settings live. For FsBackend, this is the real path.
    /// For MemBackend, a virtual path.
    fn location(&self) -> PathBuf;
}
