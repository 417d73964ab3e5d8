//! # Storage Layer
//!
//! Persistence for the settings document, behind the [`StorageBackend`]
//! trait, and the [`SettingsStore`] context object that owns the live
//! document for a session.
//!
//! ## Lifecycle
//!
//! 1. **Load**: [`SettingsStore::load`] reads the raw tree once, migrates and
//!    resolves it. If resolution changed anything, the result is saved back.
//! 2. **Edit**: every change is a new document (see [`crate::editor`]) passed
//!    to [`SettingsStore::set`] / [`SettingsStore::update_preferences`],
//!    which persist, swap the snapshot, then notify subscribers.
//! 3. **Teardown**: [`SettingsStore::flush`] writes the final state.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON file, written atomically (temp file
//!   then rename).
//! - [`mem_backend::MemBackend`]: in-memory, for tests. Can simulate write
//!   failures.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! └── data.json     # The settings document (file name configurable)
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod settings_store;

pub use backend::StorageBackend;
pub use settings_store::{SettingsStore, SubscriptionId};
