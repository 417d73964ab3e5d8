//! # Projects Settings
//!
//! Settings schema resolution and migration for a notes project manager.
//!
//! Persisted settings are untrusted: they may be missing, written by an older
//! version, or hand-edited into something malformed. This crate turns any such
//! input into a fully populated, current-version [`model::SettingsDocument`],
//! keeping every piece of user customization that is still valid.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators (editor, command registration)               │
//! │  - editor.rs: copy-on-write preference edits, toggle model  │
//! │  - registration.rs: command bindings for the palette        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - SettingsStore: get / set / subscribe                     │
//! │  - StorageBackend: FsBackend (production), MemBackend (test)│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (pure, total, no I/O)                                 │
//! │  - migrate.rs: version N raw -> version N+1 raw             │
//! │  - resolve.rs: current raw -> SettingsDocument              │
//! │  - schema.rs: known versions and defaults                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Never Fail on Data
//!
//! [`resolve::resolve`] and [`migrate::migrate`] have no error path. Bad
//! values become defaults, unknown versions are treated as legacy, and
//! non-object input resolves like `{}`. Errors exist only in the store layer,
//! for real I/O failures and for project edits that would break an invariant.
//!
//! ```
//! use projects_settings::resolve::resolve;
//! use serde_json::json;
//!
//! let doc = resolve(&json!({ "version": 2, "projects": [{ "id": "foo", "name": "Foo" }] }));
//! assert_eq!(doc.projects[0].name, "Foo");
//! assert!(doc.projects[0].views.is_empty());
//! assert_eq!(doc.preferences.project_view_limit, 300);
//! ```
//!
//! ## Module Overview
//!
//! - [`raw`]: shape-checked access to untyped trees
//! - [`model`]: the typed document and its defaults
//! - [`schema`]: version registry
//! - [`migrate`]: migration chain
//! - [`resolve`]: defaulting
//! - [`editor`]: edit operations behind the settings UI
//! - [`registration`]: command palette bindings
//! - [`store`]: persistence and the live settings context
//! - [`config`]: where settings are stored
//! - [`error`]: error types

pub mod config;
pub mod editor;
pub mod error;
pub mod migrate;
pub mod model;
pub mod raw;
pub mod registration;
pub mod resolve;
pub mod schema;
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use model::SettingsDocument;
pub use resolve::resolve;
