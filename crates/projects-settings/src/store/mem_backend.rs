use super::backend::StorageBackend;
use crate::error::{Result, SettingsError};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded.
/// This keeps the `StorageBackend` trait on `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    raw: RefCell<Option<Value>>,
    saves: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds `raw`, as if a previous session saved it.
    pub fn with_raw(raw: Value) -> Self {
        let backend = Self::default();
        *backend.raw.borrow_mut() = Some(raw);
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// The last saved tree.
    pub fn saved(&self) -> Option<Value> {
        self.raw.borrow().clone()
    }

    /// How many successful saves happened.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl StorageBackend for MemBackend {
    fn load(&self) -> Result<Option<Value>> {
        Ok(self.raw.borrow().clone())
    }

    fn save(&self, raw: &Value) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(SettingsError::Store("Simulated write error".to_string()));
        }
        *self.raw.borrow_mut() = Some(raw.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://settings")
    }
}
