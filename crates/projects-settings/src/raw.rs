//! # Raw Settings Trees
//!
//! Persisted settings arrive as an untyped JSON tree of unknown provenance.
//! Nothing here trusts its shape: every accessor checks the shape it expects
//! and answers either `Some(value)` ("recognized, use this") or `None`
//! ("fall back to the default"). None of them panic or return errors.
//!
//! [`RawObject`] wraps any [`Value`]. A value that is not a JSON object behaves
//! exactly like an empty object, so callers can walk arbitrarily malformed
//! input with the same code they use for well-formed input:
//!
//! ```
//! use projects_settings::raw::RawObject;
//! use serde_json::json;
//!
//! let raw = json!({ "name": "Foo", "limit": -3, "tags": ["a", 1, "b"] });
//! let obj = RawObject::of(&raw);
//!
//! assert_eq!(obj.string("name").as_deref(), Some("Foo"));
//! assert_eq!(obj.count("limit"), None);
//! assert_eq!(obj.strings("tags"), Some(vec!["a".to_string(), "b".to_string()]));
//! assert!(RawObject::of(&json!(42)).child("anything").is_empty());
//! ```

use serde_json::{Map, Value};

/// Read-only view of a JSON value as an object with optional fields.
#[derive(Debug, Clone, Copy)]
pub struct RawObject<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RawObject<'a> {
    /// Wrap a value. Non-objects are treated as `{}`.
    pub fn of(value: &'a Value) -> Self {
        Self {
            fields: value.as_object(),
        }
    }

    /// Whether the wrapped value was actually a JSON object.
    pub fn is_object(&self) -> bool {
        self.fields.is_some()
    }

    /// True when there is nothing to read (not an object, or an empty one).
    pub fn is_empty(&self) -> bool {
        self.fields.map_or(true, Map::is_empty)
    }

    /// Raw field access. `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|f| f.get(key))
            .filter(|v| !v.is_null())
    }

    /// Whether the field is present with a non-null value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// A non-negative integer.
    ///
    /// Integral floats (`300.0`) below 2^64 are accepted. Negative, fractional and
    /// non-finite numbers are not.
    pub fn count(&self, key: &str) -> Option<u64> {
        let value = self.get(key)?;
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        let f = value.as_f64()?;
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
            Some(f as u64)
        } else {
            None
        }
    }

    /// Elements of an array field, or `None` if the field is not an array.
    pub fn list(&self, key: &str) -> Option<&'a [Value]> {
        self.get(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// The string elements of an array field. Non-string elements are skipped.
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        self.list(key).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// The object stored under `key`, if it is one.
    pub fn map(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// A nested object view. Missing or non-object fields yield an empty view.
    pub fn child(&self, key: &str) -> RawObject<'a> {
        RawObject {
            fields: self.map(key),
        }
    }
}
