//! Opaque structured records
//!
//! A [`Record`] wraps a JSON value behind an `Arc`, so grouping results and
//! visible windows share records instead of copying them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Immutable structured record with named (possibly nested) attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Arc<Value>);

impl Record {
    /// Wrap a JSON value
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Build a record from any serializable value
    ///
    /// # Errors
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::new)
    }

    /// Borrow the underlying value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Top-level attribute lookup
    #[inline]
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute)
    }

    /// Top-level string attribute, if present and a string
    #[inline]
    #[must_use]
    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).and_then(Value::as_str)
    }

    /// Whether two handles point at the same shared record
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
