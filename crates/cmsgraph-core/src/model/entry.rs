//! Entries delivered by the content source.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One external data record conforming to a content type.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// External entry identifier.
    pub id: String,
    /// External identifier of the owning content type.
    pub content_type_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Raw field values keyed by field identifier.
    pub fields: Map<String, Value>,
}

impl Entry {
    /// Create an entry with no fields, created and updated at `timestamp`.
    pub fn new(
        id: impl Into<String>,
        content_type_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content_type_id: content_type_id.into(),
            created_at: timestamp,
            updated_at: timestamp,
            fields: Map::new(),
        }
    }

    /// Set the update timestamp.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Set a raw field value.
    pub fn with_field(mut self, id: impl Into<String>, value: Value) -> Self {
        self.fields.insert(id.into(), value);
        self
    }

    /// Get a field value if present.
    ///
    /// A key holding JSON `null` counts as absent.
    pub fn field(&self, id: &str) -> Option<&Value> {
        self.fields.get(id).filter(|v| !v.is_null())
    }
}
