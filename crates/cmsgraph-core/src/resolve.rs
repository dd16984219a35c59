//! Field type resolution.
//!
//! Maps a [`FieldDescriptor`] to the internal [`FieldType`] registered on the
//! owning type's field schema. Resolution is pure and independent of entries.

use serde::{Deserialize, Serialize};

use crate::model::{FieldClass, FieldDescriptor, FieldKind};

/// Scalar types of the internal type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// UTF-8 string.
    String,
    /// Integer number.
    Int,
    /// Floating point number.
    Float,
    /// Boolean value.
    Boolean,
    /// ISO 8601 date or date-time.
    Date,
    /// Latitude/longitude object.
    Location,
}

/// Internal field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// A single scalar value.
    Scalar(ScalarType),
    /// A list of scalar values.
    List(ScalarType),
    /// A structured object (JSON objects, rich text documents).
    Object,
    /// A list of structured objects.
    ObjectList,
    /// Anything; used for kinds this system does not recognize.
    Any,
}

impl FieldType {
    /// Check if this type is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::List(_) | FieldType::ObjectList)
    }
}

/// Resolve the internal type of a field.
///
/// Returns `None` for fields that do not belong in a scalar schema: entry
/// references (declared separately as references) and asset links.
pub fn resolve_type(field: &FieldDescriptor) -> Option<FieldType> {
    if field.class() != FieldClass::Scalar {
        return None;
    }

    let resolved = match &field.kind {
        FieldKind::Array(items) => match items.as_ref() {
            FieldKind::Object | FieldKind::RichText => FieldType::ObjectList,
            other => scalar_of(other).map_or(FieldType::Any, FieldType::List),
        },
        FieldKind::Object | FieldKind::RichText => FieldType::Object,
        other => scalar_of(other).map_or(FieldType::Any, FieldType::Scalar),
    };

    if resolved == FieldType::Any {
        tracing::debug!(field = %field.id, kind = ?field.kind, "unsupported field kind, using Any");
    }

    Some(resolved)
}

fn scalar_of(kind: &FieldKind) -> Option<ScalarType> {
    match kind {
        FieldKind::Symbol | FieldKind::Text => Some(ScalarType::String),
        FieldKind::Integer => Some(ScalarType::Int),
        FieldKind::Number => Some(ScalarType::Float),
        FieldKind::Boolean => Some(ScalarType::Boolean),
        FieldKind::Date => Some(ScalarType::Date),
        FieldKind::Location => Some(ScalarType::Location),
        _ => None,
    }
}
