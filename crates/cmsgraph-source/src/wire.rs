//! Delivery API payload shapes.
//!
//! These mirror the JSON returned by the content delivery API and exported
//! datasets. Conversions into the core model decide each field's kind once,
//! here, so nothing downstream inspects raw schema payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use cmsgraph_core::{ContentTypeDescriptor, Entry, FieldDescriptor, FieldKind, LinkKind};

/// `{"sys": {"id": ...}}` link wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SysLink {
    /// Linked system metadata.
    pub sys: SysId,
}

/// System metadata carrying only an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SysId {
    /// External identifier.
    pub id: String,
}

/// A content type payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContentType {
    /// System metadata.
    pub sys: SysId,
    /// Display name.
    pub name: String,
    /// Field used as the entry title.
    #[serde(default)]
    pub display_field: Option<String>,
    /// Field definitions.
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// A field definition payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    /// Field id.
    pub id: String,
    /// Field label.
    #[serde(default)]
    pub name: String,
    /// Declared type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Link target for `Link` fields.
    #[serde(default)]
    pub link_type: Option<String>,
    /// Item definition for `Array` fields.
    #[serde(default)]
    pub items: Option<RawItems>,
    /// Validations.
    #[serde(default)]
    pub validations: Vec<RawValidation>,
}

/// Item definition of an `Array` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItems {
    /// Declared item type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Link target for `Link` items.
    #[serde(default)]
    pub link_type: Option<String>,
    /// Item validations.
    #[serde(default)]
    pub validations: Vec<RawValidation>,
}

/// A field validation. Only content type constraints are read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawValidation {
    /// Permitted target content types of an entry link.
    #[serde(default)]
    pub link_content_type: Option<Vec<String>>,
}

/// An entry payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    /// System metadata.
    pub sys: RawEntrySys,
    /// Field values for the delivered locale.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// System metadata of an entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntrySys {
    /// Entry id.
    pub id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Owning content type.
    pub content_type: SysLink,
}

impl From<RawContentType> for ContentTypeDescriptor {
    fn from(raw: RawContentType) -> Self {
        Self {
            id: raw.sys.id,
            name: raw.name,
            display_field: raw.display_field,
            fields: raw.fields.into_iter().map(FieldDescriptor::from).collect(),
        }
    }
}

impl From<RawField> for FieldDescriptor {
    fn from(raw: RawField) -> Self {
        let kind = match raw.items.as_ref() {
            Some(items) if raw.kind == "Array" => FieldKind::array(field_kind(
                &items.kind,
                items.link_type.as_deref(),
                &items.validations,
            )),
            _ => field_kind(&raw.kind, raw.link_type.as_deref(), &raw.validations),
        };
        FieldDescriptor::new(raw.id, raw.name, kind)
    }
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        Self {
            id: raw.sys.id,
            content_type_id: raw.sys.content_type.sys.id,
            created_at: raw.sys.created_at,
            updated_at: raw.sys.updated_at,
            fields: raw.fields,
        }
    }
}

fn field_kind(kind: &str, link_type: Option<&str>, validations: &[RawValidation]) -> FieldKind {
    match kind {
        "Symbol" => FieldKind::Symbol,
        "Text" => FieldKind::Text,
        "Integer" => FieldKind::Integer,
        "Number" => FieldKind::Number,
        "Date" => FieldKind::Date,
        "Boolean" => FieldKind::Boolean,
        "Location" => FieldKind::Location,
        "Object" => FieldKind::Object,
        "RichText" => FieldKind::RichText,
        "Link" => match link_type {
            Some("Entry") => FieldKind::entry_link(
                validations
                    .iter()
                    .filter_map(|v| v.link_content_type.as_ref())
                    .flatten()
                    .cloned(),
            ),
            Some("Asset") => FieldKind::Link(LinkKind::Asset),
            other => FieldKind::Unknown(format!("Link:{}", other.unwrap_or("?"))),
        },
        // Arrays without an item definition.
        other => FieldKind::Unknown(other.to_string()),
    }
}
