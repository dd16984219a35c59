//! Content type and field descriptors.

/// Target of a link field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Link to another entry.
    Entry {
        /// Permitted target content type ids. Empty means unconstrained.
        content_types: Vec<String>,
    },
    /// Link to an asset (media). Not wired into the graph.
    Asset,
}

/// Declared kind of a content type field.
///
/// The kind is decided once when the descriptor is built from the source
/// payload; classification never re-inspects raw schema data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Short text.
    Symbol,
    /// Long text.
    Text,
    /// Integer number.
    Integer,
    /// Decimal number.
    Number,
    /// Date and time.
    Date,
    /// True or false.
    Boolean,
    /// Latitude/longitude pair.
    Location,
    /// Arbitrary JSON object.
    Object,
    /// Structured rich text document.
    RichText,
    /// Link to an entry or asset.
    Link(LinkKind),
    /// List of items of the given kind.
    Array(Box<FieldKind>),
    /// A kind this system does not recognize.
    Unknown(String),
}

/// Result of classifying a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldClass {
    /// Literal value copied onto the node.
    Scalar,
    /// Link(s) to other entries, resolved to node ids.
    Reference,
    /// Asset links; neither copied nor resolved.
    Excluded,
}

impl FieldKind {
    /// Create an entry link kind.
    pub fn entry_link<I, S>(content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Link(LinkKind::Entry {
            content_types: content_types.into_iter().map(Into::into).collect(),
        })
    }

    /// Create a list-of-entry-links kind.
    pub fn entry_links<I, S>(content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Array(Box::new(Self::entry_link(content_types)))
    }

    /// Create a list kind.
    pub fn array(items: FieldKind) -> Self {
        FieldKind::Array(Box::new(items))
    }

    /// Classify this kind as scalar, reference, or excluded.
    pub fn class(&self) -> FieldClass {
        match self {
            FieldKind::Link(LinkKind::Entry { .. }) => FieldClass::Reference,
            FieldKind::Link(LinkKind::Asset) => FieldClass::Excluded,
            FieldKind::Array(items) => match items.as_ref() {
                FieldKind::Link(LinkKind::Entry { .. }) => FieldClass::Reference,
                FieldKind::Link(LinkKind::Asset) => FieldClass::Excluded,
                _ => FieldClass::Scalar,
            },
            _ => FieldClass::Scalar,
        }
    }

    /// Permitted target content types if this is an entry reference.
    pub fn link_content_types(&self) -> Option<&[String]> {
        match self {
            FieldKind::Link(LinkKind::Entry { content_types }) => Some(content_types),
            FieldKind::Array(items) => items.link_content_types(),
            _ => None,
        }
    }
}

/// A field declared on a content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier (the key used in entry payloads).
    pub id: String,
    /// Human readable label.
    pub name: String,
    /// Declared kind.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Classify this field.
    pub fn class(&self) -> FieldClass {
        self.kind.class()
    }
}

/// Schema of a class of entries, as delivered by the content source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeDescriptor {
    /// External content type identifier.
    pub id: String,
    /// Display name, used to derive the internal type name.
    pub name: String,
    /// Field used as the node title.
    pub display_field: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl ContentTypeDescriptor {
    /// Create a content type with no fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_field: None,
            fields: Vec::new(),
        }
    }

    /// Set the display field.
    pub fn with_display_field(mut self, field: impl Into<String>) -> Self {
        self.display_field = Some(field.into());
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get a field by id.
    pub fn get_field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }
}
