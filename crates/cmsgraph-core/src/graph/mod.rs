//! Downstream graph store.
//!
//! A [`GraphStore`] receives type schemas, reference declarations, and nodes.
//! Two implementations ship with this crate: [`MemoryGraph`] for tests and
//! dry runs, and [`SledGraph`] for persistent output.

mod memory;
mod sled_graph;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Node, NodeId};
use crate::resolve::FieldType;

pub use memory::MemoryGraph;
pub use sled_graph::{SledConfig, SledGraph};

/// Schema entry for one scalar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Human readable description (the field label).
    pub description: String,
    /// Internal field type.
    pub field_type: FieldType,
}

/// Scalar field schemas keyed by field id.
pub type FieldSchemaMap = BTreeMap<String, FieldSchema>;

/// A type registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Internal type name.
    pub name: String,
    /// Scalar field schema.
    pub fields: FieldSchemaMap,
}

impl TypeDef {
    /// Create a type with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FieldSchemaMap::new(),
        }
    }

    /// Add a field schema.
    pub fn with_field(
        mut self,
        id: impl Into<String>,
        description: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        self.fields.insert(
            id.into(),
            FieldSchema {
                description: description.into(),
                field_type,
            },
        );
        self
    }
}

/// A reference declaration on a registered type.
///
/// More than one target type makes the reference a union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDef {
    /// Field id carrying the reference.
    pub name: String,
    /// Human readable description (the field label).
    pub description: String,
    /// Internal names of the permitted target types.
    pub types: Vec<String>,
}

impl ReferenceDef {
    /// Check if the reference may point at more than one type.
    pub fn is_union(&self) -> bool {
        self.types.len() > 1
    }
}

/// Handle to a type registered with a [`GraphStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    name: String,
}

impl TypeHandle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Registered type name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Receiver of the ingested graph.
///
/// Stores must accept concurrent `register_node` calls: entry ingestion may
/// run on several worker threads at once, each writing disjoint node ids.
pub trait GraphStore: Send + Sync {
    /// Register a type schema, replacing any type of the same name.
    fn register_type(&self, def: TypeDef) -> Result<TypeHandle, Error>;

    /// Look up a previously registered type.
    fn type_handle(&self, name: &str) -> Option<TypeHandle>;

    /// Declare a reference field on a registered type.
    fn add_reference(&self, owner: &TypeHandle, reference: ReferenceDef) -> Result<(), Error>;

    /// Register a node under a registered type name.
    fn register_node(&self, type_name: &str, node: Node) -> Result<(), Error>;

    /// Derive the internal id for an external identifier.
    fn derive_id(&self, external_id: &str) -> NodeId {
        NodeId::derive(external_id)
    }
}

impl<G: GraphStore + ?Sized> GraphStore for std::sync::Arc<G> {
    fn register_type(&self, def: TypeDef) -> Result<TypeHandle, Error> {
        (**self).register_type(def)
    }

    fn type_handle(&self, name: &str) -> Option<TypeHandle> {
        (**self).type_handle(name)
    }

    fn add_reference(&self, owner: &TypeHandle, reference: ReferenceDef) -> Result<(), Error> {
        (**self).add_reference(owner, reference)
    }

    fn register_node(&self, type_name: &str, node: Node) -> Result<(), Error> {
        (**self).register_node(type_name, node)
    }

    fn derive_id(&self, external_id: &str) -> NodeId {
        (**self).derive_id(external_id)
    }
}
