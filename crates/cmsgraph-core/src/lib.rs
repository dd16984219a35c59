//! cmsgraph core - schema registry, type resolution, and node ingestion.
//!
//! This crate turns content-type descriptors and entries from a content
//! management system into a typed node graph. Ingestion runs in two strictly
//! ordered phases: [`SchemaRegistry::ingest`] classifies every content type and
//! registers its schema with a [`GraphStore`], then [`NodeIngestor::ingest`]
//! turns entries into nodes against the finished registry.

pub mod error;
pub mod graph;
pub mod ingest;
pub mod model;
pub mod registry;
pub mod resolve;

pub use error::Error;
pub use graph::{
    FieldSchema, FieldSchemaMap, GraphStore, MemoryGraph, ReferenceDef, SledConfig, SledGraph,
    TypeDef, TypeHandle,
};
pub use ingest::{IngestReport, NodeIngestor, SkippedEntry};
pub use model::{
    ContentTypeDescriptor, Entry, FieldClass, FieldDescriptor, FieldKind, LinkKind, Node, NodeId,
};
pub use registry::{
    ReferenceField, ReferenceResolver, RegistryEntry, ScalarField, SchemaRegistry, SchemaReport,
    TypeNamer,
};
pub use resolve::{resolve_type, FieldType, ScalarType};
