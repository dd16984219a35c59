//! Data model shared by both ingestion phases.
//!
//! Content types and entries are the upstream inputs; nodes are the output
//! handed to a [`GraphStore`](crate::graph::GraphStore).

mod content_type;
mod entry;
mod node;

pub use content_type::{ContentTypeDescriptor, FieldClass, FieldDescriptor, FieldKind, LinkKind};
pub use entry::Entry;
pub use node::{Node, NodeId, NODE_ID_SIZE};
