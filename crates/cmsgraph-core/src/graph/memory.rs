//! In-memory graph store.

use std::collections::BTreeMap;

use dashmap::DashMap;
use parking_lot::RwLock;

use super::{GraphStore, ReferenceDef, TypeDef, TypeHandle};
use crate::error::Error;
use crate::model::{Node, NodeId};

#[derive(Debug, Clone)]
struct StoredType {
    def: TypeDef,
    refs: Vec<ReferenceDef>,
}

/// Concurrent in-memory [`GraphStore`].
#[derive(Debug, Default)]
pub struct MemoryGraph {
    types: RwLock<BTreeMap<String, StoredType>>,
    nodes: DashMap<NodeId, Node>,
}

impl MemoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        self.types.read().keys().cloned().collect()
    }

    /// Get a registered type schema.
    pub fn type_def(&self, name: &str) -> Option<TypeDef> {
        self.types.read().get(name).map(|t| t.def.clone())
    }

    /// Reference declarations of a registered type.
    pub fn references(&self, name: &str) -> Vec<ReferenceDef> {
        self.types
            .read()
            .get(name)
            .map(|t| t.refs.clone())
            .unwrap_or_default()
    }

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Option<Node> {
        self.nodes.get(id).map(|n| n.clone())
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes of a type, ordered by id.
    pub fn nodes_of(&self, type_name: &str) -> Vec<Node> {
        let mut nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| n.type_name == type_name)
            .map(|n| n.clone())
            .collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.nodes.iter().map(|n| n.clone()).collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    /// References whose target node was never registered.
    ///
    /// Returned as `(source, field, target)` triples ordered by source id.
    pub fn dangling_references(&self) -> Vec<(NodeId, String, NodeId)> {
        let mut dangling: Vec<(NodeId, String, NodeId)> = self
            .nodes
            .iter()
            .flat_map(|node| {
                node.reference_targets()
                    .filter(|(_, target)| !self.nodes.contains_key(target))
                    .map(|(field, target)| (node.id, field.to_string(), *target))
                    .collect::<Vec<_>>()
            })
            .collect();
        dangling.sort();
        dangling
    }
}

impl GraphStore for MemoryGraph {
    fn register_type(&self, def: TypeDef) -> Result<TypeHandle, Error> {
        let handle = TypeHandle::new(def.name.clone());
        self.types.write().insert(
            def.name.clone(),
            StoredType {
                def,
                refs: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn type_handle(&self, name: &str) -> Option<TypeHandle> {
        self.types
            .read()
            .contains_key(name)
            .then(|| TypeHandle::new(name))
    }

    fn add_reference(&self, owner: &TypeHandle, reference: ReferenceDef) -> Result<(), Error> {
        let mut types = self.types.write();
        let stored = types
            .get_mut(owner.name())
            .ok_or_else(|| Error::TypeNotRegistered(owner.name().to_string()))?;
        stored.refs.retain(|r| r.name != reference.name);
        stored.refs.push(reference);
        Ok(())
    }

    fn register_node(&self, type_name: &str, node: Node) -> Result<(), Error> {
        if !self.types.read().contains_key(type_name) {
            return Err(Error::TypeNotRegistered(type_name.to_string()));
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }
}
