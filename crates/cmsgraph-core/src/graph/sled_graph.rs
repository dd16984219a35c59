//! Persistent graph store backed by sled.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sled::{Db, Tree};

use super::{GraphStore, ReferenceDef, TypeDef, TypeHandle};
use crate::error::Error;
use crate::model::{Node, NodeId, NODE_ID_SIZE};

/// Tree name for type schemas.
const TYPES_TREE: &str = "graph:types";

/// Tree name for nodes keyed by node id.
const NODES_TREE: &str = "graph:nodes";

/// Tree name for the node type index (type name + 0x00 + node id -> empty).
const TYPE_INDEX_TREE: &str = "index:node_type";

/// Configuration for a [`SledGraph`].
#[derive(Debug, Clone)]
pub struct SledConfig {
    /// Path to the database directory.
    pub path: PathBuf,

    /// Page cache capacity in bytes.
    pub cache_capacity: u64,

    /// Flush interval in milliseconds. None leaves flushing to [`SledGraph::flush`].
    pub flush_every_ms: Option<u64>,

    /// Enable zstd compression.
    pub compression: bool,

    /// Temporary database (deleted on drop).
    pub temporary: bool,
}

impl Default for SledConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./cmsgraph_data"),
            cache_capacity: 256 * 1024 * 1024, // 256MB
            flush_every_ms: Some(1000),
            compression: true,
            temporary: false,
        }
    }
}

impl SledConfig {
    /// Create a configuration for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a temporary configuration for testing.
    pub fn temporary() -> Self {
        Self {
            path: PathBuf::new(),
            temporary: true,
            ..Default::default()
        }
    }

    /// Set the page cache capacity.
    pub fn with_cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    fn to_sled_config(&self) -> sled::Config {
        let mut config = sled::Config::new()
            .cache_capacity(self.cache_capacity)
            .use_compression(self.compression)
            .flush_every_ms(self.flush_every_ms);

        if self.temporary {
            config = config.temporary(true);
        } else {
            config = config.path(&self.path);
        }

        config
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredType {
    def: TypeDef,
    refs: Vec<ReferenceDef>,
}

/// [`GraphStore`] persisting types and nodes as JSON documents in sled.
pub struct SledGraph {
    db: Db,
    types_tree: Tree,
    nodes_tree: Tree,
    type_index_tree: Tree,
}

impl SledGraph {
    /// Open or create a graph store.
    pub fn open(config: SledConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let types_tree = db.open_tree(TYPES_TREE)?;
        let nodes_tree = db.open_tree(NODES_TREE)?;
        let type_index_tree = db.open_tree(TYPE_INDEX_TREE)?;

        Ok(Self {
            db,
            types_tree,
            nodes_tree,
            type_index_tree,
        })
    }

    /// Check if the database already existed on disk when opened.
    pub fn was_recovered(&self) -> bool {
        self.db.was_recovered()
    }

    /// Get a registered type schema.
    pub fn type_def(&self, name: &str) -> Result<Option<TypeDef>, Error> {
        Ok(self.load_type(name)?.map(|t| t.def))
    }

    /// Reference declarations of a registered type.
    pub fn references(&self, name: &str) -> Result<Vec<ReferenceDef>, Error> {
        Ok(self.load_type(name)?.map(|t| t.refs).unwrap_or_default())
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        for result in self.types_tree.iter() {
            let (key, _) = result?;
            names.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(names)
    }

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Result<Option<Node>, Error> {
        match self.nodes_tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All nodes of a type, ordered by id.
    pub fn nodes_of(&self, type_name: &str) -> Result<Vec<Node>, Error> {
        let prefix = index_prefix(type_name);
        let mut nodes = Vec::new();

        for result in self.type_index_tree.scan_prefix(&prefix) {
            let (key, _) = result?;
            let id_bytes = &key[prefix.len()..];
            let id = <[u8; NODE_ID_SIZE]>::try_from(id_bytes)
                .map(NodeId::from_bytes)
                .map_err(|_| Error::InvalidNodeId(hex::encode(id_bytes)))?;
            if let Some(node) = self.node(&id)? {
                nodes.push(node);
            }
        }

        Ok(nodes)
    }

    /// Number of stored nodes.
    pub fn node_count(&self) -> usize {
        self.nodes_tree.len()
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.types_tree.flush()?;
        self.nodes_tree.flush()?;
        self.type_index_tree.flush()?;
        Ok(())
    }

    fn load_type(&self, name: &str) -> Result<Option<StoredType>, Error> {
        match self.types_tree.get(name.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn store_type(&self, stored: &StoredType) -> Result<(), Error> {
        let value = serde_json::to_vec(stored)?;
        self.types_tree.insert(stored.def.name.as_bytes(), value)?;
        Ok(())
    }
}

impl GraphStore for SledGraph {
    fn register_type(&self, def: TypeDef) -> Result<TypeHandle, Error> {
        let handle = TypeHandle::new(def.name.clone());
        self.store_type(&StoredType {
            def,
            refs: Vec::new(),
        })?;
        Ok(handle)
    }

    fn type_handle(&self, name: &str) -> Option<TypeHandle> {
        match self.types_tree.contains_key(name.as_bytes()) {
            Ok(true) => Some(TypeHandle::new(name)),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(type_name = name, error = %e, "type lookup failed");
                None
            }
        }
    }

    fn add_reference(&self, owner: &TypeHandle, reference: ReferenceDef) -> Result<(), Error> {
        let mut stored = self
            .load_type(owner.name())?
            .ok_or_else(|| Error::TypeNotRegistered(owner.name().to_string()))?;
        stored.refs.retain(|r| r.name != reference.name);
        stored.refs.push(reference);
        self.store_type(&stored)
    }

    fn register_node(&self, type_name: &str, node: Node) -> Result<(), Error> {
        if !self.types_tree.contains_key(type_name.as_bytes())? {
            return Err(Error::TypeNotRegistered(type_name.to_string()));
        }

        let value = serde_json::to_vec(&node)?;
        if let Some(previous) = self.nodes_tree.insert(node.id.as_bytes(), value)? {
            let previous: Node = serde_json::from_slice(&previous)?;
            if previous.type_name != type_name {
                self.type_index_tree
                    .remove(index_key(&previous.type_name, &node.id))?;
            }
        }
        self.type_index_tree
            .insert(index_key(type_name, &node.id), &[])?;
        Ok(())
    }
}

fn index_prefix(type_name: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(type_name.len() + 1 + NODE_ID_SIZE);
    key.extend_from_slice(type_name.as_bytes());
    key.push(0);
    key
}

fn index_key(type_name: &str, id: &NodeId) -> Vec<u8> {
    let mut key = index_prefix(type_name);
    key.extend_from_slice(id.as_bytes());
    key
}
