//! Nodes and node identifiers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::Error;

/// Size of a node identifier in bytes.
pub const NODE_ID_SIZE: usize = 16;

/// Domain separation context for identifier derivation.
const NODE_ID_CONTEXT: &str = "cmsgraph 2024-05 node id";

/// Internal node identifier.
///
/// Derived from an external identifier with a keyed BLAKE3 hash, so the same
/// external id always yields the same node id, in any phase and any run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId([u8; NODE_ID_SIZE]);

impl NodeId {
    /// Derive the node id for an external identifier.
    pub fn derive(external_id: &str) -> Self {
        let mut hasher = blake3::Hasher::new_derive_key(NODE_ID_CONTEXT);
        hasher.update(external_id.as_bytes());
        let hash = hasher.finalize();

        let mut bytes = [0u8; NODE_ID_SIZE];
        bytes.copy_from_slice(&hash.as_bytes()[..NODE_ID_SIZE]);
        Self(bytes)
    }

    /// Create a node id from raw bytes.
    pub fn from_bytes(bytes: [u8; NODE_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({self})")
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; NODE_ID_SIZE];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidNodeId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An ingested entry, addressable by its [`NodeId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Internal identifier.
    pub id: NodeId,
    /// Internal type name of the owning content type.
    pub type_name: String,
    /// Value of the content type's display field, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    /// URL slug; empty when the entry has none.
    pub slug: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last update timestamp.
    pub updated: DateTime<Utc>,
    /// Scalar field values. Absent fields are omitted.
    pub fields: BTreeMap<String, Value>,
    /// Reference fields as lists of target node ids. Absent fields are omitted.
    pub refs: BTreeMap<String, Vec<NodeId>>,
}

impl Node {
    /// Title as a string, if the display field holds text.
    pub fn title_str(&self) -> Option<&str> {
        self.title.as_ref().and_then(Value::as_str)
    }

    /// All reference targets of this node, in field order.
    pub fn reference_targets(&self) -> impl Iterator<Item = (&str, &NodeId)> {
        self.refs
            .iter()
            .flat_map(|(field, ids)| ids.iter().map(move |id| (field.as_str(), id)))
    }
}
