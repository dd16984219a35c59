//! Core error types.

use thiserror::Error;

/// Core ingestion errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A reference field names a content type missing from the schema batch.
    #[error(
        "field `{field}` of content type `{content_type}` references unknown content type `{target}`"
    )]
    UnknownTargetType {
        /// Content type owning the reference field.
        content_type: String,
        /// Reference field identifier.
        field: String,
        /// Target content type identifier that could not be found.
        target: String,
    },

    /// A type name was used before it was registered with the graph store.
    #[error("type `{0}` is not registered")]
    TypeNotRegistered(String),

    /// An entry belongs to a content type the registry does not know.
    #[error("entry `{entry}` has unregistered content type `{content_type}`")]
    UnregisteredEntryType {
        /// External entry identifier.
        entry: String,
        /// Content type identifier carried by the entry.
        content_type: String,
    },

    /// A stored node identifier could not be decoded.
    #[error("invalid node id: {0}")]
    InvalidNodeId(String),

    /// An ingestion worker thread panicked.
    #[error("ingestion worker panicked")]
    WorkerPanicked,
}
