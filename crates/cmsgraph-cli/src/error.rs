//! CLI error types.

use thiserror::Error;

/// Errors that end a `cmsgraph` run.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading the export failed.
    #[error("source error: {0}")]
    Source(#[from] cmsgraph::source::Error),

    /// The ingestion pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] cmsgraph::Error),

    /// Opening, reading or flushing the graph store failed.
    #[error("graph store error: {0}")]
    Store(#[from] cmsgraph::core::Error),

    /// Writing node output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Encoding a node as JSON failed.
    #[error("node encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// `--strict` was given and some entries did not become nodes.
    #[error("{skipped} entries skipped")]
    Incomplete {
        /// Number of skipped entries.
        skipped: usize,
    },
}
