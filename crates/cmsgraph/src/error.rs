//! Pipeline error types.

use thiserror::Error;

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Fetching from the content source failed.
    #[error("source error: {0}")]
    Source(#[from] cmsgraph_source::Error),

    /// Schema or entry ingestion failed.
    #[error("ingestion error: {0}")]
    Ingest(#[from] cmsgraph_core::Error),
}
