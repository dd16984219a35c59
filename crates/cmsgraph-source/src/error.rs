//! Source error types.

use thiserror::Error;

/// Content source errors.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be parsed.
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A paged collection ended before its advertised total.
    #[error("incomplete {collection}: collected {collected} of {total}")]
    IncompletePage {
        /// Collection being drained.
        collection: &'static str,
        /// Items collected before the source ran dry.
        collected: usize,
        /// Total advertised by the source.
        total: usize,
    },

    /// The payload belongs to a different space or environment.
    #[error("{scope} mismatch: expected `{expected}`, found `{found}`")]
    ScopeMismatch {
        /// Either "space" or "environment".
        scope: &'static str,
        /// Configured value.
        expected: String,
        /// Value carried by the payload.
        found: String,
    },

    /// Page size outside the accepted range.
    #[error("invalid page size {0}")]
    InvalidPageSize(usize),
}
