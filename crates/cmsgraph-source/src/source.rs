//! Content source trait.

use async_trait::async_trait;
use cmsgraph_core::{ContentTypeDescriptor, Entry};

use crate::error::Error;

/// Upstream provider of a content dataset.
///
/// Both calls return complete result sets for the source's scope. Retry and
/// backoff, if any, belong to the implementation.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every content type of the dataset.
    async fn list_content_types(&self) -> Result<Vec<ContentTypeDescriptor>, Error>;

    /// Every entry of the dataset.
    async fn list_entries(&self) -> Result<Vec<Entry>, Error>;
}
