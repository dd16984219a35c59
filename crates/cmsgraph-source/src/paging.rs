//! Paged sources and draining.

use std::future::Future;

use async_trait::async_trait;
use tracing::debug;

use cmsgraph_core::{ContentTypeDescriptor, Entry};

use crate::config::SourceConfig;
use crate::error::Error;
use crate::source::ContentSource;

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Size of the whole collection.
    pub total: usize,
}

/// A source that serves its collections one page at a time.
#[async_trait]
pub trait PagedSource: Send + Sync {
    /// Fetch a page of content types.
    async fn content_types_page(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<Page<ContentTypeDescriptor>, Error>;

    /// Fetch a page of entries.
    async fn entries_page(&self, skip: usize, limit: usize) -> Result<Page<Entry>, Error>;
}

/// Fetch pages until the collection's advertised total is collected.
///
/// A page that comes back empty before the total is reached fails the whole
/// collection with [`Error::IncompletePage`].
pub async fn drain<T, F, Fut>(
    collection: &'static str,
    limit: usize,
    mut fetch: F,
) -> Result<Vec<T>, Error>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Page<T>, Error>>,
{
    if limit == 0 {
        return Err(Error::InvalidPageSize(limit));
    }

    let mut items: Vec<T> = Vec::new();
    loop {
        let page = fetch(items.len(), limit).await?;
        let total = page.total;
        let received = page.items.len();
        items.extend(page.items);

        debug!(
            collection,
            received,
            collected = items.len(),
            total,
            "fetched page"
        );

        if items.len() >= total {
            return Ok(items);
        }
        if received == 0 {
            return Err(Error::IncompletePage {
                collection,
                collected: items.len(),
                total,
            });
        }
    }
}

/// Adapts a [`PagedSource`] into a [`ContentSource`] by draining every page.
#[derive(Debug, Clone)]
pub struct Drained<P> {
    inner: P,
    page_size: usize,
}

impl<P: PagedSource> Drained<P> {
    /// Wrap a paged source with an explicit page size.
    pub fn new(inner: P, page_size: usize) -> Self {
        Self { inner, page_size }
    }

    /// Wrap a paged source using the configured page size.
    pub fn with_config(inner: P, config: &SourceConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::new(inner, config.page_size))
    }
}

#[async_trait]
impl<P: PagedSource> ContentSource for Drained<P> {
    async fn list_content_types(&self) -> Result<Vec<ContentTypeDescriptor>, Error> {
        drain("content types", self.page_size, |skip, limit| {
            self.inner.content_types_page(skip, limit)
        })
        .await
    }

    async fn list_entries(&self) -> Result<Vec<Entry>, Error> {
        drain("entries", self.page_size, |skip, limit| {
            self.inner.entries_page(skip, limit)
        })
        .await
    }
}
