//! In-memory content source.

use async_trait::async_trait;

use cmsgraph_core::{ContentTypeDescriptor, Entry};

use crate::error::Error;
use crate::paging::{Page, PagedSource};

/// A [`PagedSource`] over in-memory batches.
///
/// Wrap it in [`Drained`](crate::paging::Drained) to use it as a
/// [`ContentSource`](crate::source::ContentSource).
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    content_types: Vec<ContentTypeDescriptor>,
    entries: Vec<Entry>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content type.
    pub fn with_content_type(mut self, content_type: ContentTypeDescriptor) -> Self {
        self.content_types.push(content_type);
        self
    }

    /// Add multiple content types.
    pub fn with_content_types(
        mut self,
        content_types: impl IntoIterator<Item = ContentTypeDescriptor>,
    ) -> Self {
        self.content_types.extend(content_types);
        self
    }

    /// Add an entry.
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Add multiple entries.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = Entry>) -> Self {
        self.entries.extend(entries);
        self
    }
}

fn page<T: Clone>(items: &[T], skip: usize, limit: usize) -> Page<T> {
    Page {
        items: items.iter().skip(skip).take(limit).cloned().collect(),
        total: items.len(),
    }
}

#[async_trait]
impl PagedSource for MemorySource {
    async fn content_types_page(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<Page<ContentTypeDescriptor>, Error> {
        Ok(page(&self.content_types, skip, limit))
    }

    async fn entries_page(&self, skip: usize, limit: usize) -> Result<Page<Entry>, Error> {
        Ok(page(&self.entries, skip, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::Drained;
    use crate::source::ContentSource;
    use chrono::Utc;

    #[tokio::test]
    async fn test_pages() {
        let source = MemorySource::new().with_entries(
            (0..5).map(|i| Entry::new(format!("e{i}"), "post", Utc::now())),
        );

        let first = source.entries_page(0, 2).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, 5);

        let last = source.entries_page(4, 2).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, "e4");

        let past_end = source.entries_page(10, 2).await.unwrap();
        assert!(past_end.items.is_empty());
    }

    #[tokio::test]
    async fn test_drained_memory_source() {
        let source = MemorySource::new()
            .with_content_types((0..3).map(|i| ContentTypeDescriptor::new(format!("t{i}"), format!("T{i}"))))
            .with_entries((0..7).map(|i| Entry::new(format!("e{i}"), "t0", Utc::now())));
        let drained = Drained::new(source, 2);

        assert_eq!(drained.list_content_types().await.unwrap().len(), 3);
        let entries = drained.list_entries().await.unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[6].id, "e6");
    }
}
