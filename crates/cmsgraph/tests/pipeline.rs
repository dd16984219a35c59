//! End-to-end tests for the ingestion pipeline.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use cmsgraph::core::{
    ContentTypeDescriptor, Entry, FieldDescriptor, FieldKind, Node, ReferenceDef, TypeDef,
    TypeHandle,
};
use cmsgraph::{
    ContentSource, Drained, Error, GraphStore, MemoryGraph, MemorySource, NodeId, Pipeline,
    PipelineConfig, SourceConfig,
};

fn author() -> ContentTypeDescriptor {
    ContentTypeDescriptor::new("author", "Author")
        .with_display_field("name")
        .with_field(FieldDescriptor::new("name", "Name", FieldKind::Symbol))
}

fn post() -> ContentTypeDescriptor {
    ContentTypeDescriptor::new("post", "Post")
        .with_display_field("title")
        .with_fields([
            FieldDescriptor::new("title", "Title", FieldKind::Text),
            FieldDescriptor::new("author", "Author", FieldKind::entry_links(["author"])),
        ])
}

fn entries() -> Vec<Entry> {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let mut entries: Vec<Entry> = (0..25)
        .map(|i| {
            Entry::new(format!("p{i}"), "post", ts)
                .with_field("title", json!(format!("Post {i}")))
                .with_field("slug", json!(format!("post-{i}")))
                .with_field(
                    "author",
                    json!([{ "sys": { "type": "Link", "linkType": "Entry", "id": format!("a{}", i % 3) } }]),
                )
        })
        .collect();
    entries.extend((0..3).map(|i| {
        Entry::new(format!("a{i}"), "author", ts).with_field("name", json!(format!("Author {i}")))
    }));
    entries
}

#[tokio::test]
async fn test_run_with_paged_source() {
    let source = MemorySource::new()
        .with_content_types([post(), author()])
        .with_entries(entries());
    let config = PipelineConfig::new()
        .with_workers(3)
        .with_source(SourceConfig::new().with_page_size(4));
    let source = Drained::with_config(source, &config.source).unwrap();
    let pipeline = Pipeline::new(source, MemoryGraph::new(), config);

    let report = pipeline.run().await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.schema.types_registered, 2);
    assert_eq!(report.schema.references_declared, 1);
    assert_eq!(report.nodes.registered, 28);
    assert_eq!(report.nodes.per_type["ContentfulPost"], 25);
    assert_eq!(report.nodes.per_type["ContentfulAuthor"], 3);

    let graph = pipeline.into_store();
    let p4 = graph.node(&NodeId::derive("p4")).unwrap();
    assert_eq!(p4.slug, "post-4");
    assert_eq!(p4.refs["author"], vec![NodeId::derive("a1")]);
    assert!(graph.dangling_references().is_empty());
}

#[test]
fn test_page_size_out_of_range_is_rejected() {
    for page_size in [0, cmsgraph::source::config::MAX_PAGE_SIZE + 1] {
        let config = SourceConfig::new().with_page_size(page_size);
        let result = Drained::with_config(MemorySource::new(), &config);
        assert!(matches!(
            result,
            Err(cmsgraph::source::Error::InvalidPageSize(size)) if size == page_size
        ));
    }
}

#[tokio::test]
async fn test_prefix_and_shared_store() {
    let graph = Arc::new(MemoryGraph::new());
    let source = MemorySource::new()
        .with_content_types([post(), author()])
        .with_entries(entries());
    let pipeline = Pipeline::with_shared_store(
        Drained::new(source, 100),
        Arc::clone(&graph),
        PipelineConfig::new().with_type_name_prefix("Cms"),
    );

    pipeline.run().await.unwrap();

    assert_eq!(graph.type_names(), vec!["CmsAuthor", "CmsPost"]);
    assert_eq!(graph.references("CmsPost")[0].types, vec!["CmsAuthor"]);
}

#[tokio::test]
async fn test_unregistered_entries_are_reported() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let source = MemorySource::new()
        .with_content_types([post(), author()])
        .with_entries(entries())
        .with_entry(Entry::new("c1", "comment", ts));
    let pipeline = Pipeline::new(
        Drained::new(source, 10),
        MemoryGraph::new(),
        PipelineConfig::default(),
    );

    let report = pipeline.run().await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.nodes.registered, 28);
    assert_eq!(report.nodes.skipped[0].entry_id, "c1");
}

struct CountingSource {
    content_types: Vec<ContentTypeDescriptor>,
    entry_calls: AtomicUsize,
}

#[async_trait]
impl ContentSource for CountingSource {
    async fn list_content_types(
        &self,
    ) -> Result<Vec<ContentTypeDescriptor>, cmsgraph::source::Error> {
        Ok(self.content_types.clone())
    }

    async fn list_entries(&self) -> Result<Vec<Entry>, cmsgraph::source::Error> {
        self.entry_calls.fetch_add(1, Ordering::SeqCst);
        Ok(entries())
    }
}

#[tokio::test]
async fn test_unknown_target_aborts_before_entries() {
    let source = CountingSource {
        content_types: vec![post()],
        entry_calls: AtomicUsize::new(0),
    };
    let pipeline = Pipeline::new(source, MemoryGraph::new(), PipelineConfig::default());

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Ingest(cmsgraph::core::Error::UnknownTargetType { .. })
    ));
    assert_eq!(pipeline.source().entry_calls.load(Ordering::SeqCst), 0);
    let graph = pipeline.store();
    assert!(graph.type_names().is_empty());
    assert_eq!(graph.node_count(), 0);
}

#[tokio::test]
async fn test_entries_fetched_once_after_schema() {
    let source = CountingSource {
        content_types: vec![post(), author()],
        entry_calls: AtomicUsize::new(0),
    };
    let pipeline = Pipeline::new(source, MemoryGraph::new(), PipelineConfig::default());

    pipeline.run().await.unwrap();

    assert_eq!(pipeline.source().entry_calls.load(Ordering::SeqCst), 1);
    assert_eq!(pipeline.store().node_count(), 28);
}

/// Store whose node writes wait until another task on the runtime has run.
struct GatedGraph {
    inner: MemoryGraph,
    released: Arc<AtomicBool>,
    saw_release: AtomicBool,
}

impl GatedGraph {
    fn wait_for_release(&self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !self.released.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        if self.released.load(Ordering::SeqCst) {
            self.saw_release.store(true, Ordering::SeqCst);
        }
    }
}

impl GraphStore for GatedGraph {
    fn register_type(&self, def: TypeDef) -> Result<TypeHandle, cmsgraph::core::Error> {
        self.inner.register_type(def)
    }

    fn type_handle(&self, name: &str) -> Option<TypeHandle> {
        self.inner.type_handle(name)
    }

    fn add_reference(
        &self,
        owner: &TypeHandle,
        reference: ReferenceDef,
    ) -> Result<(), cmsgraph::core::Error> {
        self.inner.add_reference(owner, reference)
    }

    fn register_node(&self, type_name: &str, node: Node) -> Result<(), cmsgraph::core::Error> {
        self.wait_for_release();
        self.inner.register_node(type_name, node)
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_ingestion_leaves_executor_free() {
    let released = Arc::new(AtomicBool::new(false));
    let graph = GatedGraph {
        inner: MemoryGraph::new(),
        released: Arc::clone(&released),
        saw_release: AtomicBool::new(false),
    };
    let source = MemorySource::new()
        .with_content_types([post(), author()])
        .with_entries(entries());
    let pipeline = Pipeline::new(
        Drained::new(source, 100),
        graph,
        PipelineConfig::new().with_workers(2),
    );

    let concurrent = tokio::spawn(async move {
        released.store(true, Ordering::SeqCst);
    });

    let report = pipeline.run().await.unwrap();
    concurrent.await.unwrap();

    assert_eq!(report.nodes.registered, 28);
    assert!(pipeline.store().saw_release.load(Ordering::SeqCst));
}
