//! Two-phase ingestion pipeline.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinError;
use tracing::{info, instrument, warn, Span};

use cmsgraph_core::{GraphStore, IngestReport, NodeIngestor, SchemaRegistry, SchemaReport};
use cmsgraph_source::ContentSource;

use crate::config::PipelineConfig;
use crate::error::Error;

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Schema phase summary.
    pub schema: SchemaReport,
    /// Entry phase summary.
    pub nodes: IngestReport,
}

impl RunReport {
    /// Check if every entry became a node.
    pub fn is_complete(&self) -> bool {
        self.nodes.is_complete()
    }
}

/// Runs schema ingestion, then entry ingestion, against one store.
///
/// Both phases write to the store synchronously, so they run on tokio's
/// blocking pool rather than on the calling task's executor thread.
pub struct Pipeline<S, G> {
    source: S,
    store: Arc<G>,
    config: PipelineConfig,
}

impl<S: ContentSource, G: GraphStore + 'static> Pipeline<S, G> {
    /// Create a pipeline.
    pub fn new(source: S, store: G, config: PipelineConfig) -> Self {
        Self::with_shared_store(source, Arc::new(store), config)
    }

    /// Create a pipeline over a store shared with the caller.
    pub fn with_shared_store(source: S, store: Arc<G>, config: PipelineConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// The content source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The graph store.
    pub fn store(&self) -> &G {
        &self.store
    }

    /// Consume the pipeline, returning the graph store.
    pub fn into_store(self) -> Arc<G> {
        self.store
    }

    /// Run both phases.
    ///
    /// Entries are fetched only after every content type has been registered.
    #[instrument(skip(self), fields(environment = %self.config.source.environment))]
    pub async fn run(&self) -> Result<RunReport, Error> {
        let start = Instant::now();

        let content_types = self.source.list_content_types().await?;
        info!(count = content_types.len(), "fetched content types");

        let store = Arc::clone(&self.store);
        let namer = self.config.type_namer();
        let span = Span::current();
        let (registry, schema) = tokio::task::spawn_blocking(move || {
            span.in_scope(|| SchemaRegistry::ingest(content_types, &namer, &*store))
        })
        .await
        .map_err(worker_panicked)??;

        let entries = self.source.list_entries().await?;
        info!(count = entries.len(), "fetched entries");

        let store = Arc::clone(&self.store);
        let workers = self.config.workers;
        let span = Span::current();
        let nodes = tokio::task::spawn_blocking(move || {
            span.in_scope(|| {
                NodeIngestor::new(&registry, &*store)
                    .with_workers(workers)
                    .ingest(&entries)
            })
        })
        .await
        .map_err(worker_panicked)??;

        if !nodes.is_complete() {
            warn!(
                skipped = nodes.skipped.len(),
                "some entries were skipped; content types and entries may be out of sync"
            );
        }

        info!(
            types = schema.types_registered,
            nodes = nodes.registered,
            duration_ms = start.elapsed().as_millis() as u64,
            "ingestion run complete"
        );

        Ok(RunReport { schema, nodes })
    }
}

fn worker_panicked(err: JoinError) -> Error {
    warn!(error = %err, "ingestion task failed");
    Error::Ingest(cmsgraph_core::Error::WorkerPanicked)
}
