//! Entry ingestion.
//!
//! Every entry becomes one node. Node ids and reference targets depend only
//! on external identifiers, so entries can be ingested in any order and on
//! several threads once the [`SchemaRegistry`] is complete.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::Error;
use crate::graph::GraphStore;
use crate::model::{Entry, Node, NodeId};
use crate::registry::SchemaRegistry;

/// Entry field holding the node slug.
pub const SLUG_FIELD: &str = "slug";

/// An entry left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// External entry identifier.
    pub entry_id: String,
    /// Content type identifier the entry claimed.
    pub content_type_id: String,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry `{}` has unregistered content type `{}`",
            self.entry_id, self.content_type_id
        )
    }
}

/// Summary of an entry ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of nodes registered.
    pub registered: usize,
    /// Registered node count per type name.
    pub per_type: BTreeMap<String, usize>,
    /// Entries skipped because their content type is unknown.
    pub skipped: Vec<SkippedEntry>,
}

impl IngestReport {
    /// Check if every entry became a node.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn merge(&mut self, other: IngestReport) {
        self.registered += other.registered;
        for (type_name, count) in other.per_type {
            *self.per_type.entry(type_name).or_default() += count;
        }
        self.skipped.extend(other.skipped);
    }
}

/// Builds nodes from entries and registers them with a [`GraphStore`].
pub struct NodeIngestor<'a, G: ?Sized> {
    registry: &'a SchemaRegistry,
    store: &'a G,
    workers: usize,
}

impl<'a, G: GraphStore + ?Sized> NodeIngestor<'a, G> {
    /// Create an ingestor over a completed registry.
    pub fn new(registry: &'a SchemaRegistry, store: &'a G) -> Self {
        Self {
            registry,
            store,
            workers: 1,
        }
    }

    /// Set the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Ingest a batch of entries.
    ///
    /// Entries of unknown content types are skipped and reported; store
    /// failures abort the batch. The batch is split across the configured
    /// workers and joined before returning.
    #[instrument(skip_all, fields(entries = entries.len(), workers = self.workers))]
    pub fn ingest(&self, entries: &[Entry]) -> Result<IngestReport, Error> {
        let start = Instant::now();

        let report = if self.workers == 1 || entries.len() < 2 {
            self.ingest_chunk(entries)?
        } else {
            let chunk_size = entries.len().div_ceil(self.workers);
            std::thread::scope(|scope| {
                let handles: Vec<_> = entries
                    .chunks(chunk_size)
                    .map(|chunk| scope.spawn(move || self.ingest_chunk(chunk)))
                    .collect();

                let mut report = IngestReport::default();
                for handle in handles {
                    let partial = handle.join().map_err(|_| Error::WorkerPanicked)??;
                    report.merge(partial);
                }
                Ok::<_, Error>(report)
            })?
        };

        info!(
            registered = report.registered,
            skipped = report.skipped.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "entry ingestion complete"
        );

        Ok(report)
    }

    /// Build the node for one entry without registering it.
    ///
    /// Returns the type name to register the node under.
    pub fn build_node(&self, entry: &Entry) -> Result<(String, Node), Error> {
        let registered =
            self.registry
                .get(&entry.content_type_id)
                .ok_or_else(|| Error::UnregisteredEntryType {
                    entry: entry.id.clone(),
                    content_type: entry.content_type_id.clone(),
                })?;

        let title = registered
            .display_field()
            .and_then(|field| entry.field(field))
            .cloned();

        let slug = entry
            .field(SLUG_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let fields = registered
            .fields
            .iter()
            .filter_map(|scalar| {
                entry
                    .field(&scalar.field.id)
                    .map(|value| (scalar.field.id.clone(), value.clone()))
            })
            .collect();

        let refs = registered
            .refs
            .iter()
            .filter_map(|reference| {
                entry.field(&reference.field.id).map(|value| {
                    (
                        reference.field.id.clone(),
                        self.reference_ids(entry, &reference.field.id, value),
                    )
                })
            })
            .collect();

        let node = Node {
            id: self.store.derive_id(&entry.id),
            type_name: registered.type_name.clone(),
            title,
            slug,
            created: entry.created_at,
            updated: entry.updated_at,
            fields,
            refs,
        };

        Ok((registered.type_name.clone(), node))
    }

    fn ingest_chunk(&self, entries: &[Entry]) -> Result<IngestReport, Error> {
        let mut report = IngestReport::default();

        for entry in entries {
            match self.build_node(entry) {
                Ok((type_name, node)) => {
                    self.store.register_node(&type_name, node)?;
                    report.registered += 1;
                    *report.per_type.entry(type_name).or_default() += 1;
                }
                Err(Error::UnregisteredEntryType {
                    entry: entry_id,
                    content_type,
                }) => {
                    warn!(
                        entry = %entry_id,
                        content_type = %content_type,
                        "skipping entry of unregistered content type"
                    );
                    report.skipped.push(SkippedEntry {
                        entry_id,
                        content_type_id: content_type,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Target node ids of a raw reference value.
    ///
    /// Accepts a list of link payloads or a single payload. Payloads without
    /// a `sys.id` are dropped.
    fn reference_ids(&self, entry: &Entry, field: &str, value: &Value) -> Vec<NodeId> {
        let links: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            single => vec![single],
        };

        links
            .into_iter()
            .filter_map(|link| match link_target(link) {
                Some(target) => Some(self.store.derive_id(target)),
                None => {
                    debug!(entry = %entry.id, field, "dropping reference without sys.id");
                    None
                }
            })
            .collect()
    }
}

/// External id of the entry a link payload points at.
fn link_target(link: &Value) -> Option<&str> {
    link.get("sys")?.get("id")?.as_str()
}
