//! cmsgraph - ingest a content management dataset into a typed node graph.
//!
//! The [`Pipeline`] fetches content types from a [`ContentSource`], registers
//! their schemas with a [`GraphStore`], and only then fetches and ingests the
//! entries. A schema batch that references unknown content types aborts the
//! run before any entry is fetched.
//!
//! # Quick Start
//!
//! ```ignore
//! use cmsgraph::{JsonExportSource, MemoryGraph, Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!     let source = JsonExportSource::open("export.json", &config.source).await?;
//!     let pipeline = Pipeline::new(source, MemoryGraph::new(), config);
//!
//!     let report = pipeline.run().await?;
//!     println!("{} nodes", report.nodes.registered);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::Error;
pub use pipeline::{Pipeline, RunReport};

pub use cmsgraph_core::{
    GraphStore, IngestReport, MemoryGraph, Node, NodeId, SchemaReport, SledConfig, SledGraph,
};
pub use cmsgraph_source::{
    ContentSource, Drained, JsonExportSource, MemorySource, PagedSource, SourceConfig,
};

/// Re-export core types.
pub use cmsgraph_core as core;

/// Re-export source types.
pub use cmsgraph_source as source;
