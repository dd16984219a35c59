//! Pipeline configuration.

use cmsgraph_core::TypeNamer;
use cmsgraph_source::SourceConfig;

/// Default prefix prepended to content type names.
pub const DEFAULT_TYPE_NAME_PREFIX: &str = "Contentful";

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(4)
        .max(1)
}

/// Configuration of an ingestion run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source scope and paging.
    pub source: SourceConfig,

    /// Prefix prepended to content type names to form type names.
    pub type_name_prefix: String,

    /// Worker threads used for entry ingestion.
    pub workers: usize,
}

impl PipelineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            source: SourceConfig::default(),
            type_name_prefix: DEFAULT_TYPE_NAME_PREFIX.to_string(),
            workers: default_workers(),
        }
    }

    /// Set the source configuration.
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Set the type name prefix.
    pub fn with_type_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_name_prefix = prefix.into();
        self
    }

    /// Set the number of ingestion workers. Zero selects the available parallelism.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = if workers == 0 {
            default_workers()
        } else {
            workers
        };
        self
    }

    /// Type namer for this run.
    pub fn type_namer(&self) -> TypeNamer {
        TypeNamer::new(self.type_name_prefix.clone())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
