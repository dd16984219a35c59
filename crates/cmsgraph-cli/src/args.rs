//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use cmsgraph::config::DEFAULT_TYPE_NAME_PREFIX;
use cmsgraph::source::config::DEFAULT_ENVIRONMENT;
use cmsgraph::{PipelineConfig, SledConfig, SourceConfig};

/// Ingest a content export into a typed node graph.
#[derive(Parser, Debug, Clone)]
#[command(name = "cmsgraph")]
#[command(version, about = "Ingest a content export into a typed node graph", long_about = None)]
pub struct Args {
    /// Path to the JSON export (`contentTypes` and `entries`).
    pub input: PathBuf,

    /// Expected space id; the export must match if it names one.
    #[arg(long)]
    pub space: Option<String>,

    /// Environment to ingest.
    #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Prefix prepended to content type names.
    #[arg(long, default_value = DEFAULT_TYPE_NAME_PREFIX)]
    pub prefix: String,

    /// Persist the graph to a sled database at this path (in-memory if omitted).
    #[arg(short, long)]
    pub data_path: Option<PathBuf>,

    /// Page cache capacity of the sled database in megabytes.
    #[arg(long, default_value_t = 256)]
    pub cache_capacity_mb: u64,

    /// Entry ingestion workers (0 = auto).
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Print every node as a JSON line after the run.
    #[arg(long)]
    pub print_nodes: bool,

    /// Exit with an error if any entry was skipped.
    #[arg(long)]
    pub strict: bool,
}

impl Args {
    /// Sled configuration for `--data-path`, if one was given.
    pub fn sled_config(&self) -> Option<SledConfig> {
        self.data_path.as_ref().map(|path| {
            SledConfig::new(path).with_cache_capacity(self.cache_capacity_mb * 1024 * 1024)
        })
    }

    /// Convert command-line arguments to a pipeline configuration.
    pub fn into_config(self) -> PipelineConfig {
        let mut source = SourceConfig::new().with_environment(self.environment);
        if let Some(space) = self.space {
            source = source.with_space(space);
        }

        PipelineConfig::new()
            .with_source(source)
            .with_type_name_prefix(self.prefix)
            .with_workers(self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["cmsgraph", "export.json"]);
        let config = args.clone().into_config();

        assert_eq!(args.input, PathBuf::from("export.json"));
        assert!(args.data_path.is_none());
        assert!(args.sled_config().is_none());
        assert!(!args.strict);
        assert_eq!(config.type_name_prefix, DEFAULT_TYPE_NAME_PREFIX);
        assert_eq!(config.source.environment, DEFAULT_ENVIRONMENT);
        assert!(config.source.space.is_none());
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "cmsgraph",
            "export.json",
            "--space",
            "blog",
            "-e",
            "staging",
            "--prefix",
            "Cms",
            "--workers",
            "2",
            "--data-path",
            "/tmp/graph",
            "--cache-capacity-mb",
            "16",
            "--strict",
        ]);
        let config = args.clone().into_config();

        assert_eq!(config.source.space.as_deref(), Some("blog"));
        assert_eq!(config.source.environment, "staging");
        assert_eq!(config.type_name_prefix, "Cms");
        assert_eq!(config.workers, 2);
        let sled = args.sled_config().unwrap();
        assert_eq!(sled.path, PathBuf::from("/tmp/graph"));
        assert_eq!(sled.cache_capacity, 16 * 1024 * 1024);
        assert!(args.strict);
    }
}
