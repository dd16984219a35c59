//! JSON export source.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use cmsgraph_core::{ContentTypeDescriptor, Entry};

use crate::config::SourceConfig;
use crate::error::Error;
use crate::source::ContentSource;
use crate::wire::{RawContentType, RawEntry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportFile {
    #[serde(default)]
    space: Option<String>,
    #[serde(default)]
    environment: Option<String>,
    #[serde(default)]
    content_types: Vec<RawContentType>,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

/// A [`ContentSource`] reading a complete dataset from a JSON export.
///
/// The export is an object with `contentTypes` and `entries` arrays in the
/// delivery API shape, optionally tagged with `space` and `environment`.
#[derive(Debug, Clone)]
pub struct JsonExportSource {
    content_types: Vec<ContentTypeDescriptor>,
    entries: Vec<Entry>,
}

impl JsonExportSource {
    /// Read and parse an export file.
    pub async fn open(path: impl AsRef<Path>, config: &SourceConfig) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let source = Self::from_slice(&bytes, config)?;

        info!(
            path = %path.display(),
            content_types = source.content_types.len(),
            entries = source.entries.len(),
            "loaded export"
        );

        Ok(source)
    }

    /// Parse an export from bytes.
    pub fn from_slice(bytes: &[u8], config: &SourceConfig) -> Result<Self, Error> {
        let export: ExportFile = serde_json::from_slice(bytes)?;
        config.check_scope(export.space.as_deref(), export.environment.as_deref())?;

        Ok(Self {
            content_types: export
                .content_types
                .into_iter()
                .map(ContentTypeDescriptor::from)
                .collect(),
            entries: export.entries.into_iter().map(Entry::from).collect(),
        })
    }
}

#[async_trait]
impl ContentSource for JsonExportSource {
    async fn list_content_types(&self) -> Result<Vec<ContentTypeDescriptor>, Error> {
        Ok(self.content_types.clone())
    }

    async fn list_entries(&self) -> Result<Vec<Entry>, Error> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_environment_mismatch() {
        let bytes = serde_json::to_vec(&json!({
            "environment": "staging",
            "contentTypes": [],
            "entries": []
        }))
        .unwrap();

        let err = JsonExportSource::from_slice(&bytes, &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ScopeMismatch { scope: "environment", .. }));

        let config = SourceConfig::new().with_environment("staging");
        assert!(JsonExportSource::from_slice(&bytes, &config).is_ok());
    }

    #[test]
    fn test_invalid_payload() {
        let err = JsonExportSource::from_slice(b"{ not json", &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
