//! Source configuration.

use crate::error::Error;

/// Default environment.
pub const DEFAULT_ENVIRONMENT: &str = "master";

/// Default page size when draining paged sources.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Largest page size a paged source accepts.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Scope and paging settings for a content source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Space identifier. None accepts any space.
    pub space: Option<String>,

    /// Environment within the space.
    pub environment: String,

    /// Items requested per page.
    pub page_size: usize,
}

impl SourceConfig {
    /// Create a configuration for the default environment.
    pub fn new() -> Self {
        Self {
            space: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the space.
    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Check the settings.
    pub fn validate(&self) -> Result<(), Error> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    /// Check a payload's space and environment against this configuration.
    ///
    /// Missing values in the payload are accepted.
    pub fn check_scope(&self, space: Option<&str>, environment: Option<&str>) -> Result<(), Error> {
        if let (Some(expected), Some(found)) = (self.space.as_deref(), space) {
            if expected != found {
                return Err(Error::ScopeMismatch {
                    scope: "space",
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
        }
        if let Some(found) = environment {
            if found != self.environment {
                return Err(Error::ScopeMismatch {
                    scope: "environment",
                    expected: self.environment.clone(),
                    found: found.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SourceConfig::default();
        assert!(config.space.is_none());
        assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(SourceConfig::new().with_page_size(0).validate().is_err());
        assert!(SourceConfig::new()
            .with_page_size(MAX_PAGE_SIZE + 1)
            .validate()
            .is_err());
        assert!(SourceConfig::new().with_page_size(MAX_PAGE_SIZE).validate().is_ok());
    }

    #[test]
    fn test_check_scope() {
        let config = SourceConfig::new()
            .with_space("blog")
            .with_environment("staging");

        assert!(config.check_scope(Some("blog"), Some("staging")).is_ok());
        assert!(config.check_scope(None, None).is_ok());
        assert!(matches!(
            config.check_scope(Some("shop"), None),
            Err(Error::ScopeMismatch { scope: "space", .. })
        ));
        assert!(matches!(
            config.check_scope(None, Some("master")),
            Err(Error::ScopeMismatch { scope: "environment", .. })
        ));
    }
}
