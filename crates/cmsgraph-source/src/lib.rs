//! cmsgraph sources - upstream providers of content types and entries.
//!
//! A [`ContentSource`] hands over complete batches: every page of content
//! types and every page of entries for the configured environment. Sources
//! that page their results implement [`PagedSource`] and are wrapped in
//! [`Drained`], which keeps fetching until the advertised total is reached.

pub mod config;
pub mod error;
pub mod json;
pub mod memory;
pub mod paging;
pub mod source;
pub mod wire;

pub use config::SourceConfig;
pub use error::Error;
pub use json::JsonExportSource;
pub use memory::MemorySource;
pub use paging::{drain, Drained, Page, PagedSource};
pub use source::ContentSource;

/// Re-export core types.
pub use cmsgraph_core as core;
