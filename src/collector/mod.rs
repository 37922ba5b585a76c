//! Link collection capability
//!
//! Link collection (browser automation, scrolling, pagination) lives outside
//! this crate. The pipeline only depends on the [`LinkCollector`] contract;
//! [`CommandCollector`] adapts an external collector program to it.

mod command;

pub use command::CommandCollector;

use crate::source::{Resolution, SourceFamily};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a link collector
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Failed to start collector: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Collector exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("Collector output is not valid UTF-8")]
    InvalidOutput,

    #[error("Collector failed: {0}")]
    Other(String),
}

/// Source of candidate image URLs for a keyword
///
/// Implementations must be shareable across worker tasks.
#[async_trait]
pub trait LinkCollector: Send + Sync {
    /// Returns candidate URLs in the order they should be saved
    ///
    /// # Arguments
    ///
    /// * `keyword` - The search keyword
    /// * `family` - Which search engine to query
    /// * `resolution` - Thumbnail or full-resolution links
    /// * `query_modifier` - Extra query string (face mode), possibly empty
    async fn collect(
        &self,
        keyword: &str,
        family: SourceFamily,
        resolution: Resolution,
        query_modifier: &str,
    ) -> Result<Vec<String>, CollectorError>;
}
