//! Keyword-Harvest: bulk image retrieval for keyword datasets
//!
//! This crate turns a keyword list into independent download tasks, runs them
//! through a bounded worker pool, writes images into a per-keyword directory
//! layout, and audits the result for class imbalance.

pub mod audit;
pub mod collector;
pub mod config;
pub mod coordinator;
pub mod downloader;
pub mod keywords;
pub mod planner;
pub mod pool;
pub mod source;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Keyword-Harvest operations
///
/// Only run-aborting failures are represented here. Collector and per-link
/// failures are logged and swallowed inside the worker pool.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Keyword file error: {0}")]
    Keywords(#[from] KeywordError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker pool error: {0}")]
    Pool(String),

    #[error("Failed to scan {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Keyword file errors
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("Failed to read keyword file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to rewrite keyword file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for Keyword-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use keywords::{load_keywords, Keyword};
pub use source::{Resolution, SourceFamily, SourceVariant};
