//! Configuration module for Keyword-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Command-line flags are applied on top of the loaded value by the binary.
//!
//! # Example
//!
//! ```no_run
//! use keyword_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Downloading with {} workers", config.crawler.threads);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    AuditConfig, CollectorConfig, Config, CrawlerConfig, HttpConfig, OutputConfig, SourcesConfig,
};

pub use parser::{load_config, load_config_or_default};
pub use validation::validate;
