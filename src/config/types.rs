use crate::source::{Resolution, SourceFamily};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Keyword-Harvest
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// runnable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
}

impl Config {
    /// Source families enabled for this run, in planning order
    pub fn enabled_families(&self) -> Vec<SourceFamily> {
        let mut families = Vec::new();
        if self.sources.google {
            families.push(SourceFamily::Google);
        }
        if self.sources.naver {
            families.push(SourceFamily::Naver);
        }
        families
    }

    /// Resolution requested from every source
    pub fn resolution(&self) -> Resolution {
        if self.crawler.full_resolution {
            Resolution::Full
        } else {
            Resolution::Thumbnail
        }
    }
}

/// Task planning and execution behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of parallel download workers
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Skip keywords whose output directory already exists
    #[serde(rename = "skip-existing", default = "default_true")]
    pub skip_existing: bool,

    /// Request full-resolution images instead of thumbnails
    #[serde(rename = "full-resolution", default)]
    pub full_resolution: bool,

    /// Face search mode
    #[serde(default)]
    pub face: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            skip_existing: true,
            full_resolution: false,
            face: false,
        }
    }
}

/// Which source families to collect from
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_true")]
    pub google: bool,
    #[serde(default = "default_true")]
    pub naver: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            google: true,
            naver: true,
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory receiving one subdirectory per keyword
    #[serde(rename = "download-path", default = "default_download_path")]
    pub download_path: PathBuf,

    /// Newline-delimited keyword list, rewritten sorted on every run
    #[serde(rename = "keywords-path", default = "default_keywords_path")]
    pub keywords_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            download_path: default_download_path(),
            keywords_path: default_keywords_path(),
        }
    }
}

/// HTTP client settings for image downloads
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Post-run imbalance audit
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directories below `mean * threshold-ratio` files are flagged
    #[serde(rename = "threshold-ratio", default = "default_threshold_ratio")]
    pub threshold_ratio: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_ratio: default_threshold_ratio(),
        }
    }
}

/// External link collector program
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_collector_command")]
    pub command: String,

    /// Extra arguments placed before the per-task arguments
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            command: default_collector_command(),
            args: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_threads() -> usize {
    4
}

fn default_download_path() -> PathBuf {
    PathBuf::from("download")
}

fn default_keywords_path() -> PathBuf {
    PathBuf::from("keywords.txt")
}

fn default_user_agent() -> String {
    format!("keyword-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_threshold_ratio() -> f64 {
    0.5
}

fn default_collector_command() -> String {
    "collect-links".to_string()
}
