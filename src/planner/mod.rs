//! Task planning
//!
//! Expands the keyword list into one download task per (keyword, enabled
//! source family), skipping keywords that already have an output directory
//! when asked to.

use crate::config::Config;
use crate::keywords::Keyword;
use crate::source::{Resolution, SourceFamily, SourceVariant};
use std::path::{Path, PathBuf};

/// One unit of parallel work: collect and download links for a keyword
/// from a single source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub keyword: Keyword,
    pub source: SourceVariant,
}

impl DownloadTask {
    pub fn new(keyword: Keyword, source: SourceVariant) -> Self {
        Self { keyword, source }
    }

    /// Directory this task writes into, shared with other sources of the keyword
    pub fn output_dir(&self, download_root: &Path) -> PathBuf {
        download_root.join(&self.keyword)
    }
}

/// Inputs that shape the plan
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub download_root: PathBuf,
    pub families: Vec<SourceFamily>,
    pub resolution: Resolution,
    pub skip_existing: bool,
}

impl PlanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            download_root: config.output.download_path.clone(),
            families: config.enabled_families(),
            resolution: config.resolution(),
            skip_existing: config.crawler.skip_existing,
        }
    }
}

/// Builds the download work list
pub struct TaskPlanner {
    options: PlanOptions,
}

impl TaskPlanner {
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    /// Expands keywords into tasks, keyword order first, then source order
    ///
    /// The skip check is per keyword: if its directory exists no source is
    /// planned for it, even if only one source finished previously. Keywords
    /// that are not a plain directory name are never planned.
    pub fn plan(&self, keywords: &[Keyword]) -> Vec<DownloadTask> {
        let mut tasks = Vec::with_capacity(keywords.len() * self.options.families.len());

        for keyword in keywords {
            if !keyword.is_directory_name() {
                tracing::warn!(
                    "Skipping keyword {:?}: not usable as a directory name under {}",
                    keyword.as_str(),
                    self.options.download_root.display()
                );
                continue;
            }

            let dir = self.options.download_root.join(keyword);
            if self.options.skip_existing && dir.exists() {
                tracing::info!("Skipping already existing directory {}", dir.display());
                continue;
            }

            for family in &self.options.families {
                tasks.push(DownloadTask::new(
                    keyword.clone(),
                    SourceVariant::new(*family, self.options.resolution),
                ));
            }
        }

        tracing::debug!(
            "Planned {} tasks for {} keywords",
            tasks.len(),
            keywords.len()
        );

        tasks
    }
}
