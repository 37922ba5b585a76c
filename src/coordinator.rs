//! Harvest coordinator - main run orchestration
//!
//! This module wires one run together:
//! - Loading and canonicalizing the keyword file
//! - Planning download tasks
//! - Executing them on the worker pool
//! - Auditing the download root once the pool has drained

use crate::audit::{self, ConfirmationProvider, RemediationOutcome};
use crate::collector::LinkCollector;
use crate::config::Config;
use crate::downloader::{build_http_client, Downloader};
use crate::keywords::load_keywords;
use crate::planner::{DownloadTask, PlanOptions, TaskPlanner};
use crate::pool::{PoolOptions, PoolReport, WorkerPool};
use crate::HarvestError;
use std::sync::Arc;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub keywords: usize,
    pub report: PoolReport,

    /// `None` when the audit step is disabled
    pub audit: Option<RemediationOutcome>,
}

/// Main harvest coordinator
pub struct Coordinator {
    config: Config,
    pool: WorkerPool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `collector` - Link source used by every task
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config, collector: Arc<dyn LinkCollector>) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.http)?;
        let downloader = Downloader::new(client, config.output.download_path.clone());
        let pool = WorkerPool::new(collector, downloader, PoolOptions::from_config(&config));

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads keywords and returns the tasks a run would execute
    ///
    /// The keyword file is rewritten in canonical form as a side effect.
    pub fn plan(&self) -> Result<Vec<DownloadTask>, HarvestError> {
        let keywords = load_keywords(&self.config.output.keywords_path)?;
        Ok(TaskPlanner::new(PlanOptions::from_config(&self.config)).plan(&keywords))
    }

    /// Runs the whole pipeline
    ///
    /// Only a keyword file error, a download root that cannot be created, or a
    /// pool scheduling failure aborts the run; task and link failures are
    /// reported in the summary.
    pub async fn run(
        &self,
        confirm: &mut dyn ConfirmationProvider,
    ) -> Result<RunSummary, HarvestError> {
        let download_root = &self.config.output.download_path;
        std::fs::create_dir_all(download_root)?;

        let keywords = load_keywords(&self.config.output.keywords_path)?;
        let tasks = TaskPlanner::new(PlanOptions::from_config(&self.config)).plan(&keywords);
        tracing::info!(
            "Planned {} tasks from {} keywords",
            tasks.len(),
            keywords.len()
        );

        let report = self.pool.execute(tasks).await?;

        let audit = if self.config.audit.enabled {
            tracing::info!("Data imbalance checking...");
            let record = audit::audit(download_root)?;
            audit::print_audit(&record);
            Some(audit::remediate(
                &record,
                self.config.audit.threshold_ratio,
                confirm,
            ))
        } else {
            tracing::info!("Imbalance audit disabled");
            None
        };

        if let Some(RemediationOutcome::Removed { removed, failed }) = &audit {
            tracing::info!(
                "Removed {} directories; re-run with skip-existing to download them again",
                removed.len()
            );
            if !failed.is_empty() {
                tracing::warn!("{} undersized directories could not be removed", failed.len());
            }
        }

        Ok(RunSummary {
            keywords: keywords.len(),
            report,
            audit,
        })
    }
}
