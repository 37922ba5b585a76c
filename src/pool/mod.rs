//! Bounded worker pool for download tasks
//!
//! A fixed number of workers pull tasks from a shared queue. Each task runs
//! the collector and then the downloader; any failure inside a task is logged
//! and turned into a [`TaskOutcome`], so sibling tasks are never affected.
//! Outcomes flow to a results sink that only logs and tallies them.

mod outcome;

pub use outcome::{print_report, PoolReport, TaskOutcome, TaskResult};

use crate::collector::LinkCollector;
use crate::config::Config;
use crate::downloader::Downloader;
use crate::planner::DownloadTask;
use crate::HarvestError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Pool construction options
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    /// Number of workers
    pub parallelism: usize,

    /// Append the per-source face query modifier when collecting
    pub face: bool,
}

impl PoolOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            parallelism: config.crawler.threads,
            face: config.crawler.face,
        }
    }
}

/// Runs one task end to end; shared by every worker
#[derive(Clone)]
struct TaskRunner {
    collector: Arc<dyn LinkCollector>,
    downloader: Downloader,
    face: bool,
}

impl TaskRunner {
    async fn run(&self, task: &DownloadTask) -> TaskOutcome {
        let source_name = task.source.name();
        tracing::info!("Collecting links... {} from {}", task.keyword, task.source);

        let links = match self
            .collector
            .collect(
                task.keyword.as_str(),
                task.source.family(),
                task.source.resolution(),
                task.source.query_modifier(self.face),
            )
            .await
        {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!(
                    "Link collection failed {}:{} - {}",
                    source_name,
                    task.keyword,
                    e
                );
                return TaskOutcome::CollectorFailed {
                    error: e.to_string(),
                };
            }
        };

        tracing::info!(
            "Downloading images from collected links... {} from {} ({} links)",
            task.keyword,
            source_name,
            links.len()
        );

        match self.downloader.run(task, &links).await {
            Ok(_) if links.is_empty() => {
                tracing::info!("No links collected for {} from {}", task.keyword, source_name);
                TaskOutcome::NoLinks
            }
            Ok(report) => {
                tracing::info!("Done {} : {}", source_name, task.keyword);
                TaskOutcome::Completed {
                    saved: report.saved,
                    failed: report.failed_count(),
                }
            }
            Err(e) => {
                tracing::error!("Task {}:{} failed - {}", source_name, task.keyword, e);
                TaskOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Fixed-size pool executing download tasks in parallel
pub struct WorkerPool {
    runner: TaskRunner,
    parallelism: usize,
}

impl WorkerPool {
    /// Creates a new pool
    ///
    /// # Arguments
    ///
    /// * `collector` - Link source shared by all workers
    /// * `downloader` - Downloader shared by all workers
    /// * `options` - Worker count and face mode
    pub fn new(
        collector: Arc<dyn LinkCollector>,
        downloader: Downloader,
        options: PoolOptions,
    ) -> Self {
        Self {
            runner: TaskRunner {
                collector,
                downloader,
                face: options.face,
            },
            parallelism: options.parallelism,
        }
    }

    /// Runs every task and waits for the pool to drain
    ///
    /// Task failures are reported in the returned [`PoolReport`], never as an
    /// error. Only a pool that cannot schedule work returns `Err`.
    pub async fn execute(&self, tasks: Vec<DownloadTask>) -> Result<PoolReport, HarvestError> {
        if self.parallelism == 0 {
            return Err(HarvestError::Pool(
                "parallelism must be at least 1".to_string(),
            ));
        }

        let submitted = tasks.len();
        let (task_tx, task_rx) = mpsc::channel(submitted.max(1));
        for task in tasks {
            task_tx
                .send(task)
                .await
                .map_err(|_| HarvestError::Pool("task queue closed".to_string()))?;
        }
        // Workers stop once the queue is drained
        drop(task_tx);

        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let sink = tokio::spawn(collect_results(result_rx, submitted));

        let shared_rx = Arc::new(Mutex::new(task_rx));
        let worker_count = self.parallelism.min(submitted.max(1));
        tracing::info!(
            "Starting {} workers for {} tasks",
            worker_count,
            submitted
        );

        let mut join_set = JoinSet::new();
        for worker_idx in 0..worker_count {
            let rx = Arc::clone(&shared_rx);
            let tx = result_tx.clone();
            let runner = self.runner.clone();
            join_set.spawn(async move { run_worker(worker_idx, rx, runner, tx).await });
        }
        drop(result_tx);

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker terminated abnormally: {}", e);
            }
        }

        let mut report = sink
            .await
            .map_err(|e| HarvestError::Pool(format!("results sink failed: {}", e)))?;
        report.finish();

        if report.finished() < submitted {
            tracing::warn!(
                "{} of {} tasks did not report an outcome",
                submitted - report.finished(),
                submitted
            );
        }
        tracing::info!("Task ended. Pool join.");

        Ok(report)
    }
}

async fn run_worker(
    worker_idx: usize,
    receiver: Arc<Mutex<mpsc::Receiver<DownloadTask>>>,
    runner: TaskRunner,
    results: mpsc::UnboundedSender<TaskResult>,
) {
    loop {
        let Some(task) = receive_task(&receiver).await else {
            tracing::debug!("Worker {} terminating (queue drained)", worker_idx);
            break;
        };

        tracing::debug!(
            "Worker {} picked up {} from {}",
            worker_idx,
            task.keyword,
            task.source
        );

        let outcome = runner.run(&task).await;
        let result = TaskResult {
            worker: worker_idx,
            task,
            outcome,
        };

        if results.send(result).is_err() {
            tracing::warn!("Results sink closed; worker {} outcome dropped", worker_idx);
        }
    }
}

async fn receive_task(
    receiver: &Arc<Mutex<mpsc::Receiver<DownloadTask>>>,
) -> Option<DownloadTask> {
    let mut guard = receiver.lock().await;
    guard.recv().await
}

async fn collect_results(
    mut results: mpsc::UnboundedReceiver<TaskResult>,
    submitted: usize,
) -> PoolReport {
    let mut report = PoolReport::new(submitted);

    while let Some(result) = results.recv().await {
        report.record(&result.outcome);
        tracing::debug!(
            "[{}/{}] worker {} finished {} from {}: {:?}",
            report.finished(),
            submitted,
            result.worker,
            result.task.keyword,
            result.task.source,
            result.outcome
        );
    }

    report
}
