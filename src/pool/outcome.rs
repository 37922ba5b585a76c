//! Per-task outcomes and the run report built from them

use crate::planner::DownloadTask;
use chrono::{DateTime, Utc};

/// Terminal state of one download task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Links were collected and the download loop ran
    Completed { saved: usize, failed: usize },

    /// The collector returned no links
    NoLinks,

    /// The collector failed; the task was treated as having no links
    CollectorFailed { error: String },

    /// The output directory could not be created
    Failed { error: String },
}

/// Outcome reported by a worker for one task
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub worker: usize,
    pub task: DownloadTask,
    pub outcome: TaskOutcome,
}

/// Tally of a worker pool run, used for logging and the final summary
#[derive(Debug, Clone)]
pub struct PoolReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Tasks handed to the pool
    pub submitted: usize,

    pub completed: usize,
    pub no_links: usize,
    pub collector_failed: usize,
    pub failed: usize,

    pub files_saved: usize,
    pub links_failed: usize,
}

impl PoolReport {
    pub fn new(submitted: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            submitted,
            completed: 0,
            no_links: 0,
            collector_failed: 0,
            failed: 0,
            files_saved: 0,
            links_failed: 0,
        }
    }

    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Completed { saved, failed } => {
                self.completed += 1;
                self.files_saved += saved;
                self.links_failed += failed;
            }
            TaskOutcome::NoLinks => self.no_links += 1,
            TaskOutcome::CollectorFailed { .. } => self.collector_failed += 1,
            TaskOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Number of tasks that reached a terminal state
    pub fn finished(&self) -> usize {
        self.completed + self.no_links + self.collector_failed + self.failed
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the run report to stdout
pub fn print_report(report: &PoolReport) {
    println!("=== Download Summary ===\n");

    println!("Tasks:");
    println!("  Submitted: {}", report.submitted);
    println!("  Completed: {}", report.completed);
    println!("  No links: {}", report.no_links);
    println!("  Collector failures: {}", report.collector_failed);
    if report.failed > 0 {
        println!("  Failed: {}", report.failed);
    }
    println!();

    println!("Files:");
    println!("  Saved: {}", report.files_saved);
    println!("  Failed links: {}", report.links_failed);
    println!();

    println!("Started: {}", report.started_at.to_rfc3339());
    if let (Some(finished), Some(secs)) = (report.finished_at, report.duration_seconds()) {
        println!("Finished: {} ({}s)", finished.to_rfc3339(), secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tallies_outcomes() {
        let mut report = PoolReport::new(4);
        report.record(&TaskOutcome::Completed { saved: 5, failed: 1 });
        report.record(&TaskOutcome::Completed { saved: 2, failed: 0 });
        report.record(&TaskOutcome::NoLinks);
        report.record(&TaskOutcome::CollectorFailed {
            error: "timeout".to_string(),
        });

        assert_eq!(report.completed, 2);
        assert_eq!(report.files_saved, 7);
        assert_eq!(report.links_failed, 1);
        assert_eq!(report.no_links, 1);
        assert_eq!(report.collector_failed, 1);
        assert_eq!(report.finished(), 4);
    }

    #[test]
    fn test_duration_requires_finish() {
        let mut report = PoolReport::new(0);
        assert!(report.duration_seconds().is_none());

        report.finish();
        assert!(report.duration_seconds().unwrap() >= 0);
    }
}
