//! Post-run imbalance audit
//!
//! This module handles:
//! - Counting files per keyword directory after the pool drains
//! - Flagging directories far below the average count
//! - Removing flagged directories after confirmation

mod confirm;

pub use confirm::{is_affirmative, ConfirmationProvider, FixedAnswer, StdinConfirmation};

use crate::HarvestError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default fraction of the mean below which a directory is undersized
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.5;

/// File counts per keyword directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditRecord {
    pub counts: BTreeMap<PathBuf, usize>,
}

impl AuditRecord {
    /// Arithmetic mean of the file counts, zero when there are no directories
    pub fn mean(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let total: usize = self.counts.values().sum();
        total as f64 / self.counts.len() as f64
    }

    /// Directories whose count is strictly below `mean * ratio`
    pub fn undersized(&self, ratio: f64) -> BTreeMap<PathBuf, usize> {
        let limit = self.mean() * ratio;
        self.counts
            .iter()
            .filter(|(_, count)| (**count as f64) < limit)
            .map(|(dir, count)| (dir.clone(), *count))
            .collect()
    }
}

/// Result of the remediation step
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationOutcome {
    /// No directory was flagged
    Balanced,

    /// Directories were flagged but the user declined removal
    Declined(BTreeMap<PathBuf, usize>),

    /// Removal was confirmed; a directory that could not be removed is
    /// reported in `failed` and does not stop the others
    Removed {
        removed: Vec<PathBuf>,
        failed: Vec<PathBuf>,
    },
}

/// Counts files in every immediate subdirectory of the download root
///
/// Files directly in the root are ignored; nested files count toward their
/// top-level directory. A missing root yields an empty record.
pub fn audit(download_root: &Path) -> Result<AuditRecord, HarvestError> {
    let mut record = AuditRecord::default();
    if !download_root.exists() {
        return Ok(record);
    }

    let entries = std::fs::read_dir(download_root).map_err(|e| HarvestError::Scan {
        path: download_root.to_path_buf(),
        message: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let dir = entry.path();
        let count = count_files(&dir)?;
        record.counts.insert(dir, count);
    }

    Ok(record)
}

fn count_files(dir: &Path) -> Result<usize, HarvestError> {
    let mut count = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| HarvestError::Scan {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// Prints every directory's count and the mean
pub fn print_audit(record: &AuditRecord) {
    println!("=== Data Imbalance Check ===\n");
    for (dir, count) in &record.counts {
        println!("  dir: {}, file_count: {}", dir.display(), count);
    }
    println!("\n  Average file count: {:.2}", record.mean());
    println!();
}

/// Offers to remove undersized directories
///
/// # Arguments
///
/// * `record` - Counts from [`audit`]
/// * `threshold_ratio` - Fraction of the mean below which a directory is flagged
/// * `confirm` - Source of the yes/no answer
///
/// # Returns
///
/// What was done. Removal failures are logged and listed in the outcome
/// rather than aborting, so the caller always learns which directories are
/// already gone.
pub fn remediate(
    record: &AuditRecord,
    threshold_ratio: f64,
    confirm: &mut dyn ConfirmationProvider,
) -> RemediationOutcome {
    let flagged = record.undersized(threshold_ratio);
    if flagged.is_empty() {
        tracing::info!("Data imbalance not detected.");
        return RemediationOutcome::Balanced;
    }

    println!("Data imbalance detected.");
    println!(
        "Below keywords have smaller than {:.0}% of average file count ({:.2}).",
        threshold_ratio * 100.0,
        record.mean()
    );
    println!("Removing them and re-running with skip-existing re-downloads those keywords.");
    println!("_________________________________");
    println!("Too small file count directories:");
    for (dir, count) in &flagged {
        println!("  dir: {}, file_count: {}", dir.display(), count);
    }

    if !confirm.confirm("Remove directories above?") {
        tracing::info!("Keeping {} undersized directories", flagged.len());
        return RemediationOutcome::Declined(flagged);
    }

    tracing::info!("Removing too small file count directories...");
    let mut removed = Vec::with_capacity(flagged.len());
    let mut failed = Vec::new();
    for dir in flagged.into_keys() {
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::info!("Removed {}", dir.display());
                removed.push(dir);
            }
            Err(e) => {
                tracing::warn!("Failed to remove {}: {}", dir.display(), e);
                failed.push(dir);
            }
        }
    }

    RemediationOutcome::Removed { removed, failed }
}
