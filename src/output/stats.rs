//! Statistics generation from the harvest database
//!
//! This module provides functionality for extracting and displaying
//! checkpoint statistics from the storage layer.

use crate::catalog::total_chapters;
use crate::state::CrawlStatus;
use crate::storage::{CheckpointRecord, Storage};
use crate::HarvestError;

/// Checkpoint statistics for one version
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub version_code: String,

    /// Chapters in the catalog
    pub total_chapters: u64,

    /// Chapters stored successfully
    pub done: u64,

    /// Chapters whose last attempt failed
    pub errored: u64,

    /// Chapters never attempted, or explicitly pending
    pub pending: u64,

    /// Verses stored for the version
    pub verse_count: u64,

    /// Failed chapters in canonical order
    pub failed: Vec<CheckpointRecord>,
}

impl CrawlStatistics {
    /// Share of catalog chapters stored, in percent
    pub fn completion_percent(&self) -> f64 {
        if self.total_chapters == 0 {
            0.0
        } else {
            (self.done as f64 / self.total_chapters as f64) * 100.0
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `version_code` - Version whose checkpoints are summarized
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(HarvestError)` - Failed to query statistics
pub fn load_statistics(
    storage: &dyn Storage,
    version_code: &str,
) -> Result<CrawlStatistics, HarvestError> {
    let total = u64::from(total_chapters());
    let done = storage.count_checkpoints(version_code, CrawlStatus::Done)?;
    let errored = storage.count_checkpoints(version_code, CrawlStatus::Error)?;
    let verse_count = storage.count_verses(version_code)?;
    let failed = storage.get_failed_checkpoints(version_code)?;

    Ok(CrawlStatistics {
        version_code: version_code.to_string(),
        total_chapters: total,
        done,
        errored,
        pending: total.saturating_sub(done + errored),
        verse_count,
        failed,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Harvest Statistics ({}) ===\n", stats.version_code);

    println!("Chapters:");
    println!("  Total:   {}", stats.total_chapters);
    println!("  Done:    {}", stats.done);
    println!("  Error:   {}", stats.errored);
    println!("  Pending: {}", stats.pending);
    println!();

    println!("Verses stored: {}", stats.verse_count);
    println!();

    if !stats.failed.is_empty() {
        println!("Failed Chapters ({}):", stats.failed.len());
        for checkpoint in &stats.failed {
            println!(
                "  - {} {}: {}",
                checkpoint.book_code,
                checkpoint.chapter,
                checkpoint.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        println!();
    }

    println!(
        "Completion: {:.1}% ({} / {} chapters)",
        stats.completion_percent(),
        stats.done,
        stats.total_chapters
    );
}
