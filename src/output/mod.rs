//! Output module for reporting harvest progress
//!
//! This module handles:
//! - Summarizing checkpoints and stored verses
//! - Printing the summary for the `--stats` mode

pub mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStatistics};
