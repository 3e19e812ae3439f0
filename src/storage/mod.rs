//! Storage module for persisting harvested text
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and schema management
//! - Version and book metadata rows
//! - Verses and their footnotes
//! - Per-chapter crawl checkpoints used for resumption

mod schema;
mod sqlite;
mod traits;

pub use schema::SCHEMA_VERSION;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::catalog::Testament;
use crate::state::CrawlStatus;
use crate::HarvestError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(HarvestError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, HarvestError> {
    SqliteStorage::new(path)
}

/// A corpus version row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub lang: String,
}

/// A book row, scoped to one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: i64,
    pub version_id: i64,
    pub code: String,
    pub name: String,
    pub abbrev: String,
    pub testament: Testament,
    pub chapter_count: u32,
    pub sort_order: u32,
}

/// A stored verse, joined with its book for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRecord {
    pub id: i64,
    pub book_id: i64,
    pub chapter: u32,
    pub verse_num: u32,
    pub text: String,
    pub section_title: Option<String>,
    pub has_footnote: bool,
    pub book_name: String,
    pub book_code: String,
}

/// A stored footnote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteRecord {
    pub id: i64,
    pub verse_id: i64,
    pub marker: String,
    pub content: String,
}

/// Checkpoint for one (version, book, chapter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointRecord {
    pub version_code: String,
    pub book_code: String,
    pub chapter: u32,
    pub status: CrawlStatus,
    pub verse_count: u32,
    pub error_message: Option<String>,

    /// RFC 3339 timestamp of the last attempt
    pub crawled_at: Option<String>,
}
