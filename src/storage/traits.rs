//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::catalog::BookInfo;
use crate::crawler::ChapterData;
use crate::state::CrawlStatus;
use crate::storage::{BookRecord, CheckpointRecord, FootnoteRecord, VerseRecord, VersionRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the crawler and
/// the validator. The orchestrator owns its storage exclusively, so writes
/// take `&mut self` and no internal locking is expected.
pub trait Storage {
    // ===== Metadata =====

    /// Inserts a version row or returns the id of the existing one
    fn upsert_version(&mut self, code: &str, name: &str, lang: &str) -> StorageResult<i64>;

    /// Inserts a book row for a version or returns the id of the existing one
    ///
    /// # Arguments
    ///
    /// * `version_id` - Owning version row
    /// * `book` - Catalog entry to register
    /// * `sort_order` - 1-based canonical position
    fn upsert_book(&mut self, version_id: i64, book: &BookInfo, sort_order: u32)
        -> StorageResult<i64>;

    /// Gets a version by code
    fn get_version(&self, code: &str) -> StorageResult<Option<VersionRecord>>;

    /// Gets a book registered for a version
    fn get_book(&self, version_code: &str, book_code: &str) -> StorageResult<Option<BookRecord>>;

    // ===== Verses =====

    /// Inserts a single verse
    ///
    /// (book, chapter, verse_num) is unique; a duplicate is a
    /// `ConstraintViolation`.
    fn insert_verse(
        &mut self,
        book_id: i64,
        chapter: u32,
        verse_num: u32,
        text: &str,
        section_title: Option<&str>,
        has_footnote: bool,
    ) -> StorageResult<i64>;

    /// Inserts a footnote for a verse
    fn insert_footnote(&mut self, verse_id: i64, marker: &str, content: &str)
        -> StorageResult<()>;

    /// Replaces a chapter's verses and marks the chapter done, atomically
    ///
    /// Previously stored verses of the chapter are removed first. Verses,
    /// footnotes and the `done` checkpoint are committed together or not at
    /// all.
    ///
    /// # Returns
    ///
    /// The number of verses written
    fn save_chapter(
        &mut self,
        version_code: &str,
        book_id: i64,
        book_code: &str,
        chapter: u32,
        data: &ChapterData,
    ) -> StorageResult<usize>;

    /// Gets the stored verses of a chapter in verse order
    fn get_verses(
        &self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
    ) -> StorageResult<Vec<VerseRecord>>;

    /// Gets the footnotes of a verse in insertion order
    fn get_footnotes(&self, verse_id: i64) -> StorageResult<Vec<FootnoteRecord>>;

    /// Counts all verses stored for a version
    fn count_verses(&self, version_code: &str) -> StorageResult<u64>;

    // ===== Checkpoints =====

    /// Gets a chapter's status; a chapter never attempted reads as `Pending`
    fn get_crawl_status(
        &self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
    ) -> StorageResult<CrawlStatus>;

    /// Gets the full checkpoint row of a chapter
    fn get_checkpoint(
        &self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
    ) -> StorageResult<Option<CheckpointRecord>>;

    /// Creates or overwrites a chapter checkpoint
    fn set_crawl_status(
        &mut self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
        status: CrawlStatus,
        verse_count: u32,
        error_message: Option<&str>,
    ) -> StorageResult<()>;

    /// Counts checkpoints of a version in the given status
    fn count_checkpoints(&self, version_code: &str, status: CrawlStatus) -> StorageResult<u64>;

    /// Gets all `error` checkpoints of a version in canonical order
    fn get_failed_checkpoints(&self, version_code: &str) -> StorageResult<Vec<CheckpointRecord>>;

    // ===== Reset =====

    /// Deletes verses, footnotes and checkpoints of a version, optionally
    /// restricted to one book
    ///
    /// # Returns
    ///
    /// The number of verses deleted
    fn delete_crawl_data(&mut self, version_code: &str, book_code: Option<&str>)
        -> StorageResult<usize>;
}
