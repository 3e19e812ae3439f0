//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::catalog::{self, BookInfo, Testament};
use crate::crawler::ChapterData;
use crate::state::CrawlStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{BookRecord, CheckpointRecord, FootnoteRecord, VerseRecord, VersionRecord};
use crate::HarvestError;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database, used by tests and dry runs
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Maps SQLite constraint failures to `ConstraintViolation`
fn map_constraint(err: rusqlite::Error, what: String) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _) if e.code == ErrorCode::ConstraintViolation => {
            StorageError::ConstraintViolation(what)
        }
        other => StorageError::Sqlite(other),
    }
}

fn checkpoint_from_row(row: &Row<'_>) -> rusqlite::Result<CheckpointRecord> {
    Ok(CheckpointRecord {
        version_code: row.get(0)?,
        book_code: row.get(1)?,
        chapter: row.get(2)?,
        status: CrawlStatus::from_db_string(&row.get::<_, String>(3)?)
            .unwrap_or(CrawlStatus::Pending),
        verse_count: row.get(4)?,
        crawled_at: row.get(5)?,
        error_message: row.get(6)?,
    })
}

const CHECKPOINT_COLUMNS: &str =
    "version_code, book_code, chapter, status, verse_count, crawled_at, error_msg";

impl Storage for SqliteStorage {
    // ===== Metadata =====

    fn upsert_version(&mut self, code: &str, name: &str, lang: &str) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT OR IGNORE INTO versions (code, name, lang) VALUES (?1, ?2, ?3)",
            params![code, name, lang],
        )?;

        let id = self.conn.query_row(
            "SELECT id FROM versions WHERE code = ?1",
            params![code],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn upsert_book(
        &mut self,
        version_id: i64,
        book: &BookInfo,
        sort_order: u32,
    ) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT OR IGNORE INTO books
             (version_id, code, name_ko, abbrev_ko, testament, chapter_count, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                version_id,
                book.code,
                book.name,
                book.abbrev,
                book.testament.to_db_string(),
                book.chapter_count,
                sort_order
            ],
        )?;

        let id = self.conn.query_row(
            "SELECT id FROM books WHERE version_id = ?1 AND code = ?2",
            params![version_id, book.code],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn get_version(&self, code: &str) -> StorageResult<Option<VersionRecord>> {
        let version = self
            .conn
            .query_row(
                "SELECT id, code, name, lang FROM versions WHERE code = ?1",
                params![code],
                |row| {
                    Ok(VersionRecord {
                        id: row.get(0)?,
                        code: row.get(1)?,
                        name: row.get(2)?,
                        lang: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(version)
    }

    fn get_book(&self, version_code: &str, book_code: &str) -> StorageResult<Option<BookRecord>> {
        let book = self
            .conn
            .query_row(
                "SELECT b.id, b.version_id, b.code, b.name_ko, b.abbrev_ko, b.testament,
                        b.chapter_count, b.sort_order
                 FROM books b
                 JOIN versions v ON b.version_id = v.id
                 WHERE v.code = ?1 AND b.code = ?2",
                params![version_code, book_code],
                |row| {
                    Ok(BookRecord {
                        id: row.get(0)?,
                        version_id: row.get(1)?,
                        code: row.get(2)?,
                        name: row.get(3)?,
                        abbrev: row.get(4)?,
                        testament: Testament::from_db_string(&row.get::<_, String>(5)?)
                            .unwrap_or(Testament::Old),
                        chapter_count: row.get(6)?,
                        sort_order: row.get(7)?,
                    })
                },
            )
            .optional()?;

        Ok(book)
    }

    // ===== Verses =====

    fn insert_verse(
        &mut self,
        book_id: i64,
        chapter: u32,
        verse_num: u32,
        text: &str,
        section_title: Option<&str>,
        has_footnote: bool,
    ) -> StorageResult<i64> {
        self.conn
            .execute(
                "INSERT INTO verses (book_id, chapter, verse_num, text, section_title, has_footnote)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![book_id, chapter, verse_num, text, section_title, has_footnote],
            )
            .map_err(|e| {
                map_constraint(
                    e,
                    format!("verse {}:{} already stored for book {}", chapter, verse_num, book_id),
                )
            })?;

        Ok(self.conn.last_insert_rowid())
    }

    fn insert_footnote(&mut self, verse_id: i64, marker: &str, content: &str) -> StorageResult<()> {
        self.conn
            .execute(
                "INSERT INTO footnotes (verse_id, marker, content) VALUES (?1, ?2, ?3)",
                params![verse_id, marker, content],
            )
            .map_err(|e| map_constraint(e, format!("no verse with id {}", verse_id)))?;
        Ok(())
    }

    fn save_chapter(
        &mut self,
        version_code: &str,
        book_id: i64,
        book_code: &str,
        chapter: u32,
        data: &ChapterData,
    ) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM footnotes WHERE verse_id IN
                 (SELECT id FROM verses WHERE book_id = ?1 AND chapter = ?2)",
            params![book_id, chapter],
        )?;
        tx.execute(
            "DELETE FROM verses WHERE book_id = ?1 AND chapter = ?2",
            params![book_id, chapter],
        )?;

        {
            let mut insert_verse = tx.prepare(
                "INSERT INTO verses (book_id, chapter, verse_num, text, section_title, has_footnote)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            let mut insert_footnote = tx.prepare(
                "INSERT INTO footnotes (verse_id, marker, content) VALUES (?1, ?2, ?3)",
            )?;

            for verse in &data.verses {
                let verse_id = insert_verse
                    .insert(params![
                        book_id,
                        chapter,
                        verse.number,
                        verse.text,
                        verse.section_title,
                        verse.has_footnote()
                    ])
                    .map_err(|e| {
                        map_constraint(
                            e,
                            format!("duplicate verse {} {}:{}", book_code, chapter, verse.number),
                        )
                    })?;

                for footnote in &verse.footnotes {
                    insert_footnote.execute(params![verse_id, footnote.marker, footnote.content])?;
                }
            }
        }

        let verse_count = data.verses.len();
        tx.execute(
            "INSERT OR REPLACE INTO crawl_status
             (version_code, book_code, chapter, status, verse_count, crawled_at, error_msg)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)",
            params![
                version_code,
                book_code,
                chapter,
                CrawlStatus::Done.to_db_string(),
                verse_count as i64,
                Utc::now().to_rfc3339()
            ],
        )?;

        tx.commit()?;
        Ok(verse_count)
    }

    fn get_verses(
        &self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
    ) -> StorageResult<Vec<VerseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT v.id, v.book_id, v.chapter, v.verse_num, v.text, v.section_title,
                    v.has_footnote, b.name_ko, b.code
             FROM verses v
             JOIN books b ON v.book_id = b.id
             JOIN versions ver ON b.version_id = ver.id
             WHERE ver.code = ?1 AND b.code = ?2 AND v.chapter = ?3
             ORDER BY v.verse_num",
        )?;

        let verses = stmt
            .query_map(params![version_code, book_code, chapter], |row| {
                Ok(VerseRecord {
                    id: row.get(0)?,
                    book_id: row.get(1)?,
                    chapter: row.get(2)?,
                    verse_num: row.get(3)?,
                    text: row.get(4)?,
                    section_title: row.get(5)?,
                    has_footnote: row.get(6)?,
                    book_name: row.get(7)?,
                    book_code: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(verses)
    }

    fn get_footnotes(&self, verse_id: i64) -> StorageResult<Vec<FootnoteRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, verse_id, marker, content FROM footnotes WHERE verse_id = ?1 ORDER BY id",
        )?;

        let footnotes = stmt
            .query_map(params![verse_id], |row| {
                Ok(FootnoteRecord {
                    id: row.get(0)?,
                    verse_id: row.get(1)?,
                    marker: row.get(2)?,
                    content: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(footnotes)
    }

    fn count_verses(&self, version_code: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM verses v
             JOIN books b ON v.book_id = b.id
             JOIN versions ver ON b.version_id = ver.id
             WHERE ver.code = ?1",
            params![version_code],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ===== Checkpoints =====

    fn get_crawl_status(
        &self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
    ) -> StorageResult<CrawlStatus> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM crawl_status
                 WHERE version_code = ?1 AND book_code = ?2 AND chapter = ?3",
                params![version_code, book_code, chapter],
                |row| row.get(0),
            )
            .optional()?;

        Ok(status
            .as_deref()
            .and_then(CrawlStatus::from_db_string)
            .unwrap_or_default())
    }

    fn get_checkpoint(
        &self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
    ) -> StorageResult<Option<CheckpointRecord>> {
        let checkpoint = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM crawl_status
                     WHERE version_code = ?1 AND book_code = ?2 AND chapter = ?3",
                    CHECKPOINT_COLUMNS
                ),
                params![version_code, book_code, chapter],
                checkpoint_from_row,
            )
            .optional()?;

        Ok(checkpoint)
    }

    fn set_crawl_status(
        &mut self,
        version_code: &str,
        book_code: &str,
        chapter: u32,
        status: CrawlStatus,
        verse_count: u32,
        error_message: Option<&str>,
    ) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO crawl_status
             (version_code, book_code, chapter, status, verse_count, crawled_at, error_msg)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(version_code, book_code, chapter) DO UPDATE SET
                 status = excluded.status,
                 verse_count = excluded.verse_count,
                 crawled_at = excluded.crawled_at,
                 error_msg = excluded.error_msg",
            params![
                version_code,
                book_code,
                chapter,
                status.to_db_string(),
                verse_count,
                Utc::now().to_rfc3339(),
                error_message
            ],
        )?;
        Ok(())
    }

    fn count_checkpoints(&self, version_code: &str, status: CrawlStatus) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM crawl_status WHERE version_code = ?1 AND status = ?2",
            params![version_code, status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn get_failed_checkpoints(&self, version_code: &str) -> StorageResult<Vec<CheckpointRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM crawl_status WHERE version_code = ?1 AND status = ?2",
            CHECKPOINT_COLUMNS
        ))?;

        let mut failed = stmt
            .query_map(
                params![version_code, CrawlStatus::Error.to_db_string()],
                checkpoint_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        failed.sort_by_key(|c| {
            (
                catalog::sort_order(&c.book_code).unwrap_or(usize::MAX),
                c.chapter,
            )
        });

        Ok(failed)
    }

    // ===== Reset =====

    fn delete_crawl_data(
        &mut self,
        version_code: &str,
        book_code: Option<&str>,
    ) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;

        let book_scope = "SELECT b.id FROM books b
                          JOIN versions ver ON b.version_id = ver.id
                          WHERE ver.code = ?1 AND (?2 IS NULL OR b.code = ?2)";

        tx.execute(
            &format!(
                "DELETE FROM footnotes WHERE verse_id IN
                     (SELECT id FROM verses WHERE book_id IN ({}))",
                book_scope
            ),
            params![version_code, book_code],
        )?;
        let deleted = tx.execute(
            &format!("DELETE FROM verses WHERE book_id IN ({})", book_scope),
            params![version_code, book_code],
        )?;
        tx.execute(
            "DELETE FROM crawl_status
             WHERE version_code = ?1 AND (?2 IS NULL OR book_code = ?2)",
            params![version_code, book_code],
        )?;

        tx.commit()?;
        Ok(deleted)
    }
}
