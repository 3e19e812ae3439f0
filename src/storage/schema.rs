//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Bible-Harvest database.

/// Current schema version, recorded in `PRAGMA user_version`
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Corpus versions (translations)
CREATE TABLE IF NOT EXISTS versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    lang TEXT NOT NULL DEFAULT 'ko'
);

-- Books registered per version
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    version_id INTEGER NOT NULL REFERENCES versions(id),
    code TEXT NOT NULL,
    name_ko TEXT NOT NULL,
    abbrev_ko TEXT NOT NULL,
    testament TEXT NOT NULL,
    chapter_count INTEGER NOT NULL,
    sort_order INTEGER NOT NULL,
    UNIQUE(version_id, code)
);

CREATE INDEX IF NOT EXISTS idx_books_version ON books(version_id);

-- Verses
CREATE TABLE IF NOT EXISTS verses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL REFERENCES books(id),
    chapter INTEGER NOT NULL,
    verse_num INTEGER NOT NULL,
    text TEXT NOT NULL,
    section_title TEXT,
    has_footnote INTEGER NOT NULL DEFAULT 0,
    UNIQUE(book_id, chapter, verse_num)
);

CREATE INDEX IF NOT EXISTS idx_verses_chapter ON verses(book_id, chapter);

-- Footnotes attached to verses
CREATE TABLE IF NOT EXISTS footnotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    verse_id INTEGER NOT NULL REFERENCES verses(id) ON DELETE CASCADE,
    marker TEXT NOT NULL,
    content TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_footnotes_verse ON footnotes(verse_id);

-- Per-chapter checkpoints
CREATE TABLE IF NOT EXISTS crawl_status (
    version_code TEXT NOT NULL,
    book_code TEXT NOT NULL,
    chapter INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    verse_count INTEGER NOT NULL DEFAULT 0,
    crawled_at TEXT,
    error_msg TEXT,
    PRIMARY KEY (version_code, book_code, chapter)
);

CREATE INDEX IF NOT EXISTS idx_crawl_status_status ON crawl_status(version_code, status);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
