//! Bible-Harvest: a resumable scripture crawler
//!
//! This crate fetches a Bible edition chapter by chapter from a fixed source
//! site, extracts verses, section titles and footnotes from the page markup,
//! and stores them in SQLite with per-chapter checkpoints so interrupted
//! runs pick up where they stopped.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Bible-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML parse error: {0}")]
    Parse(#[from] crawler::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Unknown book code: {0}")]
    UnknownBook(String),

    #[error("Book {book} is not registered for version {version}")]
    BookNotRegistered { version: String, book: String },

    #[error("No verses stored for {book} chapter {chapter}")]
    MissingChapter { book: String, chapter: u32 },

    #[error("Empty verse text at {book} {chapter}:{verse}")]
    EmptyVerse {
        book: String,
        chapter: u32,
        verse: u32,
    },

    #[error("Crawl cancelled")]
    Cancelled,
}

impl HarvestError {
    /// Returns true for failures confined to a single chapter
    ///
    /// Network, markup and persistence failures are recorded against the
    /// chapter's checkpoint and the crawl moves on. Everything else aborts
    /// the whole operation.
    pub fn is_chapter_scoped(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::HttpStatus { .. }
                | Self::Timeout { .. }
                | Self::Reqwest(_)
                | Self::Parse(_)
                | Self::Database(_)
                | Self::Storage(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Bible-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use catalog::{all_books, get_book_by_code, BookInfo, Testament};
pub use config::{Config, CrawlerOptions};
pub use crawler::{parse_chapter_html, ChapterData, Crawler, ProgressObserver};
pub use state::CrawlStatus;
