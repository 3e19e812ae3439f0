//! Crawler module for chapter fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with charset-aware decoding
//! - Structural parsing of chapter pages
//! - Request pacing
//! - Overall crawl coordination and validation

mod coordinator;
mod fetcher;
mod parser;
mod progress;
mod scheduler;
mod validate;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, chapter_url, fetch_chapter};
pub use parser::{parse_chapter_html, ChapterData, FootnoteData, ParseError, VerseData};
pub use progress::{NoopProgress, ProgressObserver};
pub use scheduler::RateLimiter;
