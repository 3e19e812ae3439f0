//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the chapter loop that coordinates one crawl:
//! - Registering the version and book rows
//! - Skipping chapters a previous run already finished
//! - Pacing, fetching, parsing and persisting the rest
//! - Recording failures per chapter without aborting the run
//! - Honoring cancellation between and during chapters

use crate::catalog::{all_books, get_book_by_code, BookInfo};
use crate::config::CrawlerOptions;
use crate::crawler::fetcher::{build_http_client, chapter_url, fetch_chapter};
use crate::crawler::parser::parse_chapter_html;
use crate::crawler::progress::{NoopProgress, ProgressObserver};
use crate::crawler::scheduler::RateLimiter;
use crate::state::CrawlStatus;
use crate::storage::Storage;
use crate::HarvestError;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Per-book tallies, logged when a book finishes
#[derive(Debug, Default, Clone, Copy)]
struct BookSummary {
    crawled: u32,
    skipped: u32,
    failed: u32,
    verses: usize,
}

/// Resumable chapter-by-chapter crawler
///
/// The crawler owns its storage exclusively; nothing is cached between
/// chapters, so every decision is made from the persisted checkpoints.
///
/// # Example
///
/// ```no_run
/// use bible_harvest::config::CrawlerOptions;
/// use bible_harvest::crawler::Crawler;
/// use bible_harvest::storage::SqliteStorage;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> bible_harvest::Result<()> {
/// let storage = SqliteStorage::new(std::path::Path::new("bible.db"))?;
/// let mut crawler = Crawler::new(storage, CrawlerOptions::default())?;
/// crawler.crawl_book(&CancellationToken::new(), "gen").await?;
/// # Ok(())
/// # }
/// ```
pub struct Crawler<S: Storage> {
    pub(super) storage: S,
    pub(super) options: CrawlerOptions,
    client: Client,
    limiter: RateLimiter,
    progress: Arc<dyn ProgressObserver>,
}

impl<S: Storage> Crawler<S> {
    /// Creates a crawler with a client built from `options`
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(storage: S, options: CrawlerOptions) -> Result<Self, HarvestError> {
        let client = build_http_client(&options)?;
        let limiter = RateLimiter::new(options.requests_per_second);

        Ok(Self {
            storage,
            options,
            client,
            limiter,
            progress: Arc::new(NoopProgress),
        })
    }

    /// Replaces the progress observer
    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Replaces the HTTP client built from the options
    ///
    /// The injected client's own user agent, headers and timeouts are used
    /// as-is for every chapter request.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn options(&self) -> &CrawlerOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Registers the configured version and all catalog books
    ///
    /// Safe to call repeatedly; existing rows keep their ids.
    ///
    /// # Returns
    ///
    /// The version row id
    pub fn ensure_metadata(&mut self) -> Result<i64, HarvestError> {
        let version_id = self.storage.upsert_version(
            &self.options.version_code,
            &self.options.version_name,
            &self.options.version_lang,
        )?;

        for (index, book) in all_books().iter().enumerate() {
            self.storage.upsert_book(version_id, book, index as u32 + 1)?;
        }

        debug!(
            "Metadata ready for version {} ({} books)",
            self.options.version_code,
            all_books().len()
        );

        Ok(version_id)
    }

    /// Crawls every book, then validates the result
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every chapter is stored and passed validation
    /// * `Err(HarvestError::Cancelled)` - The token fired
    /// * `Err(HarvestError)` - Setup failed or validation found a gap
    pub async fn crawl_all(&mut self, cancel: &CancellationToken) -> Result<(), HarvestError> {
        self.ensure_metadata()?;

        info!(
            "Crawling all {} books of {}",
            all_books().len(),
            self.options.version_code
        );

        for book in all_books() {
            self.crawl_chapters(book, cancel).await?;
        }

        self.validate(cancel)
    }

    /// Crawls every chapter of one book
    ///
    /// Chapter failures are recorded as `error` checkpoints and do not fail
    /// the call.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every chapter was attempted
    /// * `Err(HarvestError::UnknownBook)` - The code is not in the catalog; nothing was touched
    /// * `Err(HarvestError::Cancelled)` - The token fired
    pub async fn crawl_book(
        &mut self,
        cancel: &CancellationToken,
        book_code: &str,
    ) -> Result<(), HarvestError> {
        let book = get_book_by_code(book_code)
            .ok_or_else(|| HarvestError::UnknownBook(book_code.to_string()))?;

        self.ensure_metadata()?;
        self.crawl_chapters(book, cancel).await
    }

    /// Deletes stored verses and checkpoints so the next run fetches again
    ///
    /// # Returns
    ///
    /// The number of verses removed
    pub fn reset(&mut self, book_code: Option<&str>) -> Result<usize, HarvestError> {
        let book = match book_code {
            Some(code) => Some(
                get_book_by_code(code)
                    .ok_or_else(|| HarvestError::UnknownBook(code.to_string()))?
                    .code,
            ),
            None => None,
        };

        let deleted = self
            .storage
            .delete_crawl_data(&self.options.version_code, book)?;

        info!(
            "Reset {} ({}): removed {} verses",
            self.options.version_code,
            book.unwrap_or("all books"),
            deleted
        );

        Ok(deleted)
    }

    async fn crawl_chapters(
        &mut self,
        book: &'static BookInfo,
        cancel: &CancellationToken,
    ) -> Result<(), HarvestError> {
        let version = self.options.version_code.clone();
        let record = self.storage.get_book(&version, book.code)?.ok_or_else(|| {
            HarvestError::BookNotRegistered {
                version: version.clone(),
                book: book.code.to_string(),
            }
        })?;

        let mut summary = BookSummary::default();

        for chapter in 1..=book.chapter_count {
            if cancel.is_cancelled() {
                info!("Crawl cancelled before {} {}", book.code, chapter);
                return Err(HarvestError::Cancelled);
            }

            let status = self.storage.get_crawl_status(&version, book.code, chapter)?;
            if status.is_done() {
                debug!("Skipping {} {} (already done)", book.code, chapter);
                summary.skipped += 1;
                self.progress
                    .on_chapter_done(book.name, chapter, book.chapter_count);
                continue;
            }

            match self.crawl_chapter(record.id, book, chapter, cancel).await {
                Ok(verse_count) => {
                    debug!("Stored {} {} ({} verses)", book.code, chapter, verse_count);
                    summary.crawled += 1;
                    summary.verses += verse_count;
                    self.progress
                        .on_chapter_done(book.name, chapter, book.chapter_count);
                }
                Err(e) if e.is_chapter_scoped() => {
                    warn!("Failed {} {}: {}", book.code, chapter, e);
                    summary.failed += 1;

                    let message = e.to_string();
                    if let Err(write_err) = self.storage.set_crawl_status(
                        &version,
                        book.code,
                        chapter,
                        CrawlStatus::Error,
                        0,
                        Some(&message),
                    ) {
                        error!(
                            "Could not record failure for {} {}: {}",
                            book.code, chapter, write_err
                        );
                    }
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "{} ({}): {} crawled, {} skipped, {} failed, {} verses",
            book.name, book.code, summary.crawled, summary.skipped, summary.failed, summary.verses
        );

        Ok(())
    }

    /// Throttle, fetch, parse and persist one chapter
    async fn crawl_chapter(
        &mut self,
        book_id: i64,
        book: &BookInfo,
        chapter: u32,
        cancel: &CancellationToken,
    ) -> Result<usize, HarvestError> {
        self.limiter.acquire(cancel).await?;

        let url = chapter_url(
            &self.options.base_url,
            &self.options.version_code,
            book.code,
            chapter,
        )?;
        let html = fetch_chapter(&self.client, &url, cancel).await?;
        let data = parse_chapter_html(&html)?;

        let count = self.storage.save_chapter(
            &self.options.version_code,
            book_id,
            book.code,
            chapter,
            &data,
        )?;

        Ok(count)
    }
}
