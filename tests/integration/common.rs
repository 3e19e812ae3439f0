//! Shared fixtures and helpers

use bible_harvest::catalog::all_books;
use bible_harvest::config::CrawlerOptions;
use bible_harvest::crawler::{ChapterData, Crawler, ProgressObserver, VerseData};
use bible_harvest::storage::{SqliteStorage, Storage};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Recorded page for Genesis 1: 31 verses, a section title before verse 1
/// and one footnote on verse 2
pub const GENESIS_1: &str = include_str!("../fixtures/genesis_1.html");

pub const READ_PATH: &str = "/bible/korbibReadpage.php";

pub fn test_options(server: &MockServer, requests_per_second: f64) -> CrawlerOptions {
    CrawlerOptions {
        base_url: format!("{}{}", server.uri(), READ_PATH),
        requests_per_second,
        timeout: Duration::from_secs(5),
        user_agent: "BibleHarvestTest/1.0 (integration)".to_string(),
        ..CrawlerOptions::default()
    }
}

pub fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_bytes(body.as_bytes().to_vec())
}

/// Mounts a page for one chapter and expects it to be requested `times` times
pub async fn mount_chapter(
    server: &MockServer,
    book: &str,
    chapter: u32,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(READ_PATH))
        .and(query_param("version", "GAE"))
        .and(query_param("book", book))
        .and(query_param("chap", chapter.to_string()))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Builds a crawler over a fresh in-memory database
pub fn memory_crawler(options: CrawlerOptions) -> Crawler<SqliteStorage> {
    let storage = SqliteStorage::new_in_memory().expect("in-memory database");
    Crawler::new(storage, options).expect("crawler")
}

/// Collects progress notifications
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<(String, u32, u32)>>,
}

impl RecordingProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(String, u32, u32)> {
        self.events.lock().unwrap().clone()
    }

    pub fn chapters(&self) -> Vec<u32> {
        self.events().into_iter().map(|(_, chapter, _)| chapter).collect()
    }
}

impl ProgressObserver for RecordingProgress {
    fn on_chapter_done(&self, book_name: &str, chapter: u32, total: u32) {
        self.events
            .lock()
            .unwrap()
            .push((book_name.to_string(), chapter, total));
    }
}

pub fn single_verse_chapter() -> ChapterData {
    ChapterData {
        verses: vec![VerseData {
            number: 1,
            text: "저장된 본문".to_string(),
            ..VerseData::default()
        }],
    }
}

/// Stores one verse for every catalog chapter except those listed
pub fn populate_except(crawler: &mut Crawler<SqliteStorage>, skip: &[(&str, u32)]) {
    crawler.ensure_metadata().unwrap();
    let data = single_verse_chapter();

    for book in all_books() {
        let book_id = crawler
            .storage()
            .get_book("GAE", book.code)
            .unwrap()
            .unwrap()
            .id;

        for chapter in 1..=book.chapter_count {
            if skip.contains(&(book.code, chapter)) {
                continue;
            }
            crawler
                .storage_mut()
                .save_chapter("GAE", book_id, book.code, chapter, &data)
                .unwrap();
        }
    }
}
