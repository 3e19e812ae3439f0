//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full chapter cycle end-to-end.

use crate::common::{
    html_response, memory_crawler, mount_chapter, populate_except, test_options,
    RecordingProgress, GENESIS_1, READ_PATH,
};
use bible_harvest::crawler::{ChapterData, Crawler, VerseData};
use bible_harvest::storage::{SqliteStorage, Storage};
use bible_harvest::{CrawlStatus, HarvestError};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_single_chapter_book() {
    let server = MockServer::start().await;
    mount_chapter(&server, "oba", 1, html_response(GENESIS_1), 1).await;

    let progress = RecordingProgress::new();
    let mut crawler = memory_crawler(test_options(&server, 50.0)).with_progress(progress.clone());

    crawler
        .crawl_book(&CancellationToken::new(), "oba")
        .await
        .expect("crawl should succeed");

    let storage = crawler.storage();
    let verses = storage.get_verses("GAE", "oba", 1).unwrap();
    assert_eq!(verses.len(), 31);
    assert_eq!(verses[0].section_title.as_deref(), Some("천지 창조"));
    assert_eq!(verses[0].book_name, "오바댜");
    assert!(verses[1].has_footnote);
    assert!(verses.iter().skip(1).all(|v| v.section_title.is_none()));

    let footnotes = storage.get_footnotes(verses[1].id).unwrap();
    assert_eq!(footnotes.len(), 1);
    assert_eq!(footnotes[0].marker, "1)");
    assert!(footnotes[0].content.contains("또는 형체가 없는"));

    let checkpoint = storage.get_checkpoint("GAE", "oba", 1).unwrap().unwrap();
    assert_eq!(checkpoint.status, CrawlStatus::Done);
    assert_eq!(checkpoint.verse_count, 31);

    assert_eq!(progress.events(), vec![("오바댜".to_string(), 1, 1)]);
}

#[tokio::test]
async fn test_resume_skips_done_chapters() {
    let server = MockServer::start().await;
    mount_chapter(&server, "hag", 1, html_response(GENESIS_1), 0).await;
    mount_chapter(&server, "hag", 2, html_response(GENESIS_1), 1).await;

    let progress = RecordingProgress::new();
    let mut crawler = memory_crawler(test_options(&server, 50.0)).with_progress(progress.clone());
    crawler
        .storage_mut()
        .set_crawl_status("GAE", "hag", 1, CrawlStatus::Done, 15, None)
        .unwrap();

    crawler
        .crawl_book(&CancellationToken::new(), "hag")
        .await
        .unwrap();

    // Skipped chapters are still reported
    assert_eq!(progress.chapters(), vec![1, 2]);
    assert_eq!(
        crawler.storage().get_crawl_status("GAE", "hag", 2).unwrap(),
        CrawlStatus::Done
    );
    assert!(crawler.storage().get_verses("GAE", "hag", 1).unwrap().is_empty());
}

#[tokio::test]
async fn test_chapter_error_is_isolated() {
    let server = MockServer::start().await;
    mount_chapter(&server, "nam", 1, html_response(GENESIS_1), 1).await;
    mount_chapter(&server, "nam", 2, ResponseTemplate::new(500), 1).await;
    mount_chapter(&server, "nam", 3, html_response(GENESIS_1), 1).await;

    let progress = RecordingProgress::new();
    let mut crawler = memory_crawler(test_options(&server, 50.0)).with_progress(progress.clone());

    let result = crawler.crawl_book(&CancellationToken::new(), "nam").await;
    assert!(result.is_ok(), "chapter failures must not fail the book");

    let storage = crawler.storage();
    assert_eq!(storage.get_crawl_status("GAE", "nam", 1).unwrap(), CrawlStatus::Done);
    assert_eq!(storage.get_crawl_status("GAE", "nam", 3).unwrap(), CrawlStatus::Done);

    let failed = storage.get_checkpoint("GAE", "nam", 2).unwrap().unwrap();
    assert_eq!(failed.status, CrawlStatus::Error);
    assert_eq!(failed.verse_count, 0);
    assert!(failed.error_message.unwrap().contains("500"));

    assert_eq!(progress.chapters(), vec![1, 3]);
}

#[tokio::test]
async fn test_markup_failure_recorded_as_error() {
    let server = MockServer::start().await;
    mount_chapter(
        &server,
        "oba",
        1,
        html_response("<html><body><p>점검 중입니다</p></body></html>"),
        1,
    )
    .await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    crawler
        .crawl_book(&CancellationToken::new(), "oba")
        .await
        .unwrap();

    let checkpoint = crawler
        .storage()
        .get_checkpoint("GAE", "oba", 1)
        .unwrap()
        .unwrap();
    assert_eq!(checkpoint.status, CrawlStatus::Error);
    assert!(checkpoint.error_message.unwrap().contains("not found"));
}

#[tokio::test]
async fn test_error_chapter_is_retried_next_run() {
    let server = MockServer::start().await;
    mount_chapter(&server, "oba", 1, html_response(GENESIS_1), 1).await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    crawler
        .storage_mut()
        .set_crawl_status("GAE", "oba", 1, CrawlStatus::Error, 0, Some("HTTP status 503"))
        .unwrap();

    crawler
        .crawl_book(&CancellationToken::new(), "oba")
        .await
        .unwrap();

    let checkpoint = crawler
        .storage()
        .get_checkpoint("GAE", "oba", 1)
        .unwrap()
        .unwrap();
    assert_eq!(checkpoint.status, CrawlStatus::Done);
    assert_eq!(checkpoint.error_message, None);
}

#[tokio::test]
async fn test_precancelled_crawl_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_response(GENESIS_1))
        .expect(0)
        .mount(&server)
        .await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = crawler.crawl_book(&cancel, "gen").await;
    assert!(matches!(result, Err(HarvestError::Cancelled)));
    assert!(crawler.storage().get_checkpoint("GAE", "gen", 1).unwrap().is_none());
}

#[tokio::test]
async fn test_cancel_during_fetch_aborts_without_error_checkpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_response(GENESIS_1).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let result = crawler.crawl_book(&cancel, "gen").await;

    assert!(matches!(result, Err(HarvestError::Cancelled)));
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(
        crawler.storage().get_crawl_status("GAE", "gen", 1).unwrap(),
        CrawlStatus::Pending
    );
}

#[tokio::test]
async fn test_requests_are_paced() {
    let server = MockServer::start().await;
    for chapter in 1..=3 {
        mount_chapter(&server, "nam", chapter, html_response(GENESIS_1), 1).await;
    }

    let mut crawler = memory_crawler(test_options(&server, 10.0));

    let start = Instant::now();
    crawler
        .crawl_book(&CancellationToken::new(), "nam")
        .await
        .unwrap();

    // First request is immediate, the other two wait 100ms each
    assert!(
        start.elapsed() >= Duration::from_millis(180),
        "three requests at 10 rps finished in {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_unknown_book_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_response(GENESIS_1))
        .expect(0)
        .mount(&server)
        .await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    let result = crawler.crawl_book(&CancellationToken::new(), "abc").await;

    assert!(matches!(result, Err(HarvestError::UnknownBook(code)) if code == "abc"));
}

#[tokio::test]
async fn test_recrawl_replaces_stored_verses() {
    let server = MockServer::start().await;
    mount_chapter(&server, "oba", 1, html_response(GENESIS_1), 1).await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    crawler.ensure_metadata().unwrap();
    let book_id = crawler.storage().get_book("GAE", "oba").unwrap().unwrap().id;

    let stale = ChapterData {
        verses: (1..=40)
            .map(|number| VerseData {
                number,
                text: format!("이전 본문 {}", number),
                ..VerseData::default()
            })
            .collect(),
    };
    crawler
        .storage_mut()
        .save_chapter("GAE", book_id, "oba", 1, &stale)
        .unwrap();
    crawler
        .storage_mut()
        .set_crawl_status("GAE", "oba", 1, CrawlStatus::Error, 0, Some("stale"))
        .unwrap();

    crawler
        .crawl_book(&CancellationToken::new(), "oba")
        .await
        .unwrap();

    let verses = crawler.storage().get_verses("GAE", "oba", 1).unwrap();
    assert_eq!(verses.len(), 31);
    assert!(verses.iter().all(|v| !v.text.starts_with("이전 본문")));
    assert_eq!(
        crawler
            .storage()
            .get_checkpoint("GAE", "oba", 1)
            .unwrap()
            .unwrap()
            .verse_count,
        31
    );
}

#[tokio::test]
async fn test_reset_forces_refetch() {
    let server = MockServer::start().await;
    mount_chapter(&server, "oba", 1, html_response(GENESIS_1), 2).await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    let cancel = CancellationToken::new();

    crawler.crawl_book(&cancel, "oba").await.unwrap();
    // Done chapters are not fetched again
    crawler.crawl_book(&cancel, "oba").await.unwrap();

    let removed = crawler.reset(Some("oba")).unwrap();
    assert_eq!(removed, 31);
    assert_eq!(
        crawler.storage().get_crawl_status("GAE", "oba", 1).unwrap(),
        CrawlStatus::Pending
    );

    crawler.crawl_book(&cancel, "oba").await.unwrap();
    assert_eq!(crawler.storage().get_verses("GAE", "oba", 1).unwrap().len(), 31);
}

#[tokio::test]
async fn test_metadata_is_idempotent_across_crawls() {
    let server = MockServer::start().await;
    mount_chapter(&server, "oba", 1, html_response(GENESIS_1), 1).await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    let version_id = crawler.ensure_metadata().unwrap();
    let oba_id = crawler.storage().get_book("GAE", "oba").unwrap().unwrap().id;

    crawler
        .crawl_book(&CancellationToken::new(), "oba")
        .await
        .unwrap();

    assert_eq!(crawler.ensure_metadata().unwrap(), version_id);
    assert_eq!(
        crawler.storage().get_book("GAE", "oba").unwrap().unwrap().id,
        oba_id
    );
}

#[tokio::test]
async fn test_crawl_all_fetches_only_missing_chapters() {
    let server = MockServer::start().await;
    mount_chapter(&server, "oba", 1, html_response(GENESIS_1), 1).await;

    let progress = RecordingProgress::new();
    let mut crawler = memory_crawler(test_options(&server, 50.0)).with_progress(progress.clone());
    populate_except(&mut crawler, &[("oba", 1)]);

    crawler
        .crawl_all(&CancellationToken::new())
        .await
        .expect("crawl_all should validate");

    assert_eq!(progress.events().len(), 1189);
    assert_eq!(crawler.storage().get_verses("GAE", "oba", 1).unwrap().len(), 31);
}

#[tokio::test]
async fn test_crawl_all_reports_gap_from_validation() {
    let server = MockServer::start().await;
    mount_chapter(&server, "oba", 1, ResponseTemplate::new(502), 1).await;

    let mut crawler = memory_crawler(test_options(&server, 50.0));
    populate_except(&mut crawler, &[("oba", 1)]);

    let result = crawler.crawl_all(&CancellationToken::new()).await;
    assert!(matches!(
        result,
        Err(HarvestError::MissingChapter { ref book, chapter: 1 }) if book == "oba"
    ));
}

#[tokio::test]
async fn test_resume_across_database_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("bible.db");

    // First run: chapter 2 fails
    {
        let server = MockServer::start().await;
        mount_chapter(&server, "hag", 1, html_response(GENESIS_1), 1).await;
        mount_chapter(&server, "hag", 2, ResponseTemplate::new(503), 1).await;

        let storage = SqliteStorage::new(&db_path).unwrap();
        let mut crawler = Crawler::new(storage, test_options(&server, 50.0)).unwrap();
        crawler
            .crawl_book(&CancellationToken::new(), "hag")
            .await
            .unwrap();
    }

    // Second run against a healthy server only fetches the failed chapter
    let server = MockServer::start().await;
    mount_chapter(&server, "hag", 1, html_response(GENESIS_1), 0).await;
    mount_chapter(&server, "hag", 2, html_response(GENESIS_1), 1).await;

    let storage = SqliteStorage::new(&db_path).unwrap();
    let mut crawler = Crawler::new(storage, test_options(&server, 50.0)).unwrap();
    crawler
        .crawl_book(&CancellationToken::new(), "hag")
        .await
        .unwrap();

    let storage = crawler.into_storage();
    assert_eq!(storage.count_checkpoints("GAE", CrawlStatus::Done).unwrap(), 2);
    assert_eq!(storage.count_checkpoints("GAE", CrawlStatus::Error).unwrap(), 0);
    assert_eq!(storage.count_verses("GAE").unwrap(), 62);
}

#[tokio::test]
async fn test_injected_http_client_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(READ_PATH))
        .and(query_param("book", "oba"))
        .and(header("user-agent", "InjectedClient/2.0"))
        .and(header("x-harvest-run", "nightly"))
        .respond_with(html_response(GENESIS_1))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "x-harvest-run",
        reqwest::header::HeaderValue::from_static("nightly"),
    );
    let client = reqwest::Client::builder()
        .user_agent("InjectedClient/2.0")
        .default_headers(headers)
        .build()
        .unwrap();

    let mut crawler = memory_crawler(test_options(&server, 50.0)).with_http_client(client);
    crawler
        .crawl_book(&CancellationToken::new(), "oba")
        .await
        .unwrap();

    // A request with the configured user agent would not match and fail the chapter
    assert_eq!(
        crawler.storage().get_crawl_status("GAE", "oba", 1).unwrap(),
        CrawlStatus::Done
    );
    assert_eq!(crawler.storage().get_verses("GAE", "oba", 1).unwrap().len(), 31);
}
