//! Validator tests over populated databases

use crate::common::{memory_crawler, populate_except, single_verse_chapter};
use bible_harvest::config::CrawlerOptions;
use bible_harvest::crawler::Crawler;
use bible_harvest::get_book_by_code;
use bible_harvest::output::load_statistics;
use bible_harvest::storage::{SqliteStorage, Storage};
use bible_harvest::HarvestError;
use tokio_util::sync::CancellationToken;

fn populate_single_book(crawler: &mut Crawler<SqliteStorage>, code: &str) {
    crawler.ensure_metadata().unwrap();

    let book = get_book_by_code(code).unwrap();
    let book_id = crawler.storage().get_book("GAE", code).unwrap().unwrap().id;
    let data = single_verse_chapter();

    for chapter in 1..=book.chapter_count {
        crawler
            .storage_mut()
            .save_chapter("GAE", book_id, code, chapter, &data)
            .unwrap();
    }
}

#[test]
fn test_empty_database_is_incomplete() {
    let crawler = memory_crawler(CrawlerOptions::default());
    assert!(crawler.validate(&CancellationToken::new()).is_err());
}

#[test]
fn test_single_book_is_incomplete() {
    let mut crawler = memory_crawler(CrawlerOptions::default());
    populate_single_book(&mut crawler, "gen");

    let result = crawler.validate(&CancellationToken::new());
    assert!(matches!(
        result,
        Err(HarvestError::MissingChapter { ref book, chapter: 1 }) if book == "exo"
    ));
}

#[test]
fn test_fully_populated_database_is_complete() {
    let mut crawler = memory_crawler(CrawlerOptions::default());
    populate_except(&mut crawler, &[]);

    assert!(crawler.validate(&CancellationToken::new()).is_ok());

    let stats = load_statistics(crawler.storage(), "GAE").unwrap();
    assert_eq!(stats.done, 1189);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.verse_count, 1189);
}

#[test]
fn test_last_chapter_missing() {
    let mut crawler = memory_crawler(CrawlerOptions::default());
    populate_except(&mut crawler, &[("rev", 22)]);

    let result = crawler.validate(&CancellationToken::new());
    assert!(matches!(
        result,
        Err(HarvestError::MissingChapter { ref book, chapter: 22 }) if book == "rev"
    ));
}
