//! State module for tracking crawl progress
//!
//! `CrawlStatus` is the per-chapter checkpoint state that makes a crawl
//! resumable: chapters marked `Done` are never fetched again.

mod crawl_status;

pub use crawl_status::CrawlStatus;
