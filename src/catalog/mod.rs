//! Canonical book catalog
//!
//! The catalog is the fixed, ordered list of the 66 books together with
//! their chapter counts. It supplies the iteration bounds for crawling and
//! validation and is independent of any corpus version.
//!
//! # Example
//!
//! ```
//! use bible_harvest::catalog::{get_book_by_code, total_chapters};
//!
//! let genesis = get_book_by_code("GEN").unwrap();
//! assert_eq!(genesis.chapter_count, 50);
//! assert_eq!(total_chapters(), 1189);
//! ```

mod books;

use books::BOOKS;

/// Which testament a book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    Old,
    New,
}

impl Testament {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }
}

/// Metadata for a single canonical book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfo {
    /// Stable identifier used by the source site (e.g. "gen")
    pub code: &'static str,

    /// Display name (e.g. "창세기")
    pub name: &'static str,

    /// Short form (e.g. "창")
    pub abbrev: &'static str,

    pub testament: Testament,

    pub chapter_count: u32,
}

/// Returns every book in canonical order
pub fn all_books() -> &'static [BookInfo] {
    &BOOKS
}

/// Looks up a book by code, ignoring ASCII case
pub fn get_book_by_code(code: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.code.eq_ignore_ascii_case(code.trim()))
}

/// Looks up a book by its full display name
pub fn get_book_by_name(name: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.name == name)
}

/// Looks up a book by its abbreviation
pub fn get_book_by_abbrev(abbrev: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.abbrev == abbrev)
}

/// Position of a book in canonical order (0-based)
pub fn sort_order(code: &str) -> Option<usize> {
    BOOKS.iter().position(|b| b.code.eq_ignore_ascii_case(code))
}

/// Sum of chapter counts across all books
pub fn total_chapters() -> u32 {
    BOOKS.iter().map(|b| b.chapter_count).sum()
}
