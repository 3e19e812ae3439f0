//! Completeness check over stored verses

use crate::catalog::all_books;
use crate::crawler::Crawler;
use crate::storage::Storage;
use crate::HarvestError;
use tokio_util::sync::CancellationToken;
use tracing::info;

impl<S: Storage> Crawler<S> {
    /// Verifies every catalog chapter has stored, non-empty verses
    ///
    /// Read-only. Stops at the first violation.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - All 66 books and every chapter are present
    /// * `Err(HarvestError::BookNotRegistered)` - A book row is missing
    /// * `Err(HarvestError::MissingChapter)` - A chapter has no verses
    /// * `Err(HarvestError::EmptyVerse)` - A stored verse has no text
    /// * `Err(HarvestError::Cancelled)` - The token fired
    pub fn validate(&self, cancel: &CancellationToken) -> Result<(), HarvestError> {
        let version = &self.options.version_code;
        let mut verse_total = 0usize;

        for book in all_books() {
            if self.storage.get_book(version, book.code)?.is_none() {
                return Err(HarvestError::BookNotRegistered {
                    version: version.clone(),
                    book: book.code.to_string(),
                });
            }

            for chapter in 1..=book.chapter_count {
                if cancel.is_cancelled() {
                    return Err(HarvestError::Cancelled);
                }

                let verses = self.storage.get_verses(version, book.code, chapter)?;
                if verses.is_empty() {
                    return Err(HarvestError::MissingChapter {
                        book: book.code.to_string(),
                        chapter,
                    });
                }

                if let Some(empty) = verses.iter().find(|v| v.text.trim().is_empty()) {
                    return Err(HarvestError::EmptyVerse {
                        book: book.code.to_string(),
                        chapter,
                        verse: empty.verse_num,
                    });
                }

                verse_total += verses.len();
            }
        }

        info!(
            "Validation passed for {}: {} books, {} verses",
            version,
            all_books().len(),
            verse_total
        );

        Ok(())
    }
}
