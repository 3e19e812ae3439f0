//! Progress notifications for the chapter loop

/// Receives one notification per chapter that is complete after this step
///
/// Called both for chapters crawled now and for chapters skipped because a
/// previous run already finished them. Never called for failed chapters.
pub trait ProgressObserver: Send + Sync {
    fn on_chapter_done(&self, book_name: &str, chapter: u32, total: u32);
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_chapter_done(&self, _book_name: &str, _chapter: u32, _total: u32) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(&str, u32, u32) + Send + Sync,
{
    fn on_chapter_done(&self, book_name: &str, chapter: u32, total: u32) {
        self(book_name, chapter, total)
    }
}
