/// Chapter checkpoint status definitions
///
/// Every (version, book, chapter) triple carries one of these states in the
/// checkpoint table. A missing row reads as `Pending`.
use std::fmt;

/// Represents the crawl state of a single chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlStatus {
    /// Chapter has not been attempted, or was reset
    #[default]
    Pending,

    /// Chapter was fetched, parsed and stored successfully
    Done,

    /// Last attempt failed; the chapter will be retried on the next run
    Error,
}

impl CrawlStatus {
    /// Returns true if the chapter must not be fetched again
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all_statuses() -> [Self; 3] {
        [Self::Pending, Self::Done, Self::Error]
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}
