//! Content view models.
//!
//! These are per-request transients decoded from Reddit API responses. The
//! gateway never mutates or caches them; each struct carries exactly the
//! fields the formatters render. Missing authors are modeled as `None` and
//! rendered as the `[deleted]` sentinel rather than being treated as faults.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Date-only rendering format, always UTC.
pub const DATE_FMT: &str = "%d/%m/%Y";
/// Date-and-time rendering format, always UTC.
pub const DATETIME_FMT: &str = "%d/%m/%Y at %H:%M UTC";

/// Placeholder shown when an author is absent or inaccessible.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Subreddit header information.
#[derive(Debug, Clone)]
pub struct SubredditInfo {
    pub display_name: String,
    pub created_utc: i64,
    pub subscribers: u64,
}

/// A submission (link or self post).
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub created_utc: i64,
    pub edited: bool,
    pub score: i64,
    /// External target URL (equal to the permalink for self posts).
    pub url: String,
    /// Site-relative permalink, e.g. `/r/rust/comments/abc123/title/`.
    pub permalink: String,
    pub selftext: String,
    pub num_comments: u64,
}

/// A comment, with any directly loaded replies nested inside.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub author: Option<String>,
    pub created_utc: i64,
    pub edited: bool,
    pub score: i64,
    pub body: String,
    /// Site-relative permalink, e.g. `/r/rust/comments/abc123/title/def456/`.
    pub permalink: String,
    /// Fullname of the parent: `t1_` prefix for a comment, `t3_` for the
    /// submission.
    pub parent_id: String,
    /// Direct replies, populated only when the comment came from an already
    /// loaded tree. Counting these is cheap; anything deeper needs another
    /// round trip.
    pub replies: Vec<Comment>,
}

/// A user account.
#[derive(Debug, Clone)]
pub struct Redditor {
    pub name: String,
    pub created_utc: i64,
    pub is_suspended: bool,
    pub link_karma: i64,
    pub comment_karma: i64,
}

/// Submission listing orders supported by the subreddit page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Hot,
    Top,
    New,
    Controversial,
}

impl SortOrder {
    /// API path segment for this order.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Hot => "hot",
            SortOrder::Top => "top",
            SortOrder::New => "new",
            SortOrder::Controversial => "controversial",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Hot
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized sort key. The Router never passes one of these
/// through; hitting this from a hard-coded call site is a defect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Bad value for sort order: \"{0}\"")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hot" => Ok(SortOrder::Hot),
            "top" => Ok(SortOrder::Top),
            "new" => Ok(SortOrder::New),
            "controversial" => Ok(SortOrder::Controversial),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

/// Format a Unix timestamp in UTC, date-only or date-and-time.
///
/// When `edited` is set a trailing `*` marks the content as edited. Variants
/// that cannot be edited (subreddits, redditors) always pass `false`.
pub fn format_timestamp(created_utc: i64, date_only: bool, edited: bool) -> String {
    let fmt = if date_only { DATE_FMT } else { DATETIME_FMT };
    let when = DateTime::<Utc>::from_timestamp(created_utc, 0).unwrap_or(DateTime::UNIX_EPOCH);
    let mut s = when.format(fmt).to_string();
    if edited {
        s.push('*');
    }
    s
}

/// Resolve an optional author name to a displayable string.
pub fn author_name(author: Option<&str>) -> &str {
    author.unwrap_or(DELETED_AUTHOR)
}
