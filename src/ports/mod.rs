pub mod markdown;
pub mod reddit;

/// Re-export commonly used types from ports
pub use markdown::MarkdownConverter;
pub use reddit::{CommentThread, RedditApi, RedditApiError, RedditApiResult};
