use async_trait::async_trait;
use thiserror::Error;

use crate::core::model::{Comment, Redditor, SortOrder, SubredditInfo, Submission};

/// Custom error type for Reddit API operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedditApiError {
    /// The requested content does not exist or is inaccessible
    #[error("Content not found: {0}")]
    NotFound(String),

    /// Authentication against the Reddit API failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The upstream request failed (network, 5xx, timeout)
    #[error("Upstream request failed: {0}")]
    Http(String),

    /// The upstream response could not be decoded
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// Result type alias for Reddit API operations
pub type RedditApiResult<T> = Result<T, RedditApiError>;

/// A single comment permalink view: the comment with its loaded replies plus
/// the title of the submission it belongs to.
#[derive(Debug, Clone)]
pub struct CommentThread {
    pub comment: Comment,
    pub submission_title: String,
}

/// RedditApi defines the port (interface) for retrieving content from Reddit.
///
/// The Router owns an injected handle to this trait and performs all content
/// retrieval through it; formatters never touch the network. Test doubles
/// implement this trait with canned data.
#[async_trait]
pub trait RedditApi: Send + Sync + 'static {
    /// Fetch subreddit header information.
    async fn subreddit(&self, name: &str) -> RedditApiResult<SubredditInfo>;

    /// Fetch up to `limit` submissions from a subreddit in the given order.
    async fn subreddit_submissions(
        &self,
        name: &str,
        sort: SortOrder,
        limit: usize,
    ) -> RedditApiResult<Vec<Submission>>;

    /// Fetch a submission together with its top-level comments (each carrying
    /// its directly loaded replies).
    async fn submission(&self, id: &str) -> RedditApiResult<(Submission, Vec<Comment>)>;

    /// Fetch a single comment with its replies and the parent submission's
    /// title.
    async fn comment_thread(&self, id: &str) -> RedditApiResult<CommentThread>;

    /// Fetch a user's account information.
    async fn redditor(&self, name: &str) -> RedditApiResult<Redditor>;

    /// Fetch a user's newest submissions.
    async fn redditor_submissions(
        &self,
        name: &str,
        limit: usize,
    ) -> RedditApiResult<Vec<Submission>>;

    /// Fetch a user's newest comments.
    async fn redditor_comments(&self, name: &str, limit: usize) -> RedditApiResult<Vec<Comment>>;
}
