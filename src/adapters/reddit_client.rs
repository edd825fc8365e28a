//! Reddit API client adapter using reqwest with rustls.
//!
//! Responsibilities:
//! * OAuth2 client-credentials token fetch and renewal
//! * Listing and thread retrieval against the oauth.reddit.com endpoints
//! * Tolerant decoding of Reddit's JSON (bool-or-float `edited`, string-or-
//!   object `replies`, `"[deleted]"` authors)
//!
//! This adapter is intentionally minimal; retries and rate limiting can be
//! layered on a different abstraction if required.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use eyre::{Context, Result};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    core::model::{Comment, Redditor, SortOrder, SubredditInfo, Submission},
    ports::reddit::{CommentThread, RedditApi, RedditApiError, RedditApiResult},
};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Comment trees are fetched with bounded depth; only direct replies of the
/// requested item are ever rendered.
const FETCH_DEPTH: u32 = 2;
const FETCH_LIMIT: u32 = 100;

/// Reddit API credentials, read from a three-line file: client id, client
/// secret, user agent.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl Credentials {
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {path}"))?;
        let mut lines = contents.lines().map(str::trim);
        let (Some(client_id), Some(client_secret), Some(user_agent)) =
            (lines.next(), lines.next(), lines.next())
        else {
            eyre::bail!(
                "Credentials file {path} must contain three lines: \
                 client id, client secret, user agent"
            );
        };
        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            user_agent: user_agent.to_string(),
        })
    }
}

struct BearerToken {
    access_token: String,
    expires_at: Instant,
}

/// Reddit client implementing the [`RedditApi`] port.
pub struct RedditClientAdapter {
    http: reqwest::Client,
    credentials: Credentials,
    token: Mutex<Option<BearerToken>>,
}

impl RedditClientAdapter {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(credentials.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;
        tracing::info!("Created Reddit API client");
        Ok(Self {
            http,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Return a valid bearer token, fetching a new one when the cached token
    /// is missing or about to expire.
    async fn bearer_token(&self) -> RedditApiResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.access_token.clone());
        }

        tracing::debug!("fetching new Reddit API access token");
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| RedditApiError::Auth(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RedditApiError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| RedditApiError::Decode(e.to_string()))?;
        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| RedditApiError::Decode("token response missing access_token".into()))?
            .to_string();
        let expires_in = body
            .get("expires_in")
            .and_then(Value::as_u64)
            .unwrap_or(3600);

        // Renew one minute early so in-flight requests never race expiry.
        *guard = Some(BearerToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(expires_in.saturating_sub(60)),
        });
        Ok(access_token)
    }

    async fn get_json(&self, path: &str) -> RedditApiResult<Value> {
        let token = self.bearer_token().await?;
        let url = format!("{API_BASE}{path}");
        tracing::debug!(%url, "requesting Reddit API");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| RedditApiError::Http(e.to_string()))?;
        match response.status() {
            status if status == reqwest::StatusCode::NOT_FOUND => {
                Err(RedditApiError::NotFound(path.to_string()))
            }
            status if !status.is_success() => Err(RedditApiError::Http(format!(
                "{path} returned {status}"
            ))),
            _ => response
                .json()
                .await
                .map_err(|e| RedditApiError::Decode(e.to_string())),
        }
    }
}

#[async_trait]
impl RedditApi for RedditClientAdapter {
    async fn subreddit(&self, name: &str) -> RedditApiResult<SubredditInfo> {
        let body = self.get_json(&format!("/r/{name}/about")).await?;
        decode::subreddit(data_of(&body)?)
    }

    async fn subreddit_submissions(
        &self,
        name: &str,
        sort: SortOrder,
        limit: usize,
    ) -> RedditApiResult<Vec<Submission>> {
        let body = self
            .get_json(&format!("/r/{name}/{sort}?limit={limit}"))
            .await?;
        Ok(decode::submission_listing(&body))
    }

    async fn submission(&self, id: &str) -> RedditApiResult<(Submission, Vec<Comment>)> {
        let body = self
            .get_json(&format!(
                "/comments/{id}?limit={FETCH_LIMIT}&depth={FETCH_DEPTH}"
            ))
            .await?;
        decode::submission_thread(&body, id)
    }

    async fn comment_thread(&self, id: &str) -> RedditApiResult<CommentThread> {
        // Comments outside an already loaded tree need two round trips: an
        // info lookup for the permalink, then the thread page for replies
        // and the submission title.
        let info = self.get_json(&format!("/api/info?id=t1_{id}")).await?;
        let permalink = decode::first_permalink(&info)
            .ok_or_else(|| RedditApiError::NotFound(format!("comment {id}")))?;
        let body = self
            .get_json(&format!(
                "{permalink}?limit={FETCH_LIMIT}&depth={FETCH_DEPTH}"
            ))
            .await?;
        decode::comment_thread(&body, id)
    }

    async fn redditor(&self, name: &str) -> RedditApiResult<Redditor> {
        let body = self.get_json(&format!("/user/{name}/about")).await?;
        decode::redditor(data_of(&body)?, name)
    }

    async fn redditor_submissions(
        &self,
        name: &str,
        limit: usize,
    ) -> RedditApiResult<Vec<Submission>> {
        let body = self
            .get_json(&format!("/user/{name}/submitted?sort=new&limit={limit}"))
            .await?;
        Ok(decode::submission_listing(&body))
    }

    async fn redditor_comments(&self, name: &str, limit: usize) -> RedditApiResult<Vec<Comment>> {
        let body = self
            .get_json(&format!("/user/{name}/comments?sort=new&limit={limit}"))
            .await?;
        Ok(decode::comment_listing(&body))
    }
}

fn data_of(body: &Value) -> RedditApiResult<&Value> {
    body.get("data")
        .ok_or_else(|| RedditApiError::Decode("response missing data object".into()))
}

/// Decoding helpers for Reddit's listing JSON.
///
/// These walk `serde_json::Value` trees rather than deriving wire structs:
/// several fields change type depending on context (`edited` is a bool or an
/// epoch float, `replies` is a listing or an empty string) and unknown
/// `kind`s such as `more` markers must be skipped, not rejected.
mod decode {
    use super::*;

    pub fn subreddit(data: &Value) -> RedditApiResult<SubredditInfo> {
        Ok(SubredditInfo {
            display_name: required_str(data, "display_name")?,
            created_utc: epoch(data),
            subscribers: data
                .get("subscribers")
                .and_then(Value::as_u64)
                .unwrap_or(0),
        })
    }

    pub fn redditor(data: &Value, name: &str) -> RedditApiResult<Redditor> {
        Ok(Redditor {
            name: data
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            created_utc: epoch(data),
            is_suspended: data
                .get("is_suspended")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            link_karma: data.get("link_karma").and_then(Value::as_i64).unwrap_or(0),
            comment_karma: data
                .get("comment_karma")
                .and_then(Value::as_i64)
                .unwrap_or(0),
        })
    }

    /// Children of a listing response decoded as submissions.
    pub fn submission_listing(body: &Value) -> Vec<Submission> {
        children(body)
            .iter()
            .filter_map(|child| submission(child))
            .collect()
    }

    /// Children of a listing response decoded as comments.
    pub fn comment_listing(body: &Value) -> Vec<Comment> {
        children(body).iter().filter_map(comment).collect()
    }

    /// A `/comments/{id}` response: a two-element array of (submission
    /// listing, comment tree).
    pub fn submission_thread(body: &Value, id: &str) -> RedditApiResult<(Submission, Vec<Comment>)> {
        let pair = body
            .as_array()
            .filter(|a| a.len() >= 2)
            .ok_or_else(|| RedditApiError::Decode("thread response is not a pair".into()))?;
        let submission = children(&pair[0])
            .first()
            .and_then(|child| submission(child))
            .ok_or_else(|| RedditApiError::NotFound(format!("submission {id}")))?;
        let comments = comment_listing(&pair[1]);
        Ok((submission, comments))
    }

    /// A permalink thread response narrowed to the requested comment.
    pub fn comment_thread(body: &Value, id: &str) -> RedditApiResult<CommentThread> {
        let pair = body
            .as_array()
            .filter(|a| a.len() >= 2)
            .ok_or_else(|| RedditApiError::Decode("thread response is not a pair".into()))?;
        let submission_title = children(&pair[0])
            .first()
            .and_then(|child| child.get("data"))
            .and_then(|d| d.get("title"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let comment = comment_listing(&pair[1])
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| RedditApiError::NotFound(format!("comment {id}")))?;
        Ok(CommentThread {
            comment,
            submission_title,
        })
    }

    /// Permalink of the first child of an info listing.
    pub fn first_permalink(body: &Value) -> Option<String> {
        children(body)
            .first()?
            .get("data")?
            .get("permalink")?
            .as_str()
            .map(str::to_string)
    }

    pub fn children(body: &Value) -> &[Value] {
        body.get("data")
            .and_then(|d| d.get("children"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn submission(child: &Value) -> Option<Submission> {
        if child.get("kind").and_then(Value::as_str) != Some("t3") {
            return None;
        }
        let data = child.get("data")?;
        Some(Submission {
            id: data.get("id")?.as_str()?.to_string(),
            title: str_field(data, "title"),
            author: author(data),
            created_utc: epoch(data),
            edited: edited(data),
            score: data.get("score").and_then(Value::as_i64).unwrap_or(0),
            url: str_field(data, "url"),
            permalink: str_field(data, "permalink"),
            selftext: str_field(data, "selftext"),
            num_comments: data
                .get("num_comments")
                .and_then(Value::as_u64)
                .unwrap_or(0),
        })
    }

    fn comment(child: &Value) -> Option<Comment> {
        if child.get("kind").and_then(Value::as_str) != Some("t1") {
            return None;
        }
        let data = child.get("data")?;
        Some(Comment {
            id: data.get("id")?.as_str()?.to_string(),
            author: author(data),
            created_utc: epoch(data),
            edited: edited(data),
            score: data.get("score").and_then(Value::as_i64).unwrap_or(0),
            body: str_field(data, "body"),
            permalink: str_field(data, "permalink"),
            parent_id: str_field(data, "parent_id"),
            replies: data
                .get("replies")
                .map(|replies| children(replies).iter().filter_map(comment).collect())
                .unwrap_or_default(),
        })
    }

    /// `author` is `"[deleted]"` (not null) for removed accounts.
    fn author(data: &Value) -> Option<String> {
        match data.get("author").and_then(Value::as_str) {
            None | Some("[deleted]") => None,
            Some(name) => Some(name.to_string()),
        }
    }

    /// `edited` is `false` or an epoch float of the edit time.
    fn edited(data: &Value) -> bool {
        match data.get("edited") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(_)) => true,
            _ => false,
        }
    }

    fn epoch(data: &Value) -> i64 {
        data.get("created_utc")
            .and_then(Value::as_f64)
            .unwrap_or(0.0) as i64
    }

    fn str_field(data: &Value, key: &str) -> String {
        data.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn required_str(data: &Value, key: &str) -> RedditApiResult<String> {
        data.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RedditApiError::Decode(format!("response missing {key}")))
    }
}
