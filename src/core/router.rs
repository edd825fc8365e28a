//! Path routing and dispatch.
//!
//! A request path resolves to a [`Route`] through one declarative step,
//! [`resolve`]; both live dispatch and the check-only [`supports`] predicate
//! consume the same resolution, so they cannot disagree on which paths the
//! gateway serves.
use std::{borrow::Cow, sync::Arc};

use eyre::{Result, WrapErr};

use crate::{
    config::models::GatewayConfig,
    core::{
        classify::UrlClassifier,
        format::{ITEM_LIMIT, PageFormatter},
        markdown::GemtextRenderer,
        model::SortOrder,
        response::Response,
    },
    ports::{markdown::MarkdownConverter, reddit::RedditApi},
};

/// Notice returned for an empty path when no landing page is configured.
pub const WORKING_NOTICE: &str = "Geddit is working, but no landing page has been set.";

/// Scope of a bare `/r/` or `/u/` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Subreddit,
    Redditor,
}

impl Scope {
    fn prefix(self) -> &'static str {
        match self {
            Scope::Subreddit => "r",
            Scope::Redditor => "u",
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            Scope::Subreddit => "Enter subreddit name:",
            Scope::Redditor => "Enter Redditor name:",
        }
    }
}

/// The outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Empty path: landing page or working notice.
    Landing,
    /// `/r/{name}`: subreddit listing.
    Subreddit { name: String },
    /// `/r/{name}/comments/{id}[/...]`: submission thread.
    SubmissionThread { id: String },
    /// `/r/{name}/comments/{id}/{slug}/{comment_id}`: single comment thread.
    CommentThread { id: String },
    /// `/u/{name}`: user profile.
    RedditorProfile { name: String },
    /// Bare `/r/` or `/u/`: redirect on query, prompt otherwise.
    Prompt { scope: Scope },
    /// A recognized command with an unsupported token shape.
    BadShape,
    /// An unrecognized first token.
    UnknownCommand,
}

/// Split a request path into tokens: percent-decode, split on `/`, then drop
/// one leading and one trailing empty token (from leading/trailing slashes).
/// Internal empty tokens are kept as-is.
pub fn tokenize(path: &str) -> Vec<String> {
    let decoded = match urlencoding::decode(path) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(path),
    };
    let mut tokens: Vec<String> = decoded.split('/').map(str::to_string).collect();
    if tokens.first().is_some_and(String::is_empty) {
        tokens.remove(0);
    }
    if tokens.last().is_some_and(String::is_empty) {
        tokens.pop();
    }
    tokens
}

/// Resolve a request path to a route. This is the single source of truth for
/// the gateway's path surface.
pub fn resolve(path: &str) -> Route {
    if path.trim().trim_matches('/').is_empty() {
        return Route::Landing;
    }
    let tokens = tokenize(path);
    match tokens.split_first() {
        Some((cmd, rest)) if cmd.as_str() == "r" => resolve_subreddit_scope(rest),
        Some((cmd, rest)) if cmd.as_str() == "u" => resolve_redditor_scope(rest),
        _ => Route::UnknownCommand,
    }
}

/// Whether the gateway can serve a path. Used by the URL classifier to avoid
/// rewriting links into pages it cannot render.
pub fn supports(path: &str) -> bool {
    !matches!(resolve(path), Route::BadShape | Route::UnknownCommand)
}

fn resolve_subreddit_scope(tokens: &[String]) -> Route {
    if tokens.len() >= 5 && tokens[1] == "comments" {
        Route::CommentThread {
            id: tokens[4].clone(),
        }
    } else if tokens.len() >= 3 && tokens[1] == "comments" {
        Route::SubmissionThread {
            id: tokens[2].clone(),
        }
    } else if tokens.len() == 1 {
        Route::Subreddit {
            name: tokens[0].clone(),
        }
    } else if !tokens.is_empty() {
        Route::BadShape
    } else {
        Route::Prompt {
            scope: Scope::Subreddit,
        }
    }
}

fn resolve_redditor_scope(tokens: &[String]) -> Route {
    match tokens {
        [] => Route::Prompt {
            scope: Scope::Redditor,
        },
        [name] => Route::RedditorProfile { name: name.clone() },
        _ => Route::BadShape,
    }
}

/// Dispatches resolved routes: fetches content through the injected Reddit
/// client, formats it, and wraps it in a response envelope.
///
/// Faults from the client or formatters propagate upward uncaught; the entry
/// adapters install the catch-all boundary.
pub struct Router {
    config: Arc<GatewayConfig>,
    client: Arc<dyn RedditApi>,
    formatter: PageFormatter,
}

impl Router {
    pub fn new(
        config: Arc<GatewayConfig>,
        client: Arc<dyn RedditApi>,
        converter: Arc<dyn MarkdownConverter>,
    ) -> Self {
        let classifier = UrlClassifier::new(config.base_url.as_str());
        let renderer = GemtextRenderer::new(converter, classifier.clone());
        let formatter = PageFormatter::new(classifier, renderer);
        Self {
            config,
            client,
            formatter,
        }
    }

    /// Handle one request, producing exactly one response envelope.
    pub async fn dispatch(&self, path: &str, query: &str) -> Result<Response> {
        match resolve(path) {
            Route::Landing => self.landing_page().await,
            Route::Subreddit { name } => {
                tracing::debug!(%name, "displaying subreddit");
                let about = self.client.subreddit(&name).await?;
                let submissions = self
                    .client
                    .subreddit_submissions(&name, SortOrder::Hot, self.config.listing_limit)
                    .await?;
                Ok(Response::page(
                    self.formatter.subreddit_page(&about, &submissions),
                ))
            }
            Route::SubmissionThread { id } => {
                tracing::debug!(%id, "displaying submission");
                let (submission, comments) = self.client.submission(&id).await?;
                Ok(Response::page(
                    self.formatter.submission_page(&submission, &comments),
                ))
            }
            Route::CommentThread { id } => {
                tracing::debug!(%id, "displaying comment");
                let thread = self.client.comment_thread(&id).await?;
                Ok(Response::page(self.formatter.comment_page(&thread)?))
            }
            Route::RedditorProfile { name } => {
                tracing::debug!(%name, "displaying user profile");
                let redditor = self.client.redditor(&name).await?;
                if redditor.is_suspended {
                    // No further fields are fetched for suspended accounts.
                    return Ok(Response::page(
                        self.formatter.redditor_page(&redditor, &[], &[]),
                    ));
                }
                let submissions = self
                    .client
                    .redditor_submissions(&name, ITEM_LIMIT)
                    .await?;
                let comments = self.client.redditor_comments(&name, ITEM_LIMIT).await?;
                Ok(Response::page(self.formatter.redditor_page(
                    &redditor,
                    &submissions,
                    &comments,
                )))
            }
            Route::Prompt { scope } => {
                if query.is_empty() {
                    tracing::debug!(scope = scope.prefix(), "no path or query; prompting");
                    Ok(Response::input(scope.prompt()))
                } else {
                    let target = format!("{}{}/{query}", self.config.base_url, scope.prefix());
                    tracing::debug!(%target, "no path but query found; redirecting");
                    Ok(Response::redirect(target, true))
                }
            }
            Route::BadShape => {
                tracing::error!(%path, "unsupported path shape");
                Ok(Response::bad_request(format!(
                    "Request invalid or not supported: {path}"
                )))
            }
            Route::UnknownCommand => {
                tracing::error!(%path, "could not parse path");
                Ok(Response::bad_request(format!(
                    "Couldn't parse path \"{path}\"."
                )))
            }
        }
    }

    async fn landing_page(&self) -> Result<Response> {
        tracing::debug!("empty path received");
        match &self.config.landing_page {
            Some(page) => {
                let body = tokio::fs::read_to_string(page)
                    .await
                    .wrap_err_with(|| format!("Failed to read landing page {page}"))?;
                Ok(Response::raw(body))
            }
            None => Ok(Response::page(vec![WORKING_NOTICE.to_string()])),
        }
    }
}
