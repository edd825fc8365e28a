//! Geddit - a Gemini protocol gateway to Reddit.
//!
//! Geddit accepts requests over SCGI (or a one-shot command-line
//! invocation), translates path components into Reddit API calls, and
//! renders the retrieved content as gemtext. It implements a **hexagonal
//! architecture**: business logic lives in `core`, external collaborators
//! are **ports** (traits), and their implementations are **adapters**.
//!
//! # Features
//! - Subreddit listings, submission threads, comment threads and user
//!   profiles rendered as gemtext
//! - Link rewriting that keeps a browsing client inside the gateway
//! - Markdown to gemtext conversion with paragraph-style link blocks
//! - SCGI serving over a Unix socket plus a command-line resolver
//! - Environment-based configuration with fail-fast validation
//! - Structured tracing via `tracing`
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use geddit::{
//!     adapters::{Credentials, Md2Gemtext, RedditClientAdapter},
//!     config::GatewayConfig,
//!     core::Router,
//! };
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let config = Arc::new(geddit::config::load_from_env()?);
//! let credentials = Credentials::load(&config.credentials_file)?;
//! let client = Arc::new(RedditClientAdapter::new(credentials)?);
//! let router = Router::new(config, client, Arc::new(Md2Gemtext::new()));
//! let response = router.dispatch("/r/rust", "").await?;
//! # Ok(()) }
//! ```
//!
//! # Architecture
//! The crate separates **ports** (traits) from **adapters**
//! (implementations) while keeping the resolution engine inside `core`:
//! the Path Router, the Content Formatters, the URL Classifier and the
//! gemtext renderer are all pure apart from content retrieval through the
//! injected [`ports::RedditApi`] handle.
//!
//! # Error Handling
//! All fallible APIs return `eyre::Result<T>` or a domain specific error
//! type. Formatters and the Router propagate faults upward; only the two
//! entry adapters install a catch-all boundary.
pub mod config;
pub mod ports;
pub mod tracing_setup;

// These modules are implementation details and should not be directly used by users
pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::{Md2Gemtext, RedditClientAdapter, ScgiServer},
    core::{Response, Router},
    ports::{MarkdownConverter, RedditApi},
};
