//! Configuration data structures for Geddit.
//!
//! These types map directly to `GEDDIT_`-prefixed environment variables
//! through the `config` crate. They are intentionally serde-friendly and
//! include defaults so that a minimal environment stays concise.
use serde::{Deserialize, Serialize};

/// Default number of submissions fetched for a subreddit listing. Distinct
/// from the per-section display cap.
fn default_listing_limit() -> usize {
    10
}

/// Gateway configuration, constructed once at process start and passed down.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Public base URL of the gateway. Must end with `/`; rewritten paths
    /// are appended directly to it.
    pub base_url: String,
    /// Path to the Reddit API credentials file: three lines holding client
    /// id, client secret and user agent.
    pub credentials_file: String,
    /// Unix socket path for the SCGI server. Required by `serve` only.
    #[serde(default)]
    pub scgi_socket: Option<String>,
    /// Optional file shown verbatim for requests with an empty path.
    #[serde(default)]
    pub landing_page: Option<String>,
    /// How many submissions a subreddit listing fetches by default.
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "gemini://localhost/".to_string(),
            credentials_file: "./credentials".to_string(),
            scgi_socket: None,
            landing_page: None,
            listing_limit: default_listing_limit(),
        }
    }
}
