//! URL classification and rewriting.
//!
//! Decides whether an arbitrary URL points at Reddit and, when the gateway
//! can actually serve the path behind it, rewrites it to a gateway URL.
//! Classification never fails: a URL the parser rejects outright is returned
//! unchanged.
use std::sync::Arc;

use url::Url;

use crate::core::router;

/// Host label pairs recognized as Reddit (short-link and canonical domains).
const UPSTREAM_DOMAINS: [[&str; 2]; 2] = [["redd", "it"], ["reddit", "com"]];

/// Outcome of classifying one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether the URL was recognized as a servable Reddit page.
    pub gateway_target: bool,
    /// The rewritten gateway URL, or the input unchanged.
    pub url: String,
}

/// Classifies URLs against the Reddit domains and the Router's path support.
///
/// Cheap to clone; the base URL is shared. The base URL invariant (always
/// ends in `/`) is enforced by config validation before one of these is
/// constructed.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    base_url: Arc<str>,
}

impl UrlClassifier {
    pub fn new(base_url: impl Into<Arc<str>>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Classify a URL, rewriting it when it is a servable Reddit page.
    ///
    /// Relative URLs (no scheme, no host) are always Reddit candidates.
    /// Absolute URLs qualify when the last two host labels match a known
    /// Reddit domain. Either way the path must pass the Router's check-only
    /// predicate; rewriting a link the gateway cannot serve would produce a
    /// dead link.
    pub fn classify(&self, raw: &str) -> Classification {
        tracing::debug!(url = %raw, "classifying URL");
        let (candidate, path) = match Url::parse(raw) {
            Ok(parsed) => (host_is_upstream(parsed.host_str()), parsed.path().to_string()),
            Err(url::ParseError::RelativeUrlWithoutBase) => (true, relative_path(raw)),
            Err(_) => {
                return Classification {
                    gateway_target: false,
                    url: raw.to_string(),
                };
            }
        };

        if candidate && router::supports(&path) {
            // base_url ends with '/', so the appended path must not start
            // with one.
            let rewritten = format!("{}{}", self.base_url, path.trim_start_matches('/'));
            tracing::debug!(url = %rewritten, "URL is a supported Reddit URL; rewriting");
            Classification {
                gateway_target: true,
                url: rewritten,
            }
        } else {
            tracing::debug!("URL is not a servable Reddit URL; returning unchanged");
            Classification {
                gateway_target: false,
                url: raw.to_string(),
            }
        }
    }
}

/// Compare the last two dot-separated host labels against the Reddit domains.
fn host_is_upstream(host: Option<&str>) -> bool {
    let Some(host) = host else {
        return false;
    };
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let tail = &labels[labels.len() - 2..];
    UPSTREAM_DOMAINS.iter().any(|domain| domain == tail)
}

/// Path portion of a relative URL (everything before `?` or `#`).
fn relative_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    raw[..end].to_string()
}
