//! Command-line entry adapter.
//!
//! Dispatches a single URL-shaped argument through the Router and returns
//! the serialized Gemini envelope, installing the same catch-all fault
//! boundary as the SCGI adapter.
use url::Url;

use crate::{
    adapters::GENERIC_ERR_MSG,
    core::{Response, Router},
};

/// Resolve one request and return the response bytes for stdout.
pub async fn resolve_target(router: &Router, target: &str) -> Vec<u8> {
    let (path, query) = split_target(target);
    match router.dispatch(&path, &query).await {
        Ok(response) => response.to_bytes(),
        Err(e) => {
            tracing::error!(error = ?e, %target, "request dispatch failed");
            Response::bad_request(GENERIC_ERR_MSG.to_string()).to_bytes()
        }
    }
}

/// Extract path and query from either a full URL or a bare path.
fn split_target(target: &str) -> (String, String) {
    match Url::parse(target) {
        Ok(parsed) => (
            parsed.path().to_string(),
            parsed.query().unwrap_or("").to_string(),
        ),
        Err(_) => match target.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (target.to_string(), String::new()),
        },
    }
}
