//! SCGI server adapter.
//!
//! Listens on a Unix socket, parses the SCGI netstring header block of each
//! connection, dispatches the request path and query string through the
//! Router, and writes the Gemini response envelope back. This is the
//! catch-all fault boundary for served requests: any error escaping the
//! Router is logged and replaced with one generic bad-request response.
use std::{collections::HashMap, path::PathBuf, sync::Arc};

use eyre::{Result, WrapErr, bail, eyre};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
};
use uuid::Uuid;

use crate::{
    adapters::GENERIC_ERR_MSG,
    core::{Response, Router},
};

/// Largest SCGI header block we accept. Gemini requests are tiny; anything
/// bigger is a broken or hostile client.
const MAX_HEADER_BLOCK: usize = 64 * 1024;

pub struct ScgiServer {
    router: Arc<Router>,
    socket_path: PathBuf,
}

impl ScgiServer {
    pub fn new(router: Arc<Router>, socket_path: impl Into<PathBuf>) -> Self {
        Self {
            router,
            socket_path: socket_path.into(),
        }
    }

    /// Bind the socket and serve connections until the process exits. Each
    /// connection is handled on its own task; the Router is stateless so
    /// concurrent requests need no coordination.
    pub async fn run(&self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)
                .wrap_err("Failed to remove stale SCGI socket")?;
        }
        let listener = UnixListener::bind(&self.socket_path)
            .wrap_err_with(|| format!("Failed to bind {}", self.socket_path.display()))?;
        tracing::info!(socket = %self.socket_path.display(), "SCGI server listening");

        loop {
            let (stream, _) = listener
                .accept()
                .await
                .wrap_err("Failed to accept SCGI connection")?;
            let router = self.router.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(router, stream).await {
                    tracing::error!(error = ?e, "SCGI connection handling failed");
                }
            });
        }
    }
}

async fn handle_connection(router: Arc<Router>, mut stream: UnixStream) -> Result<()> {
    let headers = read_header_block(&mut stream).await?;
    let path = headers.get("PATH_INFO").cloned().unwrap_or_default();
    let query = headers.get("QUERY_STRING").cloned().unwrap_or_default();

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("request", %path, %query, request.id = %request_id);
    let _enter = span.enter();
    tracing::info!("handling SCGI request");

    let response = match router.dispatch(&path, &query).await {
        Ok(response) => response,
        Err(e) => {
            // Catch-all for any unhandled fault; the client only ever sees
            // the generic message.
            tracing::error!(error = ?e, "request dispatch failed");
            Response::bad_request(GENERIC_ERR_MSG.to_string())
        }
    };

    stream
        .write_all(&response.to_bytes())
        .await
        .wrap_err("Failed to write response")?;
    stream.shutdown().await.wrap_err("Failed to close stream")?;
    Ok(())
}

/// Read the netstring-framed header block: `{len}:{headers},`.
async fn read_header_block(stream: &mut UnixStream) -> Result<HashMap<String, String>> {
    let mut len: usize = 0;
    loop {
        let byte = stream.read_u8().await.wrap_err("Failed to read header length")?;
        match byte {
            b'0'..=b'9' => {
                len = len * 10 + (byte - b'0') as usize;
                if len > MAX_HEADER_BLOCK {
                    bail!("SCGI header block too large");
                }
            }
            b':' => break,
            other => bail!("Invalid byte {other:#04x} in SCGI netstring length"),
        }
    }

    let mut block = vec![0u8; len];
    stream
        .read_exact(&mut block)
        .await
        .wrap_err("Failed to read header block")?;
    let terminator = stream.read_u8().await.wrap_err("Failed to read terminator")?;
    if terminator != b',' {
        bail!("SCGI netstring missing ',' terminator");
    }

    parse_headers(&block)
}

/// Parse the NUL-separated key/value pairs of an SCGI header block.
fn parse_headers(block: &[u8]) -> Result<HashMap<String, String>> {
    let mut headers = HashMap::new();
    let mut fields = block.split(|b| *b == 0);
    loop {
        let Some(key) = fields.next() else { break };
        if key.is_empty() {
            // Trailing NUL after the last value.
            break;
        }
        let value = fields
            .next()
            .ok_or_else(|| eyre!("SCGI header key without value"))?;
        headers.insert(
            String::from_utf8_lossy(key).into_owned(),
            String::from_utf8_lossy(value).into_owned(),
        );
    }
    Ok(headers)
}
