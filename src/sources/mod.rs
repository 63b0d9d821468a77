//! Clients for the queried sources.
//!
//! Every client issues exactly one GET per run (one per feed for RSS) and
//! decodes a fixed response shape.
//!
//! # Supported Sources
//!
//! | Source | Module | Auth | Time format |
//! |--------|--------|------|-------------|
//! | NewsAPI | [`newsapi`] | `X-Api-Key` header | `YYYY-MM-DDTHH:MM:SS` |
//! | The Guardian | [`guardian`] | `api-key` query param | `YYYY-MM-DD` |
//! | GDELT DOC 2.0 | [`gdelt`] | none | `YYYYMMDDHHMMSS` |
//! | X recent search | [`x`] | bearer token | `YYYY-MM-DDTHH:MM:SSZ` |
//! | RSS / Atom feeds | [`rss`] | none | feed-native |
//!
//! # Decode order
//!
//! The helpers here enforce the same order for every source:
//! 1. transport ([`fetch`]): connection and timeout failures
//! 2. status line ([`ensure_success`]): non-2xx stops before any decoding
//! 3. body ([`decode_json`]): malformed payloads, with a body preview
//!
//! Embedded payload statuses are checked by each source module afterwards.

pub mod gdelt;
pub mod guardian;
pub mod newsapi;
pub mod rss;
pub mod x;

use crate::error::CollectorError;
use crate::utils::preview;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, instrument};

/// Build the HTTP client for one run.
pub fn http_client(
    source_name: &'static str,
    timeout: Duration,
) -> Result<Client, CollectorError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| CollectorError::Transport { source_name, error })
}

/// Send `request` and read the whole body.
///
/// Returns the status untouched so the caller decides what a failure is.
/// Transport errors are stripped of their URL, which may carry a key.
#[instrument(level = "info", skip_all, fields(source = source_name))]
pub async fn fetch(
    source_name: &'static str,
    request: RequestBuilder,
) -> Result<(StatusCode, String), CollectorError> {
    let response = request
        .send()
        .await
        .map_err(|error| CollectorError::Transport {
            source_name,
            error: error.without_url(),
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|error| CollectorError::Transport {
            source_name,
            error: error.without_url(),
        })?;

    info!(status = status.as_u16(), bytes = body.len(), "Received response");
    Ok((status, body))
}

/// Fail with [`CollectorError::HttpStatus`] unless `status` is 2xx.
pub fn ensure_success(
    source_name: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<(), CollectorError> {
    if status.is_success() {
        return Ok(());
    }
    Err(CollectorError::HttpStatus {
        source_name,
        status,
        preview: preview(body),
    })
}

/// Decode a JSON body, quoting the start of it on failure.
pub fn decode_json<T: DeserializeOwned>(
    source_name: &'static str,
    body: &str,
) -> Result<T, CollectorError> {
    serde_json::from_str(body).map_err(|error| CollectorError::Json {
        source_name,
        error,
        preview: preview(body),
    })
}
