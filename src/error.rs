//! Error types for the collector.
//!
//! Every failure is fatal for the run that hit it. The variants follow the
//! order in which a request can fail: the transport, the HTTP status line,
//! the body decode, and finally a non-success status embedded in a payload
//! that decoded fine.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can abort a collection run.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Connection, timeout or body-read failure.
    #[error("request to {source_name} failed: {error}")]
    Transport {
        source_name: &'static str,
        #[source]
        error: reqwest::Error,
    },

    /// The server answered with a non-2xx status. Raised before any decoding.
    #[error("{source_name} returned HTTP status {status}\nresponse preview:\n{preview}")]
    HttpStatus {
        source_name: &'static str,
        status: StatusCode,
        preview: String,
    },

    /// The payload decoded but reports a non-success status of its own.
    #[error("{source_name} API error (status: {status}): {message}")]
    ApiStatus {
        source_name: &'static str,
        status: String,
        message: String,
    },

    /// The body is not the JSON shape the source documents.
    #[error("failed to parse {source_name} JSON: {error}\nresponse preview:\n{preview}")]
    Json {
        source_name: &'static str,
        #[source]
        error: serde_json::Error,
        preview: String,
    },

    /// The body is neither an RSS nor an Atom document. Carries the RSS
    /// parser's complaint.
    #[error("failed to parse feed {url}: {error}\nresponse preview:\n{preview}")]
    Feed {
        url: String,
        #[source]
        error: ::rss::Error,
        preview: String,
    },

    /// Invalid option value, missing credential, bad range or limit.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {error}")]
    ConfigRead {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to parse config file {path}: {error}")]
    ConfigParse {
        path: String,
        #[source]
        error: serde_yaml::Error,
    },
}

impl CollectorError {
    /// The HTTP status carried by [`CollectorError::HttpStatus`], if any.
    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            CollectorError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
