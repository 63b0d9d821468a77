//! X (formerly Twitter) recent-search client, `/2/tweets/search/recent`.
//!
//! Authenticates with a bearer token. The recent-search endpoint only covers
//! the last seven days and rejects an `end_time` that is not at least a few
//! seconds in the past, hence the default window ending one minute ago.

use crate::config::SourceDefaults;
use crate::error::CollectorError;
use crate::models::XResponse;
use crate::sources::{decode_json, ensure_success, fetch, http_client};
use crate::timerange::{TimeFormat, TimeRange};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use itertools::Itertools;
use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument};

pub const SOURCE: &str = "x";
pub const BASE_URL: &str = "https://api.twitter.com/2/tweets/search/recent";
const CLIENT_USER_AGENT: &str = "EthicalXCrawler/1.0 (StudentResearch)";
pub const DEFAULT_FILTER: &str = "investigación lang:es -is:retweet";
pub const TWEET_FIELDS: &str = "created_at,public_metrics";
pub const TIME_FORMAT: TimeFormat = TimeFormat::Iso8601Utc;

/// One recent-search request.
#[derive(Debug, Clone)]
pub struct XQuery {
    pub query: String,
    /// Operators appended after the phrase, e.g. `lang:es -is:retweet`.
    pub filter: String,
    pub range: TimeRange,
    pub max_results: u32,
}

impl XQuery {
    pub fn full_query(&self) -> String {
        let filter = self.filter.trim();
        if filter.is_empty() {
            format!("({})", self.query)
        } else {
            format!("({}) {}", self.query, filter)
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let (start, end) = self.range.render(TIME_FORMAT);
        vec![
            ("query", self.full_query()),
            ("tweet.fields", TWEET_FIELDS.to_string()),
            ("max_results", self.max_results.to_string()),
            ("start_time", start),
            ("end_time", end),
        ]
    }
}

/// Built-in settings: the seven days ending one minute before `now`, 50 posts.
pub fn defaults(now: DateTime<Utc>) -> SourceDefaults {
    let end = now - ChronoDuration::minutes(1);
    SourceDefaults {
        query: r#""Universidad de Antioquia" OR UdeA"#,
        range: TimeRange::last_days(end, 7),
        limit: 50,
        limit_bounds: 10..=100,
        top: 10,
        sample: 5,
        timeout_secs: 20,
    }
}

pub struct XClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl fmt::Debug for XClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl XClient {
    pub fn new(bearer_token: String, timeout: Duration) -> Result<Self, CollectorError> {
        Ok(Self {
            client: http_client(SOURCE, timeout)?,
            base_url: BASE_URL.to_string(),
            bearer_token,
        })
    }

    pub fn request(&self, query: &XQuery) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&query.params())
            .bearer_auth(&self.bearer_token)
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }

    #[instrument(level = "info", skip_all, fields(max_results = query.max_results))]
    pub async fn search(&self, query: &XQuery) -> Result<XResponse, CollectorError> {
        let (status, body) = fetch(SOURCE, self.request(query)).await?;
        let response = decode(status, &body)?;
        info!(
            result_count = response.meta.result_count,
            returned = response.data.len(),
            "X search complete"
        );
        Ok(response)
    }
}

/// Validate and decode one X response.
///
/// A 200 carrying `errors` and no `data` is an API failure. Partial errors
/// next to real data are left to the caller.
pub fn decode(status: StatusCode, body: &str) -> Result<XResponse, CollectorError> {
    ensure_success(SOURCE, status, body)?;
    let response: XResponse = decode_json(SOURCE, body)?;
    if response.data.is_empty() && !response.errors.is_empty() {
        return Err(CollectorError::ApiStatus {
            source_name: SOURCE,
            status: "error".to_string(),
            message: response.errors.iter().map(|e| e.describe()).join("; "),
        });
    }
    Ok(response)
}
