//! NewsAPI `/v2/everything` client.
//!
//! The key travels in the `X-Api-Key` header. NewsAPI reports failures in the
//! body as well as the status line: `{"status": "error", "code": ..., "message": ...}`.

use crate::config::SourceDefaults;
use crate::error::CollectorError;
use crate::models::NewsApiResponse;
use crate::sources::{decode_json, ensure_success, fetch, http_client};
use crate::timerange::{TimeFormat, TimeRange};
use chrono::{DateTime, Utc};
use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument};

pub const SOURCE: &str = "newsapi";
pub const BASE_URL: &str = "https://newsapi.org/v2/everything";
const CLIENT_USER_AGENT: &str = "EthicalCrawlerNews/1.0";
pub const DEFAULT_LANGUAGES: [&str; 2] = ["es", "en"];
pub const TIME_FORMAT: TimeFormat = TimeFormat::Iso8601;

/// One `/v2/everything` search.
#[derive(Debug, Clone)]
pub struct NewsApiQuery {
    pub query: String,
    /// ISO 639-1 codes, sent comma-joined.
    pub languages: Vec<String>,
    pub range: TimeRange,
    pub page_size: u32,
}

impl NewsApiQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let (from, to) = self.range.render(TIME_FORMAT);
        vec![
            ("q", self.query.clone()),
            ("language", self.languages.join(",")),
            ("sortBy", "publishedAt".to_string()),
            ("pageSize", self.page_size.to_string()),
            ("from", from),
            ("to", to),
        ]
    }
}

/// Built-in settings: the last 30 days, 50 articles, top 10 sources.
pub fn defaults(now: DateTime<Utc>) -> SourceDefaults {
    SourceDefaults {
        query: r#""Universidad de Antioquia" OR UdeA"#,
        range: TimeRange::last_days(now, 30),
        limit: 50,
        limit_bounds: 1..=100,
        top: 10,
        sample: 5,
        timeout_secs: 20,
    }
}

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NewsApiClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, CollectorError> {
        Ok(Self {
            client: http_client(SOURCE, timeout)?,
            base_url: BASE_URL.to_string(),
            api_key,
        })
    }

    /// The request [`search`](Self::search) sends.
    pub fn request(&self, query: &NewsApiQuery) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&query.params())
            .header("X-Api-Key", &self.api_key)
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }

    #[instrument(level = "info", skip_all, fields(query = %query.query, page_size = query.page_size))]
    pub async fn search(&self, query: &NewsApiQuery) -> Result<NewsApiResponse, CollectorError> {
        let (status, body) = fetch(SOURCE, self.request(query)).await?;
        let response = decode(status, &body)?;
        info!(
            total = response.total_results,
            returned = response.articles.len(),
            "NewsAPI search complete"
        );
        Ok(response)
    }
}

/// Validate and decode one NewsAPI response.
pub fn decode(status: StatusCode, body: &str) -> Result<NewsApiResponse, CollectorError> {
    ensure_success(SOURCE, status, body)?;
    let response: NewsApiResponse = decode_json(SOURCE, body)?;
    if response.status != "ok" {
        let message = match (&response.code, &response.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "no details in response body".to_string(),
        };
        return Err(CollectorError::ApiStatus {
            source_name: SOURCE,
            status: response.status,
            message,
        });
    }
    Ok(response)
}
