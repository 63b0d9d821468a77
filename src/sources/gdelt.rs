//! GDELT DOC 2.0 article-list client.
//!
//! No key is needed. Languages are folded into the query itself as
//! `sourceLang:` terms. GDELT has no embedded status field: throttling and
//! bad queries come back as plain text, which surfaces as a JSON decode error
//! quoting the text.

use crate::config::SourceDefaults;
use crate::error::CollectorError;
use crate::models::GdeltResponse;
use crate::sources::{decode_json, ensure_success, fetch, http_client};
use crate::timerange::{TimeFormat, TimeRange};
use itertools::Itertools;
use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{info, instrument};

pub const SOURCE: &str = "gdelt";
pub const BASE_URL: &str = "https://api.gdeltproject.org/api/v2/doc/doc";
const CLIENT_USER_AGENT: &str = "EthicalCrawler/1.0 (StudentResearch)";
pub const DEFAULT_LANGUAGES: [&str; 2] = ["spanish", "english"];
pub const TIME_FORMAT: TimeFormat = TimeFormat::Compact;

/// One `artlist` request.
#[derive(Debug, Clone)]
pub struct GdeltQuery {
    pub query: String,
    /// GDELT language names such as `spanish`.
    pub languages: Vec<String>,
    pub range: TimeRange,
    pub max_records: u32,
}

impl GdeltQuery {
    /// `(<phrase>) AND (sourceLang:a OR sourceLang:b)`, or just
    /// `(<phrase>)` without languages.
    pub fn full_query(&self) -> String {
        if self.languages.is_empty() {
            return format!("({})", self.query);
        }
        let languages = self
            .languages
            .iter()
            .map(|lang| format!("sourceLang:{lang}"))
            .join(" OR ");
        format!("({}) AND ({})", self.query, languages)
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let (start, end) = self.range.render(TIME_FORMAT);
        vec![
            ("query", self.full_query()),
            ("mode", "artlist".to_string()),
            ("maxrecords", self.max_records.to_string()),
            ("format", "json".to_string()),
            ("startdatetime", start),
            ("enddatetime", end),
        ]
    }
}

/// Built-in settings: calendar year 2023, 250 records, top 10 domains.
pub fn defaults() -> Result<SourceDefaults, CollectorError> {
    Ok(SourceDefaults {
        query: r#""Universidad de Antioquia" OR UdeA"#,
        range: TimeRange::calendar_year(2023)?,
        limit: 250,
        limit_bounds: 1..=250,
        top: 10,
        sample: 5,
        timeout_secs: 30,
    })
}

#[derive(Debug)]
pub struct GdeltClient {
    client: Client,
    base_url: String,
}

impl GdeltClient {
    pub fn new(timeout: Duration) -> Result<Self, CollectorError> {
        Ok(Self {
            client: http_client(SOURCE, timeout)?,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn request(&self, query: &GdeltQuery) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&query.params())
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }

    #[instrument(level = "info", skip_all, fields(query = %query.query, max_records = query.max_records))]
    pub async fn search(&self, query: &GdeltQuery) -> Result<GdeltResponse, CollectorError> {
        let (status, body) = fetch(SOURCE, self.request(query)).await?;
        let response = decode(status, &body)?;
        info!(returned = response.articles.len(), "GDELT search complete");
        Ok(response)
    }
}

/// Validate and decode one GDELT response.
pub fn decode(status: StatusCode, body: &str) -> Result<GdeltResponse, CollectorError> {
    ensure_success(SOURCE, status, body)?;
    decode_json(SOURCE, body)
}
