//! The Guardian Content API `/search` client.
//!
//! The key is a query parameter (`api-key`). The Guardian expresses OR as `|`
//! and has no language filter, so the phrase is rewritten with
//! [`guardian_query`] before it is sent.

use crate::config::SourceDefaults;
use crate::error::CollectorError;
use crate::models::GuardianResponse;
use crate::sources::{decode_json, ensure_success, fetch, http_client};
use crate::timerange::{TimeFormat, TimeRange};
use itertools::Itertools;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument};

pub const SOURCE: &str = "guardian";
pub const BASE_URL: &str = "https://content.guardianapis.com/search";
pub const TIME_FORMAT: TimeFormat = TimeFormat::DateOnly;

/// One `/search` request.
#[derive(Debug, Clone)]
pub struct GuardianQuery {
    /// The phrase as given; rewritten when the request is built.
    pub query: String,
    pub range: TimeRange,
    pub page_size: u32,
}

impl GuardianQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let (from, to) = self.range.render(TIME_FORMAT);
        vec![
            ("q", guardian_query(&self.query)),
            ("type", "article".to_string()),
            ("page-size", self.page_size.to_string()),
            ("from-date", from),
            ("to-date", to),
        ]
    }
}

/// Rewrite a search phrase into Guardian syntax: `OR` becomes `|` and
/// double quotes are dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(guardian_query("\"Universidad de Antioquia\" OR UdeA"), "Universidad de Antioquia | UdeA");
/// ```
pub fn guardian_query(raw: &str) -> String {
    raw.replace('"', "")
        .split_whitespace()
        .map(|token| if token == "OR" { "|" } else { token })
        .join(" ")
}

/// Built-in settings: calendar year 2023, 50 results, top 5 sections.
pub fn defaults() -> Result<SourceDefaults, CollectorError> {
    Ok(SourceDefaults {
        query: "Universidad de Antioquia OR UdeA",
        range: TimeRange::calendar_year(2023)?,
        limit: 50,
        limit_bounds: 1..=200,
        top: 5,
        sample: 5,
        timeout_secs: 20,
    })
}

pub struct GuardianClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for GuardianClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardianClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GuardianClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, CollectorError> {
        Ok(Self {
            client: http_client(SOURCE, timeout)?,
            base_url: BASE_URL.to_string(),
            api_key,
        })
    }

    pub fn request(&self, query: &GuardianQuery) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&[("api-key", self.api_key.as_str())])
            .query(&query.params())
    }

    #[instrument(level = "info", skip_all, fields(query = %query.query, page_size = query.page_size))]
    pub async fn search(&self, query: &GuardianQuery) -> Result<GuardianResponse, CollectorError> {
        let (status, body) = fetch(SOURCE, self.request(query)).await?;
        let response = decode(status, &body)?;
        info!(
            total = response.response.total,
            returned = response.response.results.len(),
            "Guardian search complete"
        );
        Ok(response)
    }
}

/// Validate and decode one Guardian response.
pub fn decode(status: StatusCode, body: &str) -> Result<GuardianResponse, CollectorError> {
    ensure_success(SOURCE, status, body)?;
    let response: GuardianResponse = decode_json(SOURCE, body)?;
    if response.response.status != "ok" {
        return Err(CollectorError::ApiStatus {
            source_name: SOURCE,
            message: response
                .response
                .message
                .clone()
                .unwrap_or_else(|| "no details in response body".to_string()),
            status: response.response.status,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_guardian_query_rewrite() {
        assert_eq!(
            guardian_query(r#""Universidad de Antioquia" OR UdeA"#),
            "Universidad de Antioquia | UdeA"
        );
        assert_eq!(guardian_query("ORCID  OR  Medellín"), "ORCID | Medellín");
    }

    #[test]
    fn test_request_shape() {
        let client = GuardianClient::new("g-key".to_string(), Duration::from_secs(20)).unwrap();
        let query = GuardianQuery {
            query: "Universidad de Antioquia OR UdeA".to_string(),
            range: defaults().unwrap().range,
            page_size: 50,
        };
        let request = client.request(&query).build().unwrap();

        assert_eq!(request.url().host_str(), Some("content.guardianapis.com"));
        let params: HashMap<String, String> = request.url().query_pairs().into_owned().collect();
        assert_eq!(params["api-key"], "g-key");
        assert_eq!(params["q"], "Universidad de Antioquia | UdeA");
        assert_eq!(params["type"], "article");
        assert_eq!(params["page-size"], "50");
        assert_eq!(params["from-date"], "2023-01-01");
        assert_eq!(params["to-date"], "2023-12-31");
    }

    #[test]
    fn test_decode_ok() {
        let body = r#"{"response":{"status":"ok","total":120,"pageSize":2,"currentPage":1,"pages":60,"results":[
            {"id":"a","type":"article","sectionName":"World news","webTitle":"One","webUrl":"https://g.co/1","webPublicationDate":"2023-04-01T10:00:00Z"},
            {"id":"b","type":"article","sectionName":"Education","webTitle":"Two","webUrl":"https://g.co/2","webPublicationDate":"2023-05-01T10:00:00Z"}
        ]}}"#;
        let response = decode(StatusCode::OK, body).unwrap();
        assert_eq!(response.response.total, 120);
        assert_eq!(response.response.results.len(), 2);
    }

    #[test]
    fn test_decode_embedded_error() {
        let body = r#"{"response":{"status":"error","message":"The api key provided is invalid"}}"#;
        let err = decode(StatusCode::OK, body).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("error"));
        assert!(text.contains("invalid"));
    }

    #[test]
    fn test_decode_http_error_before_json() {
        let body = r#"{"message":"API rate limit exceeded"}"#;
        let err = decode(StatusCode::TOO_MANY_REQUESTS, body).unwrap_err();
        assert_eq!(err.http_status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(err.to_string().contains("API rate limit exceeded"));
    }
}
