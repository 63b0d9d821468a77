//! Response shapes of the queried sources.
//!
//! - NewsAPI: [`NewsApiResponse`] / [`NewsApiArticle`]
//! - Guardian Content API: [`GuardianResponse`] / [`GuardianArticle`]
//! - GDELT DOC 2.0: [`GdeltResponse`] / [`GdeltArticle`]
//! - X recent search: [`XResponse`] / [`Tweet`]
//! - RSS 0.9x/1.0/2.0 and Atom feeds, normalised into [`Feed`] / [`FeedItem`]
//!
//! Field names follow each API's JSON, hence the `rename` attributes. Fields
//! the APIs are known to send as `null` are `Option`s so one odd record does
//! not fail the whole decode.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of `GET /v2/everything`.
///
/// On failure NewsAPI still answers JSON, with `status: "error"` plus
/// `code` and `message`, and no `articles`.
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsApiArticle {
    pub source: NewsApiSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsApiArticle {
    /// Name of the outlet, empty when NewsAPI has none.
    pub fn source_name(&self) -> &str {
        self.source.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsApiSource {
    pub name: Option<String>,
}

/// Body of the Guardian `/search` endpoint. Everything sits under `response`.
#[derive(Debug, Deserialize)]
pub struct GuardianResponse {
    pub response: GuardianPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianPage {
    pub status: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page_size: u64,
    #[serde(default)]
    pub current_page: u64,
    #[serde(default)]
    pub pages: u64,
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<GuardianArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianArticle {
    #[serde(default)]
    pub section_name: String,
    pub web_title: String,
    pub web_url: String,
    pub web_publication_date: Option<DateTime<Utc>>,
}

/// Body of the GDELT DOC API in `artlist` mode.
///
/// An empty result set comes back as `{}`.
#[derive(Debug, Deserialize)]
pub struct GdeltResponse {
    #[serde(default)]
    pub articles: Vec<GdeltArticle>,
}

#[derive(Debug, Deserialize)]
pub struct GdeltArticle {
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// `YYYYMMDDTHHMMSSZ`, e.g. `20230315T120000Z`.
    #[serde(rename = "seendate", default)]
    pub seen_date: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "sourcecountry", default)]
    pub source_country: String,
}

/// Body of `GET /2/tweets/search/recent`.
///
/// X may answer 200 with an `errors` array instead of `data`.
#[derive(Debug, Deserialize)]
pub struct XResponse {
    #[serde(default)]
    pub data: Vec<Tweet>,
    #[serde(default)]
    pub meta: XMeta,
    #[serde(default)]
    pub errors: Vec<XApiError>,
}

#[derive(Debug, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct XMeta {
    pub newest_id: Option<String>,
    pub oldest_id: Option<String>,
    #[serde(default)]
    pub result_count: u64,
    pub next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct XApiError {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub message: Option<String>,
}

impl XApiError {
    pub fn describe(&self) -> String {
        [&self.title, &self.detail, &self.message]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(": ")
    }
}

/// A parsed feed, whichever syntax it arrived in.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Publication date as the feed wrote it; RFC 3339 for Atom.
    pub published: String,
    /// Description or summary, HTML stripped.
    pub description: String,
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub enclosure: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newsapi_error_body_deserializes() {
        let json = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        let resp: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "error");
        assert!(resp.articles.is_empty());
        assert_eq!(resp.code.as_deref(), Some("apiKeyInvalid"));
    }

    #[test]
    fn test_newsapi_article_with_nulls() {
        let json = r#"{
            "source": {"id": null, "name": "El Colombiano"},
            "author": null,
            "title": "UdeA abre convocatoria",
            "description": null,
            "url": "https://www.elcolombiano.com/a",
            "publishedAt": "2024-03-01T10:15:00Z",
            "content": null
        }"#;
        let article: NewsApiArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.source_name(), "El Colombiano");
        assert!(article.author.is_none());
        assert_eq!(
            article.published_at.unwrap().to_rfc3339(),
            "2024-03-01T10:15:00+00:00"
        );
    }

    #[test]
    fn test_newsapi_source_without_name() {
        let json = r#"{"source": {"id": "x", "name": null}}"#;
        let article: NewsApiArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.source_name(), "");
    }

    #[test]
    fn test_guardian_page_camel_case() {
        let json = r#"{"response": {
            "status": "ok", "total": 1, "pageSize": 50, "currentPage": 1, "pages": 1,
            "results": [{
                "id": "world/2023/mar/01/x", "type": "article", "sectionName": "World news",
                "webTitle": "Title", "webUrl": "https://www.theguardian.com/x",
                "webPublicationDate": "2023-03-01T08:00:00Z"
            }]
        }}"#;
        let resp: GuardianResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.response.page_size, 50);
        assert_eq!(resp.response.results[0].section_name, "World news");
    }

    #[test]
    fn test_gdelt_empty_object() {
        let resp: GdeltResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.articles.is_empty());
    }

    #[test]
    fn test_tweet_metrics_and_meta() {
        let json = r#"{
            "data": [{"id": "1", "text": "hola", "created_at": "2024-05-01T12:00:00.000Z",
                      "public_metrics": {"retweet_count": 2, "like_count": 5, "reply_count": 1, "quote_count": 0}}],
            "meta": {"newest_id": "1", "oldest_id": "1", "result_count": 1}
        }"#;
        let resp: XResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.meta.result_count, 1);
        assert_eq!(resp.data[0].public_metrics.like_count, 5);
        assert!(resp.meta.next_token.is_none());
    }

    #[test]
    fn test_x_error_description() {
        let err = XApiError {
            title: Some("Invalid Request".to_string()),
            detail: None,
            message: Some("bad query".to_string()),
        };
        assert_eq!(err.describe(), "Invalid Request: bad query");
    }
}
