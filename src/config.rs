//! Configuration file loading and option resolution.
//!
//! The optional YAML file passed with `--config` has one section per source
//! plus a top-level timeout:
//!
//! ```yaml
//! timeout_secs: 25
//! newsapi:
//!   api_key: "..."
//!   query: '"Universidad de Antioquia" OR UdeA'
//!   languages: [es, en]
//!   limit: 100
//! guardian:
//!   from: 2023-01-01
//!   to: 2023-12-31
//! gdelt:
//!   languages: [spanish]
//!   top: 15
//! x:
//!   filter: "lang:es -is:retweet"
//! rss:
//!   feeds:
//!     - https://feeds.bbci.co.uk/news/rss.xml
//!   sample: 5
//! ```
//!
//! Every option resolves independently, first match wins:
//! 1. command-line flag (or its environment variable)
//! 2. the source's section in the config file
//! 3. the config file's top level (`timeout_secs` only)
//! 4. the source's built-in default

use crate::cli::{QueryArgs, ReportArgs};
use crate::error::CollectorError;
use crate::timerange::{TimeRange, parse_end, parse_start};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub timeout_secs: Option<u64>,
    pub newsapi: SourceSection,
    pub guardian: SourceSection,
    pub gdelt: SourceSection,
    pub x: SourceSection,
    pub rss: RssSection,
}

/// Per-source section of the config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSection {
    pub query: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<u32>,
    pub top: Option<usize>,
    pub sample: Option<usize>,
    pub timeout_secs: Option<u64>,
    /// API key or bearer token.
    pub api_key: Option<String>,
    pub languages: Option<Vec<String>>,
    /// Extra search operators (X only).
    pub filter: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RssSection {
    pub feeds: Option<Vec<String>>,
    pub top: Option<usize>,
    pub sample: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Built-in values a source falls back to.
#[derive(Debug, Clone)]
pub struct SourceDefaults {
    pub query: &'static str,
    pub range: TimeRange,
    pub limit: u32,
    /// Limits the API accepts for a single page.
    pub limit_bounds: RangeInclusive<u32>,
    pub top: usize,
    pub sample: usize,
    pub timeout_secs: u64,
}

/// How much of a result set the console report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top: usize,
    pub sample: usize,
}

/// Search options after CLI, file and defaults have been merged.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub query: String,
    pub range: TimeRange,
    pub limit: u32,
    pub report: ReportOptions,
    pub timeout: Duration,
}

/// Read and parse the YAML config file at `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Result<FileConfig, CollectorError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|error| CollectorError::ConfigRead {
            path: path.display().to_string(),
            error,
        })?;
    let config = parse(&raw).map_err(|error| CollectorError::ConfigParse {
        path: path.display().to_string(),
        error,
    })?;
    info!("Loaded configuration file");
    Ok(config)
}

/// Parse config file contents. An empty document is an empty config.
pub fn parse(raw: &str) -> Result<FileConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(raw)
}

/// Merge the search options of one API source.
pub fn resolve_search(
    args: &QueryArgs,
    report: &ReportArgs,
    section: &SourceSection,
    defaults: &SourceDefaults,
    timeout_override: Option<u64>,
    file_timeout: Option<u64>,
) -> Result<SearchSettings, CollectorError> {
    let query = pick(args.query.clone(), section.query.clone())
        .unwrap_or_else(|| defaults.query.to_string());
    if query.trim().is_empty() {
        return Err(CollectorError::Config("search phrase is empty".to_string()));
    }

    let start = match args.from.as_deref().or(section.from.as_deref()) {
        Some(raw) => parse_start(raw)?,
        None => defaults.range.start,
    };
    let end = match args.to.as_deref().or(section.to.as_deref()) {
        Some(raw) => parse_end(raw)?,
        None => defaults.range.end,
    };
    let range = TimeRange::new(start, end)?;

    let limit = pick(args.limit, section.limit).unwrap_or(defaults.limit);
    if !defaults.limit_bounds.contains(&limit) {
        return Err(CollectorError::Config(format!(
            "limit {limit} is outside the accepted range {}..={}",
            defaults.limit_bounds.start(),
            defaults.limit_bounds.end()
        )));
    }

    let settings = SearchSettings {
        query,
        range,
        limit,
        report: resolve_report(
            report,
            section.top,
            section.sample,
            ReportOptions {
                top: defaults.top,
                sample: defaults.sample,
            },
        ),
        timeout: resolve_timeout(
            timeout_override,
            section.timeout_secs,
            file_timeout,
            defaults.timeout_secs,
        )?,
    };
    debug!(?settings, "Resolved search settings");
    Ok(settings)
}

/// Merge report sizing.
pub fn resolve_report(
    report: &ReportArgs,
    section_top: Option<usize>,
    section_sample: Option<usize>,
    defaults: ReportOptions,
) -> ReportOptions {
    ReportOptions {
        top: pick(report.top, section_top).unwrap_or(defaults.top),
        sample: pick(report.sample, section_sample).unwrap_or(defaults.sample),
    }
}

/// Merge the per-request timeout. Zero is rejected.
pub fn resolve_timeout(
    timeout_override: Option<u64>,
    section_timeout: Option<u64>,
    file_timeout: Option<u64>,
    default_secs: u64,
) -> Result<Duration, CollectorError> {
    let secs = timeout_override
        .or(section_timeout)
        .or(file_timeout)
        .unwrap_or(default_secs);
    if secs == 0 {
        return Err(CollectorError::Config(
            "timeout must be at least one second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// A credential from the command line/environment or the config file.
pub fn require_credential(
    cli_value: Option<String>,
    section_value: Option<String>,
    source_name: &str,
    flag: &str,
    env_var: &str,
) -> Result<String, CollectorError> {
    pick(cli_value, section_value)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            CollectorError::Config(format!(
                "missing credential for {source_name}: pass {flag}, set {env_var}, or add api_key to the {source_name} section of the config file"
            ))
        })
}

/// Languages from the command line, the file, or the defaults, in that order.
pub fn resolve_languages(
    cli_value: Option<Vec<String>>,
    section_value: Option<Vec<String>>,
    defaults: &[&str],
) -> Vec<String> {
    pick(cli_value, section_value)
        .map(|langs| {
            langs
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|langs| !langs.is_empty())
        .unwrap_or_else(|| defaults.iter().map(|l| l.to_string()).collect())
}

/// Feed URLs from the command line, the file, or the defaults, in that order.
pub fn resolve_feeds(
    cli_value: Vec<String>,
    section_value: Option<Vec<String>>,
    defaults: &[&str],
) -> Vec<String> {
    if !cli_value.is_empty() {
        return cli_value;
    }
    section_value.unwrap_or_else(|| defaults.iter().map(|f| f.to_string()).collect())
}

/// Current time, rounded down to the second so rendered ranges are stable.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

fn pick<T>(primary: Option<T>, secondary: Option<T>) -> Option<T> {
    primary.or(secondary)
}
