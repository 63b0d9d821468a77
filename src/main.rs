//! # News Collector
//!
//! Queries one news source per run, ranks the categorical fields of what
//! came back and prints a short console report.
//!
//! ## Sources
//!
//! - NewsAPI `/v2/everything` (API key)
//! - The Guardian Content API (API key)
//! - GDELT DOC 2.0 article list (no key)
//! - X recent search (bearer token)
//! - Any number of RSS (0.9x, 1.0, 2.0) or Atom feeds
//!
//! ## Usage
//!
//! ```sh
//! NEWSAPI_KEY=... news_collector newsapi --query "UdeA" --top 5
//! news_collector --config collector.yaml gdelt
//! news_collector rss --feed https://feeds.bbci.co.uk/news/rss.xml
//! ```
//!
//! ## Flow
//!
//! 1. **Resolve**: merge flags, environment, config file and defaults
//! 2. **Request**: one GET per source (one per feed for RSS)
//! 3. **Decode**: status line, body, embedded status
//! 4. **Report**: totals, top-N rankings and a sample on stdout
//!
//! Logs go to stderr; `RUST_LOG` controls the level (default `info`).
//! Any error ends the run with a non-zero exit code. For RSS a failing feed
//! is reported and skipped instead.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod ranking;
mod report;
mod sources;
mod timerange;
mod utils;

use cli::{Cli, Command, GdeltArgs, GuardianArgs, NewsApiArgs, RssArgs, XArgs};
use config::FileConfig;
use error::CollectorError;
use report::{
    FeedFailure, FeedReport, FeedSummary, GdeltReport, GuardianReport, NewsApiReport,
    SearchBanner, XReport,
};
use sources::gdelt::{self, GdeltClient, GdeltQuery};
use sources::guardian::{self, GuardianClient, GuardianQuery, guardian_query};
use sources::newsapi::{self, NewsApiClient, NewsApiQuery};
use sources::rss::{self, FeedClient};
use sources::x::{self, XClient, XQuery};

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    info!(config = ?args.config, timeout_secs = ?args.timeout_secs, "news_collector starting up");

    match run(args).await {
        Ok(()) => {
            info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "Run finished");
            println!("\nExploration complete.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, http_status = ?e.http_status(), "Run failed");
            eprintln!("\n--- [FATAL ERROR] ---");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<(), CollectorError> {
    let file = match &args.config {
        Some(path) => config::load(path).await?,
        None => FileConfig::default(),
    };
    let timeout_override = args.timeout_secs;

    match args.command {
        Command::Newsapi(cmd) => run_newsapi(cmd, &file, timeout_override).await,
        Command::Guardian(cmd) => run_guardian(cmd, &file, timeout_override).await,
        Command::Gdelt(cmd) => run_gdelt(cmd, &file, timeout_override).await,
        Command::X(cmd) => run_x(cmd, &file, timeout_override).await,
        Command::Rss(cmd) => run_rss(cmd, &file, timeout_override).await,
    }
}

#[instrument(level = "info", skip_all, fields(source = newsapi::SOURCE))]
async fn run_newsapi(
    cmd: NewsApiArgs,
    file: &FileConfig,
    timeout_override: Option<u64>,
) -> Result<(), CollectorError> {
    let section = &file.newsapi;
    let settings = config::resolve_search(
        &cmd.search,
        &cmd.report,
        section,
        &newsapi::defaults(config::now()),
        timeout_override,
        file.timeout_secs,
    )?;
    let api_key = config::require_credential(
        cmd.api_key,
        section.api_key.clone(),
        newsapi::SOURCE,
        "--api-key",
        "NEWSAPI_KEY",
    )?;
    let query = NewsApiQuery {
        query: settings.query,
        languages: config::resolve_languages(
            cmd.languages,
            section.languages.clone(),
            &newsapi::DEFAULT_LANGUAGES,
        ),
        range: settings.range,
        page_size: settings.limit,
    };

    print!(
        "{}",
        SearchBanner {
            source_label: "NewsAPI",
            query: &query.query,
            range: &query.range,
            limit: query.page_size,
        }
    );
    println!("Languages: {}", query.languages.join(","));

    let client = NewsApiClient::new(api_key, settings.timeout)?;
    let response = client.search(&query).await?;
    print!(
        "{}",
        NewsApiReport {
            response: &response,
            options: settings.report,
        }
    );
    Ok(())
}

#[instrument(level = "info", skip_all, fields(source = guardian::SOURCE))]
async fn run_guardian(
    cmd: GuardianArgs,
    file: &FileConfig,
    timeout_override: Option<u64>,
) -> Result<(), CollectorError> {
    let section = &file.guardian;
    let settings = config::resolve_search(
        &cmd.search,
        &cmd.report,
        section,
        &guardian::defaults()?,
        timeout_override,
        file.timeout_secs,
    )?;
    let api_key = config::require_credential(
        cmd.api_key,
        section.api_key.clone(),
        guardian::SOURCE,
        "--api-key",
        "GUARDIAN_API_KEY",
    )?;
    let query = GuardianQuery {
        query: settings.query,
        range: settings.range,
        page_size: settings.limit,
    };

    let sent = guardian_query(&query.query);
    print!(
        "{}",
        SearchBanner {
            source_label: "The Guardian",
            query: &sent,
            range: &query.range,
            limit: query.page_size,
        }
    );

    let client = GuardianClient::new(api_key, settings.timeout)?;
    let response = client.search(&query).await?;
    print!(
        "{}",
        GuardianReport {
            response: &response,
            options: settings.report,
        }
    );
    Ok(())
}

#[instrument(level = "info", skip_all, fields(source = gdelt::SOURCE))]
async fn run_gdelt(
    cmd: GdeltArgs,
    file: &FileConfig,
    timeout_override: Option<u64>,
) -> Result<(), CollectorError> {
    let section = &file.gdelt;
    let settings = config::resolve_search(
        &cmd.search,
        &cmd.report,
        section,
        &gdelt::defaults()?,
        timeout_override,
        file.timeout_secs,
    )?;
    let query = GdeltQuery {
        query: settings.query,
        languages: config::resolve_languages(
            cmd.languages,
            section.languages.clone(),
            &gdelt::DEFAULT_LANGUAGES,
        ),
        range: settings.range,
        max_records: settings.limit,
    };

    let sent = query.full_query();
    print!(
        "{}",
        SearchBanner {
            source_label: "GDELT",
            query: &sent,
            range: &query.range,
            limit: query.max_records,
        }
    );

    let client = GdeltClient::new(settings.timeout)?;
    let response = client.search(&query).await?;
    print!(
        "{}",
        GdeltReport {
            response: &response,
            options: settings.report,
        }
    );
    Ok(())
}

#[instrument(level = "info", skip_all, fields(source = x::SOURCE))]
async fn run_x(
    cmd: XArgs,
    file: &FileConfig,
    timeout_override: Option<u64>,
) -> Result<(), CollectorError> {
    let section = &file.x;
    let settings = config::resolve_search(
        &cmd.search,
        &cmd.report,
        section,
        &x::defaults(config::now()),
        timeout_override,
        file.timeout_secs,
    )?;
    let bearer_token = config::require_credential(
        cmd.bearer_token,
        section.api_key.clone(),
        x::SOURCE,
        "--bearer-token",
        "X_BEARER_TOKEN",
    )?;
    let query = XQuery {
        query: settings.query,
        filter: cmd
            .filter
            .or_else(|| section.filter.clone())
            .unwrap_or_else(|| x::DEFAULT_FILTER.to_string()),
        range: settings.range,
        max_results: settings.limit,
    };

    let sent = query.full_query();
    print!(
        "{}",
        SearchBanner {
            source_label: "X recent search",
            query: &sent,
            range: &query.range,
            limit: query.max_results,
        }
    );

    let client = XClient::new(bearer_token, settings.timeout)?;
    let response = client.search(&query).await?;
    if !response.errors.is_empty() {
        warn!(count = response.errors.len(), "X returned partial errors");
    }
    print!(
        "{}",
        XReport {
            response: &response,
            options: settings.report,
        }
    );
    Ok(())
}

#[instrument(level = "info", skip_all, fields(source = rss::SOURCE))]
async fn run_rss(
    cmd: RssArgs,
    file: &FileConfig,
    timeout_override: Option<u64>,
) -> Result<(), CollectorError> {
    let section = &file.rss;
    let options = config::resolve_report(
        &cmd.report,
        section.top,
        section.sample,
        rss::DEFAULT_REPORT,
    );
    let timeout = config::resolve_timeout(
        timeout_override,
        section.timeout_secs,
        file.timeout_secs,
        rss::DEFAULT_TIMEOUT_SECS,
    )?;
    let urls = rss::validate_feeds(&config::resolve_feeds(
        cmd.feeds,
        section.feeds.clone(),
        &rss::DEFAULT_FEEDS,
    ))?;

    println!("=== RSS / Atom feeds ===");
    println!("Feeds: {}", urls.len());

    let client = FeedClient::new(timeout)?;
    let mut feeds = Vec::with_capacity(urls.len());
    let mut failures = Vec::new();
    for url in &urls {
        match client.fetch_feed(url).await {
            Ok(feed) => {
                print!(
                    "{}",
                    FeedReport {
                        url: url.as_str(),
                        feed: &feed,
                        options,
                    }
                );
                feeds.push(feed);
            }
            Err(e) => {
                warn!(%url, error = %e, "Skipping feed");
                let failure = FeedFailure {
                    url: url.to_string(),
                    reason: e.to_string(),
                };
                print!("{failure}");
                failures.push(failure);
            }
        }
    }

    info!(ok = feeds.len(), failed = failures.len(), "Feeds processed");
    print!(
        "{}",
        FeedSummary {
            feeds: &feeds,
            failures: &failures,
            options,
        }
    );
    Ok(())
}
