//! Command-line interface definitions for News Collector.
//!
//! Each source is a subcommand. Anything left unset on the command line falls
//! back to the config file given with `--config`, then to the source's
//! built-in default. Credentials can also come from environment variables.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the News Collector application.
///
/// # Examples
///
/// ```sh
/// # NewsAPI, last 30 days, key from the environment
/// NEWSAPI_KEY=... news_collector newsapi
///
/// # Guardian archive for a custom phrase and window
/// news_collector guardian --query "Medellín OR Antioquia" --from 2022-01-01 --to 2022-06-30
///
/// # GDELT with settings from a file
/// news_collector --config collector.yaml gdelt --top 20
///
/// # A couple of feeds
/// news_collector rss --feed https://feeds.bbci.co.uk/news/rss.xml --feed https://www.theguardian.com/world/rss
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "NEWS_COLLECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides the config file and source default)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search NewsAPI's /v2/everything endpoint
    Newsapi(NewsApiArgs),
    /// Search The Guardian's content archive
    Guardian(GuardianArgs),
    /// Search the GDELT DOC 2.0 article list
    Gdelt(GdeltArgs),
    /// Search recent posts on X
    X(XArgs),
    /// Read a list of RSS or Atom feeds
    Rss(RssArgs),
}

/// Search options shared by the API subcommands.
#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Free-text search phrase
    #[arg(short, long)]
    pub query: Option<String>,

    /// Start of the time window (RFC 3339, YYYY-MM-DDTHH:MM:SS, YYYYMMDDHHMMSS or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the time window; a bare date means the end of that day
    #[arg(long)]
    pub to: Option<String>,

    /// Number of records to request
    #[arg(short, long)]
    pub limit: Option<u32>,
}

/// Report sizing shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ReportArgs {
    /// How many entries each ranking shows
    #[arg(long)]
    pub top: Option<usize>,

    /// How many sample records to print
    #[arg(long)]
    pub sample: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct NewsApiArgs {
    #[command(flatten)]
    pub search: QueryArgs,

    #[command(flatten)]
    pub report: ReportArgs,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// ISO 639-1 language codes, comma separated
    #[arg(long, value_delimiter = ',')]
    pub languages: Option<Vec<String>>,
}

#[derive(Args, Debug, Default)]
pub struct GuardianArgs {
    #[command(flatten)]
    pub search: QueryArgs,

    #[command(flatten)]
    pub report: ReportArgs,

    /// Guardian Open Platform key
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct GdeltArgs {
    #[command(flatten)]
    pub search: QueryArgs,

    #[command(flatten)]
    pub report: ReportArgs,

    /// GDELT source languages (e.g. spanish,english), comma separated
    #[arg(long, value_delimiter = ',')]
    pub languages: Option<Vec<String>>,
}

#[derive(Args, Debug, Default)]
pub struct XArgs {
    #[command(flatten)]
    pub search: QueryArgs,

    #[command(flatten)]
    pub report: ReportArgs,

    /// X API bearer token
    #[arg(long, env = "X_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Search operators appended after the parenthesised phrase
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct RssArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Feed URL to read; repeat for several feeds
    #[arg(long = "feed")]
    pub feeds: Vec<String>,
}
