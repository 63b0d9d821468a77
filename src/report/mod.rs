//! Console reports, one per source.
//!
//! Each report is a borrowed view over a decoded response plus the
//! [`ReportOptions`] that size it, and renders through [`std::fmt::Display`]
//! so `main` can simply `print!` it:
//!
//! | Report | Rankings | Sample fields |
//! |---|---|---|
//! | [`newsapi::NewsApiReport`] | source names | title, source, author, published, URL |
//! | [`guardian::GuardianReport`] | sections | title, section, date, URL |
//! | [`gdelt::GdeltReport`] | domains, languages, countries | title, domain, language, country, seen date, URL |
//! | [`x::XReport`] | none, engagement totals instead | id, date, metrics, text |
//! | [`rss::FeedReport`] / [`rss::FeedSummary`] | item domains, categories | title, link, published, description, categories, author, media |
//!
//! Ranked rows look like
//!
//! ```text
//!    1. El Tiempo                      (12 articles)
//! ```
//!
//! and an empty field value is shown as `(unknown)`.

pub mod gdelt;
pub mod guardian;
pub mod newsapi;
pub mod rss;
pub mod x;

use crate::config::ReportOptions;
use crate::ranking::RankedEntry;
use crate::timerange::TimeRange;
use std::fmt;

pub use gdelt::GdeltReport;
pub use guardian::GuardianReport;
pub use newsapi::NewsApiReport;
pub use rss::{FeedFailure, FeedReport, FeedSummary};
pub use x::XReport;

pub const UNKNOWN: &str = "(unknown)";
pub const NO_RECORDS: &str = "No records matched the query.";
const RULE: &str = "----------------------------------------";

/// What is about to be requested, printed before the request goes out.
#[derive(Debug, Clone, Copy)]
pub struct SearchBanner<'a> {
    pub source_label: &'a str,
    pub query: &'a str,
    pub range: &'a TimeRange,
    pub limit: u32,
}

impl fmt::Display for SearchBanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.source_label)?;
        writeln!(f, "Query: {}", self.query)?;
        writeln!(
            f,
            "Range: {} to {}",
            self.range.start.format("%Y-%m-%d %H:%M:%S UTC"),
            self.range.end.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f, "Limit: {}", self.limit)
    }
}

/// Empty field values are displayed as `(unknown)`.
pub fn display_value(value: &str) -> &str {
    if value.trim().is_empty() { UNKNOWN } else { value }
}

/// A titled ranked list, `unit` naming what was counted.
pub(crate) fn write_ranking(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    entries: &[RankedEntry],
    unit: &str,
) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}:")?;
    if entries.is_empty() {
        return writeln!(f, "  (none)");
    }
    for (position, entry) in entries.iter().enumerate() {
        writeln!(
            f,
            "  {:>2}. {:<30} ({} {unit})",
            position + 1,
            display_value(&entry.value),
            entry.count
        )?;
    }
    Ok(())
}

/// Header line of the sample block.
pub(crate) fn write_sample_header(
    f: &mut fmt::Formatter<'_>,
    options: ReportOptions,
    available: usize,
) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "Sample ({} of {available}):", options.sample.min(available))?;
    writeln!(f, "{RULE}")
}

pub(crate) fn write_rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{RULE}")
}
