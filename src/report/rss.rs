//! Feed reports: one block per feed, then a summary across all feeds.

use crate::config::ReportOptions;
use crate::models::Feed;
use crate::ranking::top_n;
use crate::report::{NO_RECORDS, display_value, write_ranking, write_rule};
use crate::utils::{host_of, truncate_chars};
use itertools::Itertools;
use std::fmt;

const DESCRIPTION_CHARS: usize = 120;

#[derive(Debug, Clone, Copy)]
pub struct FeedReport<'a> {
    pub url: &'a str,
    pub feed: &'a Feed,
    pub options: ReportOptions,
}

impl fmt::Display for FeedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "=== {} ===", display_value(&self.feed.title))?;
        writeln!(f, "Feed: {}", self.url)?;
        if !self.feed.description.is_empty() {
            writeln!(f, "{}", self.feed.description)?;
        }
        writeln!(f, "Items: {}", self.feed.items.len())?;
        if self.feed.items.is_empty() {
            return writeln!(f, "{NO_RECORDS}");
        }
        write_rule(f)?;

        for item in self.feed.items.iter().take(self.options.sample) {
            writeln!(f, "Title: {}", display_value(&item.title))?;
            writeln!(f, "Link: {}", display_value(&item.link))?;
            writeln!(f, "Published: {}", display_value(&item.published))?;
            if !item.description.is_empty() {
                writeln!(
                    f,
                    "Description: {}",
                    truncate_chars(&item.description, DESCRIPTION_CHARS)
                )?;
            }
            if !item.categories.is_empty() {
                writeln!(f, "Categories: {}", item.categories.iter().join(", "))?;
            }
            if let Some(author) = &item.author {
                writeln!(f, "Author: {author}")?;
            }
            if let Some(image) = &item.image {
                writeln!(f, "Image: {image}")?;
            }
            if let Some(enclosure) = item.enclosure.as_ref().filter(|e| item.image.as_ref() != Some(*e)) {
                writeln!(f, "Enclosure: {enclosure}")?;
            }
            write_rule(f)?;
        }
        Ok(())
    }
}

/// A feed that could not be read.
#[derive(Debug, Clone)]
pub struct FeedFailure {
    pub url: String,
    pub reason: String,
}

impl fmt::Display for FeedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "=== {} ===", self.url)?;
        writeln!(f, "Could not read feed: {}", self.reason)
    }
}

/// Totals across every feed of the run.
#[derive(Debug, Clone, Copy)]
pub struct FeedSummary<'a> {
    pub feeds: &'a [Feed],
    pub failures: &'a [FeedFailure],
    pub options: ReportOptions,
}

impl fmt::Display for FeedSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.feeds.iter().flat_map(|feed| &feed.items).collect_vec();

        writeln!(f)?;
        writeln!(f, "=== Summary ===")?;
        writeln!(
            f,
            "Feeds read: {} | failed: {}",
            self.feeds.len(),
            self.failures.len()
        )?;
        for failure in self.failures {
            writeln!(f, "  failed: {}", failure.url)?;
        }
        writeln!(f, "Items: {}", items.len())?;
        if items.is_empty() {
            return writeln!(f, "{NO_RECORDS}");
        }

        let domains = top_n(
            &items,
            |item| host_of(&item.link).unwrap_or_default(),
            self.options.top,
        );
        write_ranking(f, "Top domains", &domains, "items")?;

        let categories = top_n(
            items.iter().flat_map(|item| &item.categories),
            |category| category.as_str(),
            self.options.top,
        );
        write_ranking(f, "Top categories", &categories, "mentions")
    }
}
