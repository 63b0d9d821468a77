use crate::config::ReportOptions;
use crate::models::GdeltResponse;
use crate::ranking::{frequency_table, rank, top_n};
use crate::report::{NO_RECORDS, display_value, write_ranking, write_rule, write_sample_header};
use chrono::NaiveDateTime;
use std::fmt;

/// Source countries are always cut at five.
const TOP_COUNTRIES: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct GdeltReport<'a> {
    pub response: &'a GdeltResponse,
    pub options: ReportOptions,
}

impl fmt::Display for GdeltReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let articles = &self.response.articles;
        writeln!(f)?;
        writeln!(f, "Returned: {}", articles.len())?;
        if articles.is_empty() {
            return writeln!(f, "{NO_RECORDS}");
        }

        let domains = top_n(articles, |a| a.domain.as_str(), self.options.top);
        write_ranking(f, "Top domains", &domains, "articles")?;

        let languages = rank(frequency_table(articles, |a| a.language.as_str()), usize::MAX);
        write_ranking(f, "Languages", &languages, "articles")?;

        let countries = top_n(articles, |a| a.source_country.as_str(), TOP_COUNTRIES);
        write_ranking(f, "Top source countries", &countries, "articles")?;

        write_sample_header(f, self.options, articles.len())?;
        for article in articles.iter().take(self.options.sample) {
            writeln!(f, "Title: {}", display_value(&article.title))?;
            writeln!(
                f,
                "Domain: {} | Language: {} | Country: {}",
                display_value(&article.domain),
                display_value(&article.language),
                display_value(&article.source_country)
            )?;
            writeln!(f, "Seen: {}", seen_date(&article.seen_date))?;
            writeln!(f, "URL: {}", article.url)?;
            write_rule(f)?;
        }
        Ok(())
    }
}

/// `20230315T120000Z` as `2023-03-15 12:00`, anything else verbatim.
fn seen_date(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%SZ") {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => display_value(raw).to_string(),
    }
}
