use crate::config::ReportOptions;
use crate::models::NewsApiResponse;
use crate::ranking::top_n;
use crate::report::{NO_RECORDS, display_value, write_ranking, write_rule, write_sample_header};
use crate::utils::{collapse_whitespace, truncate_chars};
use std::fmt;

const DESCRIPTION_CHARS: usize = 120;

#[derive(Debug, Clone, Copy)]
pub struct NewsApiReport<'a> {
    pub response: &'a NewsApiResponse,
    pub options: ReportOptions,
}

impl fmt::Display for NewsApiReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let articles = &self.response.articles;
        writeln!(f)?;
        writeln!(f, "Total results: {}", self.response.total_results)?;
        writeln!(f, "Returned: {}", articles.len())?;
        if articles.is_empty() {
            return writeln!(f, "{NO_RECORDS}");
        }

        let sources = top_n(articles, |a| a.source_name(), self.options.top);
        write_ranking(f, "Top sources", &sources, "articles")?;

        write_sample_header(f, self.options, articles.len())?;
        for article in articles.iter().take(self.options.sample) {
            writeln!(f, "Title: {}", display_value(article.title.as_deref().unwrap_or_default()))?;
            writeln!(
                f,
                "Source: {} | Author: {}",
                display_value(article.source_name()),
                display_value(article.author.as_deref().unwrap_or_default())
            )?;
            match article.published_at {
                Some(ts) => writeln!(f, "Published: {}", ts.format("%Y-%m-%d %H:%M"))?,
                None => writeln!(f, "Published: (unknown)")?,
            }
            if let Some(description) = article.description.as_deref().map(collapse_whitespace).filter(|d| !d.is_empty()) {
                writeln!(f, "Description: {}", truncate_chars(&description, DESCRIPTION_CHARS))?;
            }
            writeln!(f, "URL: {}", display_value(article.url.as_deref().unwrap_or_default()))?;
            write_rule(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::newsapi::decode;
    use reqwest::StatusCode;

    const BODY: &str = r#"{"status":"ok","totalResults":42,"articles":[
        {"source":{"id":null,"name":"El Tiempo"},"author":"Ana","title":"UdeA abre convocatoria","description":"La universidad   abre su convocatoria anual.","url":"https://eltiempo.com/1","publishedAt":"2024-05-06T08:30:00Z","content":null},
        {"source":{"id":null,"name":"Semana"},"author":null,"title":"Otra","description":null,"url":"https://semana.com/2","publishedAt":"2024-05-05T10:00:00Z","content":null},
        {"source":{"id":null,"name":"El Tiempo"},"author":null,"title":"Tercera","description":null,"url":"https://eltiempo.com/3","publishedAt":null,"content":null}
    ]}"#;

    fn options(sample: usize) -> ReportOptions {
        ReportOptions { top: 10, sample }
    }

    #[test]
    fn test_report_counts_and_ranking() {
        let response = decode(StatusCode::OK, BODY).unwrap();
        let text = NewsApiReport {
            response: &response,
            options: options(5),
        }
        .to_string();

        assert!(text.contains("Total results: 42"));
        assert!(text.contains("Returned: 3"));
        let tiempo = text.find("1. El Tiempo").unwrap();
        let semana = text.find("2. Semana").unwrap();
        assert!(tiempo < semana);
        assert!(text.contains("(2 articles)"));
        assert!(text.contains("Published: 2024-05-06 08:30"));
        assert!(text.contains("Source: Semana | Author: (unknown)"));
        assert!(text.contains("Description: La universidad abre su convocatoria anual."));
        assert_eq!(text.matches("Description: ").count(), 1);
    }

    #[test]
    fn test_sample_is_capped() {
        let response = decode(StatusCode::OK, BODY).unwrap();
        let text = NewsApiReport {
            response: &response,
            options: options(1),
        }
        .to_string();
        assert!(text.contains("Sample (1 of 3)"));
        assert_eq!(text.matches("Title: ").count(), 1);
    }

    #[test]
    fn test_empty_result() {
        let response = decode(StatusCode::OK, r#"{"status":"ok","totalResults":0,"articles":[]}"#).unwrap();
        let text = NewsApiReport {
            response: &response,
            options: options(5),
        }
        .to_string();
        assert!(text.contains(NO_RECORDS));
        assert!(!text.contains("Top sources"));
    }
}
