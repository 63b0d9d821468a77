use crate::config::ReportOptions;
use crate::models::GuardianResponse;
use crate::ranking::top_n;
use crate::report::{NO_RECORDS, display_value, write_ranking, write_rule, write_sample_header};
use std::fmt;

#[derive(Debug, Clone, Copy)]
pub struct GuardianReport<'a> {
    pub response: &'a GuardianResponse,
    pub options: ReportOptions,
}

impl fmt::Display for GuardianReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = &self.response.response;
        writeln!(f)?;
        writeln!(f, "Total results: {}", page.total)?;
        writeln!(
            f,
            "Page {} of {} ({} per page)",
            page.current_page, page.pages, page.page_size
        )?;
        writeln!(f, "Returned: {}", page.results.len())?;
        if page.results.is_empty() {
            return writeln!(f, "{NO_RECORDS}");
        }

        let sections = top_n(&page.results, |a| a.section_name.as_str(), self.options.top);
        write_ranking(f, "Top sections", &sections, "articles")?;

        write_sample_header(f, self.options, page.results.len())?;
        for article in page.results.iter().take(self.options.sample) {
            writeln!(f, "Title: {}", display_value(&article.web_title))?;
            writeln!(f, "Section: {}", display_value(&article.section_name))?;
            match article.web_publication_date {
                Some(ts) => writeln!(f, "Date: {}", ts.format("%Y-%m-%d"))?,
                None => writeln!(f, "Date: (unknown)")?,
            }
            writeln!(f, "URL: {}", article.web_url)?;
            write_rule(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::guardian::decode;
    use reqwest::StatusCode;

    #[test]
    fn test_report() {
        let body = r#"{"response":{"status":"ok","total":120,"pageSize":3,"currentPage":1,"pages":40,"results":[
            {"id":"a","type":"article","sectionName":"World news","webTitle":"One","webUrl":"https://g.co/1","webPublicationDate":"2023-04-01T10:00:00Z"},
            {"id":"b","type":"article","sectionName":"Education","webTitle":"Two","webUrl":"https://g.co/2","webPublicationDate":"2023-05-01T10:00:00Z"},
            {"id":"c","type":"article","sectionName":"Education","webTitle":"Three","webUrl":"https://g.co/3"}
        ]}}"#;
        let response = decode(StatusCode::OK, body).unwrap();
        let text = GuardianReport {
            response: &response,
            options: ReportOptions { top: 5, sample: 5 },
        }
        .to_string();

        assert!(text.contains("Total results: 120"));
        assert!(text.contains("Page 1 of 40 (3 per page)"));
        assert!(text.contains(&format!("   1. {:<30} (2 articles)", "Education")));
        assert!(text.contains(&format!("   2. {:<30} (1 articles)", "World news")));
        assert!(text.contains("Date: 2023-04-01"));
        assert!(text.contains("Date: (unknown)"));
    }

    #[test]
    fn test_empty_result() {
        let body = r#"{"response":{"status":"ok","total":0,"pageSize":50,"currentPage":1,"pages":0,"results":[]}}"#;
        let response = decode(StatusCode::OK, body).unwrap();
        let text = GuardianReport {
            response: &response,
            options: ReportOptions { top: 5, sample: 5 },
        }
        .to_string();
        assert!(text.contains(NO_RECORDS));
    }
}
