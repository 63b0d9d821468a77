use crate::config::ReportOptions;
use crate::models::{PublicMetrics, XResponse};
use crate::report::{NO_RECORDS, write_rule, write_sample_header};
use crate::utils::collapse_whitespace;
use std::fmt;

#[derive(Debug, Clone, Copy)]
pub struct XReport<'a> {
    pub response: &'a XResponse,
    pub options: ReportOptions,
}

impl XReport<'_> {
    /// Engagement summed over every returned post.
    pub fn totals(&self) -> PublicMetrics {
        self.response
            .data
            .iter()
            .fold(PublicMetrics::default(), |acc, tweet| PublicMetrics {
                retweet_count: acc.retweet_count + tweet.public_metrics.retweet_count,
                like_count: acc.like_count + tweet.public_metrics.like_count,
                reply_count: acc.reply_count + tweet.public_metrics.reply_count,
                quote_count: acc.quote_count + tweet.public_metrics.quote_count,
            })
    }
}

impl fmt::Display for XReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tweets = &self.response.data;
        writeln!(f)?;
        writeln!(f, "Result count: {}", self.response.meta.result_count)?;
        writeln!(f, "Returned: {}", tweets.len())?;
        let meta = &self.response.meta;
        if let (Some(newest), Some(oldest)) = (&meta.newest_id, &meta.oldest_id) {
            writeln!(f, "ID span: {oldest} .. {newest}")?;
        }
        if meta.next_token.is_some() {
            writeln!(f, "More results available beyond this page.")?;
        }
        for error in &self.response.errors {
            writeln!(f, "Partial error: {}", error.describe())?;
        }
        if tweets.is_empty() {
            return writeln!(f, "{NO_RECORDS}");
        }

        let totals = self.totals();
        writeln!(f)?;
        writeln!(f, "Engagement totals:")?;
        writeln!(f, "  Retweets: {}", totals.retweet_count)?;
        writeln!(f, "  Likes:    {}", totals.like_count)?;
        writeln!(f, "  Replies:  {}", totals.reply_count)?;
        writeln!(f, "  Quotes:   {}", totals.quote_count)?;

        write_sample_header(f, self.options, tweets.len())?;
        for tweet in tweets.iter().take(self.options.sample) {
            writeln!(f, "ID: {}", tweet.id)?;
            match tweet.created_at {
                Some(ts) => writeln!(f, "Date: {}", ts.format("%Y-%m-%d %H:%M"))?,
                None => writeln!(f, "Date: (unknown)")?,
            }
            let metrics = tweet.public_metrics;
            writeln!(
                f,
                "Retweets: {} | Likes: {} | Replies: {}",
                metrics.retweet_count, metrics.like_count, metrics.reply_count
            )?;
            writeln!(f, "Text: {}", collapse_whitespace(&tweet.text))?;
            write_rule(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::x::decode;
    use reqwest::StatusCode;

    const BODY: &str = r#"{
        "data":[
            {"id":"1","text":"Investigación en la UdeA\nhoy","created_at":"2024-05-06T14:00:00.000Z","public_metrics":{"retweet_count":2,"like_count":10,"reply_count":1,"quote_count":0}},
            {"id":"2","text":"Otra","public_metrics":{"retweet_count":3,"like_count":5,"reply_count":0,"quote_count":1}}
        ],
        "meta":{"newest_id":"2","oldest_id":"1","result_count":2}
    }"#;

    #[test]
    fn test_report() {
        let response = decode(StatusCode::OK, BODY).unwrap();
        let report = XReport {
            response: &response,
            options: ReportOptions { top: 10, sample: 5 },
        };
        let totals = report.totals();
        assert_eq!(totals.retweet_count, 5);
        assert_eq!(totals.like_count, 15);

        let text = report.to_string();
        assert!(text.contains("Result count: 2"));
        assert!(text.contains("ID span: 1 .. 2"));
        assert!(!text.contains("More results"));
        assert!(text.contains("Likes:    15"));
        assert!(text.contains("Date: 2024-05-06 14:00"));
        assert!(text.contains("Text: Investigación en la UdeA hoy"));
        assert!(text.contains("Retweets: 3 | Likes: 5 | Replies: 0"));
    }

    #[test]
    fn test_empty_result() {
        let response = decode(StatusCode::OK, r#"{"meta":{"result_count":0}}"#).unwrap();
        let text = XReport {
            response: &response,
            options: ReportOptions { top: 10, sample: 5 },
        }
        .to_string();
        assert!(text.contains(NO_RECORDS));
        assert!(!text.contains("Engagement"));
    }
}
