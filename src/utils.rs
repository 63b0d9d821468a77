//! String helpers shared by the decoders and the reports.
//!
//! - Byte-bounded previews of raw response bodies for error messages
//! - Character-bounded truncation for console output
//! - HTML-to-text conversion for feed descriptions
//! - Host extraction for ranking items by domain

use itertools::Itertools;
use scraper::Html;
use url::Url;

/// Maximum number of body bytes quoted in a decode or status error.
pub const PREVIEW_BYTES: usize = 500;

/// Cut a raw response body down for inclusion in an error message.
///
/// Bodies longer than [`PREVIEW_BYTES`] are cut at the last character
/// boundary that fits and get `"..."` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(preview("short"), "short");
/// assert!(preview(&"a".repeat(900)).ends_with("..."));
/// ```
pub fn preview(body: &str) -> String {
    truncate_bytes(body, PREVIEW_BYTES)
}

/// Truncate `s` to at most `max` bytes without splitting a character.
pub fn truncate_bytes(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

/// Truncate `s` to at most `max` characters for console display.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Render an HTML fragment as plain text with collapsed whitespace.
///
/// Feed descriptions routinely carry markup (`<p>`, `<img>`, links). Plain
/// strings pass through unchanged apart from whitespace collapsing.
pub fn html_to_text(fragment: &str) -> String {
    if !fragment.contains('<') {
        return collapse_whitespace(fragment);
    }
    let parsed = Html::parse_fragment(fragment);
    let text = parsed.root_element().text().collect::<String>();
    collapse_whitespace(&text)
}

/// Join all whitespace runs into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Host of a URL with any leading `www.` removed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(host_of("https://www.bbc.co.uk/news/1"), Some("bbc.co.uk".to_string()));
/// assert_eq!(host_of("not a url"), None);
/// ```
pub fn host_of(link: &str) -> Option<String> {
    let parsed = Url::parse(link.trim()).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}
