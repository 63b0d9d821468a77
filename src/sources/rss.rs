//! RSS / Atom feed reader.
//!
//! Feeds are fetched one after another. A document is tried as RSS first
//! (0.9x, 1.0/RDF and 2.0 all parse through the `rss` crate) and as Atom
//! second; whichever parses is normalised into a [`Feed`]. Namespaced
//! extensions are resolved by prefix: `dc:creator` fills in a missing
//! author, `media:content` and `media:thumbnail` supply the image. Item
//! descriptions lose their HTML on the way.

use crate::config::ReportOptions;
use crate::error::CollectorError;
use crate::models::{Feed, FeedItem};
use crate::sources::{ensure_success, fetch, http_client};
use crate::utils::{collapse_whitespace, html_to_text, preview};
use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const SOURCE: &str = "rss";
const CLIENT_USER_AGENT: &str = concat!("news_collector/", env!("CARGO_PKG_VERSION"));

/// Feeds read when none are configured.
pub const DEFAULT_FEEDS: [&str; 5] = [
    "https://www.eltiempo.com/rss/eltiempo.xml",
    "https://www.larepublica.co/rss",
    "https://feeds.bbci.co.uk/news/rss.xml",
    "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml",
    "https://www.theguardian.com/world/rss",
];

/// Report sizing when nothing is configured: 3 items per feed, top 10 in
/// the summary rankings.
pub const DEFAULT_REPORT: ReportOptions = ReportOptions { top: 10, sample: 3 };
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Check every feed URL before anything is fetched.
pub fn validate_feeds(feeds: &[String]) -> Result<Vec<Url>, CollectorError> {
    if feeds.is_empty() {
        return Err(CollectorError::Config("no feeds to read".to_string()));
    }
    feeds
        .iter()
        .map(|raw| {
            let url = Url::parse(raw.trim())
                .map_err(|e| CollectorError::Config(format!("invalid feed URL {raw:?}: {e}")))?;
            match url.scheme() {
                "http" | "https" => Ok(url),
                other => Err(CollectorError::Config(format!(
                    "feed URL {raw:?} has unsupported scheme {other:?}"
                ))),
            }
        })
        .collect()
}

#[derive(Debug)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Result<Self, CollectorError> {
        Ok(Self {
            client: http_client(SOURCE, timeout)?,
        })
    }

    pub fn request(&self, url: &Url) -> RequestBuilder {
        self.client
            .get(url.clone())
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }

    /// Fetch and parse a single feed.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch_feed(&self, url: &Url) -> Result<Feed, CollectorError> {
        let (status, body) = fetch(SOURCE, self.request(url)).await?;
        let feed = decode(url.as_str(), status, &body)?;
        info!(items = feed.items.len(), title = %feed.title, "Parsed feed");
        Ok(feed)
    }
}

/// Validate and parse one feed response.
pub fn decode(url: &str, status: StatusCode, body: &str) -> Result<Feed, CollectorError> {
    ensure_success(SOURCE, status, body)?;
    parse_feed(url, body)
}

/// Parse an RSS or Atom document.
///
/// When both parses fail the RSS error is reported, since that is the
/// format nearly every news site serves. A root element other than `<rss>`,
/// `<rdf:RDF>` or Atom's `<feed>` is rejected rather than read as an empty
/// feed.
pub fn parse_feed(url: &str, xml: &str) -> Result<Feed, CollectorError> {
    let rss_error = match ::rss::Channel::read_from(xml.as_bytes()) {
        Ok(channel) => return Ok(from_rss(&channel)),
        Err(e) => e,
    };
    debug!(error = %rss_error, "Not RSS; trying Atom");

    match atom_syndication::Feed::read_from(xml.as_bytes()) {
        Ok(feed) => Ok(from_atom(&feed)),
        Err(_) => Err(CollectorError::Feed {
            url: url.to_string(),
            error: rss_error,
            preview: preview(xml),
        }),
    }
}

fn from_rss(channel: &::rss::Channel) -> Feed {
    Feed {
        title: collapse_whitespace(channel.title()),
        description: html_to_text(channel.description()),
        items: channel.items().iter().map(rss_item).collect(),
    }
}

fn rss_item(item: &::rss::Item) -> FeedItem {
    let image = item
        .enclosure()
        .filter(|e| e.mime_type().starts_with("image/"))
        .map(|e| e.url().to_string())
        .or_else(|| media_image(item));

    let author = item
        .author()
        .map(str::to_string)
        .or_else(|| {
            item.dublin_core_ext()
                .and_then(|dc| dc.creators().first().cloned())
        })
        .or_else(|| extension_value(item, "dc", "creator"))
        .map(|a| collapse_whitespace(&a))
        .filter(|a| !a.is_empty());

    FeedItem {
        title: collapse_whitespace(item.title().unwrap_or_default()),
        link: item.link().unwrap_or_default().trim().to_string(),
        published: item.pub_date().unwrap_or_default().trim().to_string(),
        description: html_to_text(item.description().unwrap_or_default()),
        categories: item
            .categories()
            .iter()
            .map(|c| collapse_whitespace(c.name()))
            .filter(|c| !c.is_empty())
            .collect(),
        author,
        image,
        enclosure: item.enclosure().map(|e| e.url().to_string()),
    }
}

/// First image among the item's `media:content` elements, else the first
/// `media:thumbnail`.
fn media_image(item: &::rss::Item) -> Option<String> {
    let media = item.extensions().get("media")?;

    let content = media.get("content").into_iter().flatten().find_map(|content| {
        let attrs = content.attrs();
        let url = attrs.get("url")?;
        let is_image = attrs.get("medium").is_some_and(|m| m == "image")
            || attrs.get("type").is_some_and(|t| t.starts_with("image/"));
        is_image.then(|| url.clone())
    });

    content.or_else(|| {
        media
            .get("thumbnail")
            .into_iter()
            .flatten()
            .find_map(|thumbnail| thumbnail.attrs().get("url").cloned())
    })
}

fn extension_value(item: &::rss::Item, prefix: &str, name: &str) -> Option<String> {
    item.extensions()
        .get(prefix)?
        .get(name)?
        .iter()
        .find_map(|ext| ext.value())
        .map(str::to_string)
}

fn from_atom(feed: &atom_syndication::Feed) -> Feed {
    Feed {
        title: html_to_text(feed.title().as_str()),
        description: feed
            .subtitle()
            .map(|s| html_to_text(s.as_str()))
            .unwrap_or_default(),
        items: feed.entries().iter().map(atom_entry).collect(),
    }
}

fn atom_entry(entry: &atom_syndication::Entry) -> FeedItem {
    let links = entry.links();
    let link = links
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| links.first())
        .map(|l| l.href().trim().to_string())
        .unwrap_or_default();
    let enclosure = links.iter().find(|l| l.rel() == "enclosure");
    let image = enclosure
        .filter(|l| l.mime_type().is_some_and(|mime| mime.starts_with("image/")))
        .map(|l| l.href().to_string());
    let description = entry
        .summary()
        .map(|s| s.as_str())
        .or_else(|| entry.content().and_then(|c| c.value()))
        .map(html_to_text)
        .unwrap_or_default();

    FeedItem {
        title: html_to_text(entry.title().as_str()),
        link,
        published: entry.published().unwrap_or(entry.updated()).to_rfc3339(),
        description,
        categories: entry
            .categories()
            .iter()
            .map(|c| c.term().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        author: entry.authors().first().map(|a| a.name().to_string()),
        image,
        enclosure: enclosure.map(|l| l.href().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:media="http://search.yahoo.com/mrss/" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>BBC News</title>
    <link>https://www.bbc.co.uk/news</link>
    <atom:link href="https://feeds.bbci.co.uk/news/rss.xml" rel="self" type="application/rss+xml"/>
    <description>BBC News - News Front Page</description>
    <image><title>BBC News</title><url>https://news.bbcimg.co.uk/logo.gif</url><link>https://www.bbc.co.uk/news</link></image>
    <item>
      <title>Universities reopen after strike</title>
      <link>https://www.bbc.co.uk/news/education-1</link>
      <description><![CDATA[<p>Staff <b>return</b> to campuses.</p>]]></description>
      <pubDate>Mon, 06 May 2024 08:00:00 GMT</pubDate>
      <guid isPermaLink="false">education-1</guid>
      <category domain="section">Education</category>
      <enclosure url="https://ichef.bbci.co.uk/1.jpg" type="image/jpeg" length="0"/>
    </item>
    <item>
      <title>Markets rally</title>
      <link>https://www.bbc.co.uk/news/business-2</link>
      <description>Shares rose &amp; bonds fell.</description>
      <category>Business</category>
      <author>newsroom@bbc.co.uk</author>
      <category>Economy</category>
    </item>
  </channel>
</rss>"#;

    // Shaped like the New York Times home page feed: prefixed elements share
    // local names with plain item fields.
    const NAMESPACED_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:media="http://search.yahoo.com/mrss/" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>NYT &gt; Top Stories</title>
    <link>https://www.nytimes.com</link>
    <atom:link href="https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml" rel="self" type="application/rss+xml"/>
    <description></description>
    <item>
      <title>Campus protests spread</title>
      <link>https://www.nytimes.com/2024/05/06/us/campus.html</link>
      <atom:link href="https://www.nytimes.com/2024/05/06/us/campus.html" rel="standout"/>
      <description>Students gathered on Monday.</description>
      <dc:creator>Jane Doe</dc:creator>
      <pubDate>Mon, 06 May 2024 09:00:00 +0000</pubDate>
      <category domain="http://www.nytimes.com/namespaces/keywords/des">Colleges and Universities</category>
      <media:content height="1350" medium="image" url="https://static01.nyt.com/images/campus.jpg" width="1800"/>
      <media:credit>John Smith for The New York Times</media:credit>
      <media:description>Students outside the library.</media:description>
      <media:title>Campus</media:title>
    </item>
    <item>
      <title>Thumbnail only</title>
      <link>https://www.nytimes.com/2024/05/06/world/thumb.html</link>
      <media:thumbnail url="https://static01.nyt.com/images/thumb.jpg"/>
    </item>
  </channel>
</rss>"#;

    const SAMPLE_RDF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://purl.org/rss/1.0/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel rdf:about="https://example.org/">
    <title>RDF Site</title>
    <link>https://example.org/</link>
    <description>An RSS 1.0 feed</description>
  </channel>
  <item rdf:about="https://example.org/a">
    <title>A</title>
    <link>https://example.org/a</link>
    <dc:creator>Ana</dc:creator>
  </item>
  <item rdf:about="https://example.org/b">
    <title>B</title>
    <link>https://example.org/b</link>
  </item>
</rdf:RDF>"#;

    const SAMPLE_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <subtitle>Updates</subtitle>
  <id>urn:example:feed</id>
  <updated>2024-05-06T09:00:00Z</updated>
  <entry>
    <title type="html">First &lt;em&gt;post&lt;/em&gt;</title>
    <id>urn:example:first</id>
    <link rel="alternate" href="https://example.org/first"/>
    <link rel="enclosure" type="image/png" href="https://example.org/first.png"/>
    <published>2024-05-06T08:00:00Z</published>
    <updated>2024-05-06T09:00:00Z</updated>
    <summary>Short summary</summary>
    <author><name>Ana</name></author>
    <category term="science"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_channel_and_items() {
        let feed = parse_feed("https://feeds.bbci.co.uk/news/rss.xml", SAMPLE_RSS).unwrap();
        assert_eq!(feed.title, "BBC News");
        assert_eq!(feed.description, "BBC News - News Front Page");
        assert_eq!(feed.items.len(), 2);

        let first = &feed.items[0];
        assert_eq!(first.title, "Universities reopen after strike");
        assert_eq!(first.link, "https://www.bbc.co.uk/news/education-1");
        assert_eq!(first.description, "Staff return to campuses.");
        assert_eq!(first.published, "Mon, 06 May 2024 08:00:00 GMT");
        assert_eq!(first.categories, vec!["Education"]);
        assert_eq!(first.image.as_deref(), Some("https://ichef.bbci.co.uk/1.jpg"));
        assert_eq!(first.enclosure.as_deref(), Some("https://ichef.bbci.co.uk/1.jpg"));
    }

    #[test]
    fn test_parse_rss_interleaved_categories_and_entities() {
        let feed = parse_feed("u", SAMPLE_RSS).unwrap();
        let second = &feed.items[1];
        assert_eq!(second.description, "Shares rose & bonds fell.");
        assert_eq!(second.categories, vec!["Business", "Economy"]);
        assert_eq!(second.author.as_deref(), Some("newsroom@bbc.co.uk"));
        assert!(second.image.is_none());
        assert!(second.published.is_empty());
    }

    #[test]
    fn test_parse_rss_namespaced_elements() {
        let feed = parse_feed("https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml", NAMESPACED_RSS)
            .unwrap();
        assert_eq!(feed.title, "NYT > Top Stories");
        assert_eq!(feed.items.len(), 2);

        let first = &feed.items[0];
        assert_eq!(first.link, "https://www.nytimes.com/2024/05/06/us/campus.html");
        assert_eq!(first.description, "Students gathered on Monday.");
        assert_eq!(first.author.as_deref(), Some("Jane Doe"));
        assert_eq!(first.image.as_deref(), Some("https://static01.nyt.com/images/campus.jpg"));
        assert!(first.enclosure.is_none());
        assert_eq!(first.categories, vec!["Colleges and Universities"]);

        let second = &feed.items[1];
        assert_eq!(second.image.as_deref(), Some("https://static01.nyt.com/images/thumb.jpg"));
        assert!(second.author.is_none());
    }

    #[test]
    fn test_parse_rss_1_0_items_outside_channel() {
        let feed = parse_feed("https://example.org/index.rdf", SAMPLE_RDF).unwrap();
        assert_eq!(feed.title, "RDF Site");
        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].title, "A");
        assert_eq!(feed.items[0].link, "https://example.org/a");
        assert_eq!(feed.items[0].author.as_deref(), Some("Ana"));
        assert_eq!(feed.items[1].title, "B");
    }

    #[test]
    fn test_parse_atom_fallback() {
        let feed = parse_feed("https://example.org/atom", SAMPLE_ATOM).unwrap();
        assert_eq!(feed.title, "Example Atom");
        assert_eq!(feed.description, "Updates");
        let entry = &feed.items[0];
        assert_eq!(entry.title, "First post");
        assert_eq!(entry.link, "https://example.org/first");
        assert!(entry.published.starts_with("2024-05-06T08:00:00"));
        assert_eq!(entry.author.as_deref(), Some("Ana"));
        assert_eq!(entry.categories, vec!["science"]);
        assert_eq!(entry.image.as_deref(), Some("https://example.org/first.png"));
    }

    #[test]
    fn test_parse_garbage_reports_feed_error() {
        let err = parse_feed("https://bad.example/rss", "<html><body>Not a feed</body></html>")
            .unwrap_err();
        match err {
            CollectorError::Feed { url, preview, .. } => {
                assert_eq!(url, "https://bad.example/rss");
                assert!(preview.contains("Not a feed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_root_with_channel_is_rejected() {
        let xml = "<document><channel><title>T</title><item><title>A</title></item></channel></document>";
        assert!(matches!(
            parse_feed("https://odd.example/feed", xml),
            Err(CollectorError::Feed { .. })
        ));
    }

    #[test]
    fn test_decode_http_error() {
        let err = decode("u", StatusCode::NOT_FOUND, "missing").unwrap_err();
        assert_eq!(err.http_status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_validate_feeds() {
        let ok = validate_feeds(&["https://a.example/rss".to_string()]).unwrap();
        assert_eq!(ok[0].host_str(), Some("a.example"));
        assert!(validate_feeds(&[]).is_err());
        assert!(validate_feeds(&["ftp://a.example/rss".to_string()]).is_err());
        assert!(validate_feeds(&["not a url".to_string()]).is_err());
    }

    #[test]
    fn test_default_feeds_are_valid() {
        let feeds: Vec<String> = DEFAULT_FEEDS.iter().map(|f| f.to_string()).collect();
        assert_eq!(validate_feeds(&feeds).unwrap().len(), 5);
    }
}
