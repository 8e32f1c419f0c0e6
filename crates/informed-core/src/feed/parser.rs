use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;

use super::models::{ParsedFeed, RawFeedItem};
use crate::{Error, Result};

/// Parse RSS/Atom/JSON Feed content into raw items.
///
/// No normalization happens here; every field is carried over as found so
/// the article normalizer can apply its own fallbacks.
pub fn parse_feed(content: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(content).map_err(|e| Error::FeedParse(e.to_string()))?;

    let title = feed.title.map(|t| t.content);
    let items = feed.entries.into_iter().map(raw_item).collect();

    Ok(ParsedFeed { title, items })
}

fn raw_item(entry: Entry) -> RawFeedItem {
    let link = select_link(&entry);
    let enclosure_url = select_enclosure(&entry);

    let media_content_url = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()));

    let image_url = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.trim())
        .find(|uri| !uri.is_empty())
        .map(str::to_string);

    let guid = Some(entry.id).filter(|id| !id.trim().is_empty());

    RawFeedItem {
        title: entry.title.map(|t| t.content),
        link,
        guid,
        enclosure_url,
        media_content_url,
        image_url,
        content_html: entry.content.and_then(|c| c.body),
        summary_html: entry.summary.map(|s| s.content),
        published: entry.published.map(DateTime::<Utc>::from),
        updated: entry.updated.map(DateTime::<Utc>::from),
    }
}

/// First alternate (or rel-less) link, else any non-empty link
fn select_link(entry: &Entry) -> Option<String> {
    let non_empty = || entry.links.iter().filter(|l| !l.href.trim().is_empty());

    non_empty()
        .find(|l| {
            l.rel
                .as_deref()
                .map(|rel| rel.eq_ignore_ascii_case("alternate"))
                .unwrap_or(true)
        })
        .or_else(|| non_empty().find(|l| l.rel.as_deref() != Some("enclosure")))
        .map(|l| l.href.trim().to_string())
}

/// Image enclosure: an Atom `rel="enclosure"` link, or an RSS `<enclosure>`
/// which the parser surfaces as media content with an image MIME type
fn select_enclosure(entry: &Entry) -> Option<String> {
    let is_image = |mime: Option<String>| mime.map(|m| m.starts_with("image/")).unwrap_or(false);

    entry
        .links
        .iter()
        .find(|l| {
            l.rel
                .as_deref()
                .map(|rel| rel.eq_ignore_ascii_case("enclosure"))
                .unwrap_or(false)
                && is_image(l.media_type.clone())
        })
        .map(|l| l.href.trim().to_string())
        .or_else(|| {
            entry
                .media
                .iter()
                .flat_map(|m| m.content.iter())
                .find(|c| is_image(c.content_type.as_ref().map(|m| m.to_string())))
                .and_then(|c| c.url.as_ref().map(|u| u.to_string()))
        })
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Example News</title>
    <link>https://www.example.com/</link>
    <description>Top stories</description>
    <item>
      <title>Markets surge as IPO sees record profit</title>
      <link>https://www.example.com/markets?utm=rss</link>
      <guid>https://www.example.com/markets</guid>
      <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate>
      <enclosure url="https://cdn.example.com/ipo.jpg" type="image/jpeg" length="0"/>
      <description>&lt;p&gt;Shares jumped&lt;/p&gt;</description>
    </item>
    <item>
      <title>Second story</title>
      <link>https://www.example.com/second</link>
      <content:encoded><![CDATA[<p><img src="https://cdn.example.com/inline.png"></p>]]></content:encoded>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_items() {
        let parsed = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Example News"));
        assert_eq!(parsed.items.len(), 2);

        let first = &parsed.items[0];
        assert_eq!(first.title.as_deref(), Some("Markets surge as IPO sees record profit"));
        assert_eq!(first.link.as_deref(), Some("https://www.example.com/markets?utm=rss"));
        assert_eq!(first.enclosure_url.as_deref(), Some("https://cdn.example.com/ipo.jpg"));
        assert!(first.published.is_some());

        let second = &parsed.items[1];
        assert!(second.published.is_none());
        assert!(second.enclosure_url.is_none());
        assert!(second.content_html.as_deref().unwrap_or("").contains("inline.png"));
    }

    #[test]
    fn test_parse_garbage_is_feed_parse_error() {
        let err = parse_feed(b"<html><body>not a feed</body></html>").unwrap_err();
        assert!(matches!(err, Error::FeedParse(_)));
    }
}
