use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::opml::parse_opml;
use crate::{Error, Result};

/// One configured RSS/Atom origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    /// Display name, used when the URL has no usable hostname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category hint applied when no title rule matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            category: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Name used in log lines
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    /// Load a feed list from disk. `.opml` and `.xml` files are read as OPML,
    /// anything else as a JSON array of `{url, name?, category?}` objects.
    pub fn load_list(path: &Path) -> Result<Vec<FeedSource>> {
        let content = std::fs::read_to_string(path)?;
        let is_opml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("opml") || ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);

        if is_opml {
            parse_opml(&content)
        } else {
            Self::parse_json_list(&content)
        }
    }

    pub fn parse_json_list(content: &str) -> Result<Vec<FeedSource>> {
        let sources: Vec<FeedSource> = serde_json::from_str(content)?;
        if let Some(bad) = sources.iter().find(|s| s.url.trim().is_empty()) {
            return Err(Error::FeedList(format!(
                "feed entry without url (name: {})",
                bad.name.as_deref().unwrap_or("-")
            )));
        }
        Ok(sources)
    }
}

/// An untrusted, partially-populated entry as it came out of the feed parser
#[derive(Debug, Clone, Default)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub enclosure_url: Option<String>,
    pub media_content_url: Option<String>,
    /// Image object / media thumbnail
    pub image_url: Option<String>,
    /// Full HTML body (content:encoded, atom content)
    pub content_html: Option<String>,
    /// HTML description / summary
    pub summary_html: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl RawFeedItem {
    /// HTML fields in the order they are searched for images and snippets
    pub fn html_fields(&self) -> impl Iterator<Item = &str> {
        self.content_html
            .as_deref()
            .into_iter()
            .chain(self.summary_html.as_deref())
    }
}

/// Parsed feed: channel title plus its raw items
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub items: Vec<RawFeedItem>,
}
