use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;
use url::Url;

use super::category::categorize;
use super::models::Article;
use crate::config::AppConfig;
use crate::feed::{FeedSource, RawFeedItem};
use crate::sentiment::{LabelRule, Sentiment, SentimentScorer};

const FALLBACK_SOURCE: &str = "Source";

/// Why a raw item did not become an article
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("item has no usable title")]
    MissingTitle,
    #[error("item has no usable link")]
    MissingLink,
}

/// Maps raw feed items onto [`Article`]s
pub struct ArticleNormalizer {
    scorer: Arc<dyn SentimentScorer>,
    placeholder_image: String,
    label_rule: LabelRule,
    /// Content snippet length appended to the title before scoring, if enabled
    snippet_chars: Option<usize>,
    category_hints: bool,
}

impl ArticleNormalizer {
    pub fn new(scorer: Arc<dyn SentimentScorer>, config: &AppConfig) -> Self {
        let aggregate = &config.aggregate;
        Self {
            scorer,
            placeholder_image: config.general.placeholder_image.clone(),
            label_rule: aggregate.label_rule,
            snippet_chars: aggregate
                .score_content_snippet
                .then_some(aggregate.snippet_chars),
            category_hints: aggregate.source_category_hints,
        }
    }

    /// Normalize one item. `feed_title` is the parsed channel title and
    /// `fetched_at` stands in for a missing publish date.
    pub fn normalize(
        &self,
        item: &RawFeedItem,
        source: &FeedSource,
        feed_title: Option<&str>,
        fetched_at: DateTime<Utc>,
    ) -> Result<Article, Rejection> {
        let title = item
            .title
            .as_deref()
            .map(clean_text)
            .filter(|t| !t.is_empty())
            .ok_or(Rejection::MissingTitle)?;

        let link = item
            .link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .or_else(|| item.guid.as_deref().map(str::trim).filter(|g| looks_like_url(g)))
            .ok_or(Rejection::MissingLink)?
            .to_string();

        let image = self.extract_image(item);
        let published_at = item.published.or(item.updated).unwrap_or(fetched_at);
        let source_label = source_label(source, feed_title);
        let hint = source.category.as_deref().filter(|_| self.category_hints);
        let category = categorize(&title, hint);
        let sentiment = self.score(&title, item);

        Ok(Article {
            title,
            link,
            image,
            published_at,
            source: source_label,
            category,
            sentiment,
        })
    }

    fn score(&self, title: &str, item: &RawFeedItem) -> Sentiment {
        let snippet = self
            .snippet_chars
            .and_then(|max| item.html_fields().next().map(|html| snippet(html, max)))
            .filter(|s| !s.is_empty());

        match snippet {
            Some(snippet) => {
                let text = format!("{}. {}", title, snippet);
                Sentiment::score(self.scorer.as_ref(), &text, self.label_rule)
            }
            None => Sentiment::score(self.scorer.as_ref(), title, self.label_rule),
        }
    }

    /// enclosure -> media content -> image object -> first inline `<img>` -> placeholder
    fn extract_image(&self, item: &RawFeedItem) -> String {
        [
            item.enclosure_url.as_deref(),
            item.media_content_url.as_deref(),
            item.image_url.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| item.html_fields().find_map(first_image_src))
        .unwrap_or_else(|| self.placeholder_image.clone())
    }
}

/// Decode HTML entities, collapse whitespace runs, trim
pub fn clean_text(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `src` of the first `<img>` tag in an HTML fragment
pub fn first_image_src(html: &str) -> Option<String> {
    static IMG_SRC: OnceLock<Regex> = OnceLock::new();
    let re = IMG_SRC.get_or_init(|| {
        Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("valid img pattern")
    });

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str().trim()).to_string())
        .filter(|src| !src.is_empty())
}

/// Feed hostname without `www.`, then the declared name, then the channel title
pub fn source_label(source: &FeedSource, feed_title: Option<&str>) -> String {
    let host = Url::parse(source.url.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .filter(|h| !h.is_empty());

    host.or_else(|| source.name.as_deref().map(clean_text))
        .or_else(|| feed_title.map(clean_text))
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| FALLBACK_SOURCE.to_string())
}

/// Plain-text prefix of an HTML fragment, at most `max_chars` characters
fn snippet(html: &str, max_chars: usize) -> String {
    let text = html2text::from_read(html.as_bytes(), 200).unwrap_or_else(|_| html.to_string());
    clean_text(&text).chars().take(max_chars).collect()
}

fn looks_like_url(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with("http://") || s.starts_with("https://")
}
