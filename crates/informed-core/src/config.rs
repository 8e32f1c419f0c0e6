use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::feed::FeedSource;
use crate::market::Ticker;
use crate::sentiment::LabelRule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub aggregate: AggregateConfig,
    #[serde(default)]
    pub markets: MarketsConfig,
    /// Inline feed list, used when `general.feeds_path` is unset
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedSource>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            sync: SyncConfig::default(),
            aggregate: AggregateConfig::default(),
            markets: MarketsConfig::default(),
            feeds: default_feeds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// External feed list (JSON array or OPML), overrides the inline `feeds`
    #[serde(default)]
    pub feeds_path: Option<PathBuf>,
    /// Image used for articles without any extractable picture
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            feeds_path: None,
            placeholder_image: default_placeholder_image(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Per-feed fetch budget in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Politeness delay between consecutive feed fetches
    #[serde(default = "default_fetch_delay")]
    pub fetch_delay_ms: u64,
    /// Only the first N items of each feed are considered
    #[serde(default = "default_max_items_per_feed")]
    pub max_items_per_feed: usize,
    /// User-Agent sent with every feed request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP proxy URL for feed fetching (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            fetch_delay_ms: default_fetch_delay(),
            max_items_per_feed: default_max_items_per_feed(),
            user_agent: default_user_agent(),
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Cap on the ranked article list
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
    /// Cap on the topic list
    #[serde(default = "default_max_topics")]
    pub max_topics: usize,
    /// Shortest title token counted as a topic candidate
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    /// Sample articles kept per topic
    #[serde(default = "default_topic_samples")]
    pub topic_samples: usize,
    /// How polarity percentages map onto a sentiment label
    #[serde(default)]
    pub label_rule: LabelRule,
    /// Score the title together with a plain-text content snippet
    #[serde(default)]
    pub score_content_snippet: bool,
    /// Snippet length in characters when `score_content_snippet` is on
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
    /// Fall back to the feed's category hint when no title rule matches
    #[serde(default = "default_true")]
    pub source_category_hints: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            max_articles: default_max_articles(),
            max_topics: default_max_topics(),
            min_token_len: default_min_token_len(),
            topic_samples: default_topic_samples(),
            label_rule: LabelRule::default(),
            score_content_snippet: false,
            snippet_chars: default_snippet_chars(),
            source_category_hints: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketsConfig {
    #[serde(default = "default_tickers")]
    pub tickers: Vec<Ticker>,
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_placeholder_image() -> String {
    "https://placehold.co/800x450?text=Informed360".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_fetch_delay() -> u64 {
    50
}

fn default_max_items_per_feed() -> usize {
    15
}

fn default_user_agent() -> String {
    "Informed360Bot/1.0 (+https://informed360)".to_string()
}

fn default_max_articles() -> usize {
    80
}

fn default_max_topics() -> usize {
    16
}

fn default_min_token_len() -> usize {
    4 // tokens of three characters or fewer are noise
}

fn default_topic_samples() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_snippet_chars() -> usize {
    160
}

fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("https://feeds.feedburner.com/ndtvnews-top-stories").with_name("NDTV"),
        FeedSource::new("https://www.thehindu.com/news/national/feeder/default.rss")
            .with_name("The Hindu")
            .with_category("politics"),
        FeedSource::new("https://indianexpress.com/section/business/feed/")
            .with_name("Indian Express")
            .with_category("business"),
        FeedSource::new("https://timesofindia.indiatimes.com/rssfeeds/4719148.cms")
            .with_name("Times of India")
            .with_category("sports"),
        FeedSource::new("https://feeds.bbci.co.uk/news/world/rss.xml")
            .with_name("BBC")
            .with_category("world"),
    ]
}

fn default_tickers() -> Vec<Ticker> {
    vec![
        Ticker::new("^BSESN", "BSE Sensex"),
        Ticker::new("^NSEI", "NSE Nifty"),
        Ticker::new("GC=F", "Gold"),
        Ticker::new("CL=F", "Crude Oil"),
        Ticker::new("USDINR=X", "USD/INR"),
    ]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when absent
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/informed/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("informed")
            .join("config.toml")
    }

    /// Resolve the feed list for this run: the external list when configured,
    /// otherwise the inline `feeds` table
    pub fn feed_sources(&self) -> crate::Result<Vec<FeedSource>> {
        match self.general.feeds_path {
            Some(ref path) => FeedSource::load_list(&expand_tilde(path)),
            None => Ok(self.feeds.clone()),
        }
    }
}
