use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy};
use url::Url;

use super::models::{FeedSource, ParsedFeed};
use super::parser::parse_feed;
use crate::config::AppConfig;
use crate::{Error, Result};

const MAX_FEED_BYTES: usize = 5 * 1024 * 1024;
const FEED_ACCEPT: &str = "application/rss+xml, application/xml;q=0.9, */*;q=0.8";

/// Retrieval capability consumed by the aggregation pipeline
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch and parse one feed
    async fn fetch_feed(&self, source: &FeedSource) -> Result<ParsedFeed>;
}

/// HTTP feed fetcher. Built once at startup and shared by reference; holds no
/// per-request state.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a new feed fetcher with configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Self::build_client(
            config.sync.request_timeout_secs,
            &config.sync.user_agent,
            &config.sync.proxy_url,
        )?;

        Ok(Self { client })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, user_agent: &str, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(Self::build_headers(user_agent))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for feed fetching");
        }

        builder.build().map_err(Error::Http)
    }

    fn build_headers(user_agent: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(FEED_ACCEPT));
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        headers
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::FeedParse(format!("HTTP {} for URL: {}", status, url)));
        }

        if let Some(len) = response.content_length() {
            ensure_content_size(len as usize, url)?;
        }

        let bytes = response.bytes().await?;
        ensure_content_size(bytes.len(), url)?;
        Ok(bytes)
    }
}

#[async_trait]
impl FeedClient for FeedFetcher {
    async fn fetch_feed(&self, source: &FeedSource) -> Result<ParsedFeed> {
        let url = Url::parse(source.url.trim())?;

        tracing::debug!("Fetching feed from: {}", url);

        let content = self.fetch_bytes(url.as_str()).await?;
        parse_feed(&content)
    }
}

fn ensure_content_size(size: usize, url: &str) -> Result<()> {
    if size > MAX_FEED_BYTES {
        return Err(Error::FeedParse(format!(
            "Feed too large ({} bytes) for URL: {}",
            size, url
        )));
    }
    Ok(())
}
