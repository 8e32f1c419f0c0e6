use std::sync::Arc;

use tracing::error;

use super::mood::MoodSummary;
use super::pipeline::{Aggregator, SentimentFilter, SourceOutcome};
use super::topics::{Topic, TopicExtractor};
use crate::article::Article;
use crate::config::AppConfig;
use crate::feed::{FeedClient, FeedFetcher, FeedSource};
use crate::sentiment::{LexiconScorer, SentimentScorer};
use crate::Result;

/// The two read-only queries behind the dashboard, bound to one feed list
pub struct NewsService {
    aggregator: Aggregator,
    topics: TopicExtractor,
    sources: Vec<FeedSource>,
}

impl NewsService {
    pub fn new(
        client: Arc<dyn FeedClient>,
        scorer: Arc<dyn SentimentScorer>,
        sources: Vec<FeedSource>,
        config: &AppConfig,
    ) -> Self {
        Self {
            aggregator: Aggregator::new(client, scorer, config),
            topics: TopicExtractor::new(config),
            sources,
        }
    }

    /// HTTP fetcher plus the built-in lexicon scorer. An unreadable feed list
    /// is logged and treated as empty so queries still answer.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = FeedFetcher::new(config)?;
        let sources = config.feed_sources().unwrap_or_else(|e| {
            error!("Failed to load feed list: {}", e);
            Vec::new()
        });

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(LexiconScorer::new()),
            sources,
            config,
        ))
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    pub async fn fetch_articles(&self, filter: SentimentFilter) -> Vec<Article> {
        self.aggregator.fetch_articles(&self.sources, filter).await
    }

    pub fn aggregate_topics<'a>(&self, articles: &'a [Article]) -> Vec<Topic<'a>> {
        self.topics.extract(articles)
    }

    pub fn mood(&self, articles: &[Article]) -> MoodSummary {
        MoodSummary::from_articles(articles)
    }

    /// Per-source outcome of one unfiltered run, for diagnostics
    pub async fn check_feeds(&self) -> Vec<SourceOutcome> {
        self.aggregator.collect(&self.sources, SentimentFilter::All).await
    }
}
