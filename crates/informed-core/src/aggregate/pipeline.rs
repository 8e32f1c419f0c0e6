use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::article::{Article, ArticleNormalizer};
use crate::config::AppConfig;
use crate::feed::{FeedClient, FeedSource};
use crate::sentiment::{SentimentLabel, SentimentScorer};
use crate::Error;

/// Which articles a caller wants back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentimentFilter {
    #[default]
    All,
    Only(SentimentLabel),
}

impl SentimentFilter {
    /// Lenient parse for query-string style input; anything unrecognised means `All`
    pub fn from_query(value: &str) -> Self {
        value
            .parse::<SentimentLabel>()
            .map(Self::Only)
            .unwrap_or(Self::All)
    }

    pub fn matches(&self, article: &Article) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => article.label() == *label,
        }
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(label) => write!(f, "{}", label),
        }
    }
}

/// Result of fetching and normalizing one feed source
#[derive(Debug, Clone)]
pub enum SourceOutcome {
    Fetched {
        source: FeedSource,
        articles: Vec<Article>,
        /// Items dropped for a missing title or link
        rejected: usize,
    },
    Failed {
        source: FeedSource,
        reason: String,
    },
}

impl SourceOutcome {
    pub fn source(&self) -> &FeedSource {
        match self {
            Self::Fetched { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Articles contributed by this source; none for a failure
    pub fn into_articles(self) -> Vec<Article> {
        match self {
            Self::Fetched { articles, .. } => articles,
            Self::Failed { .. } => Vec::new(),
        }
    }
}

/// Fetches every configured feed, normalizes, deduplicates and ranks
pub struct Aggregator {
    client: Arc<dyn FeedClient>,
    normalizer: ArticleNormalizer,
    fetch_timeout: Duration,
    fetch_delay: Duration,
    max_items_per_feed: usize,
    max_articles: usize,
}

impl Aggregator {
    pub fn new(
        client: Arc<dyn FeedClient>,
        scorer: Arc<dyn SentimentScorer>,
        config: &AppConfig,
    ) -> Self {
        Self {
            client,
            normalizer: ArticleNormalizer::new(scorer, config),
            fetch_timeout: Duration::from_secs(config.sync.request_timeout_secs),
            fetch_delay: Duration::from_millis(config.sync.fetch_delay_ms),
            max_items_per_feed: config.sync.max_items_per_feed,
            max_articles: config.aggregate.max_articles,
        }
    }

    /// Ranked, deduplicated, capped article list. Never fails: unreachable or
    /// broken feeds just contribute nothing.
    pub async fn fetch_articles(
        &self,
        sources: &[FeedSource],
        filter: SentimentFilter,
    ) -> Vec<Article> {
        let outcomes = self.collect(sources, filter).await;

        let failed = outcomes.iter().filter(|o| o.is_failure()).count();
        let articles = rank_articles(outcomes, self.max_articles);

        info!(
            "Aggregated {} articles from {} feeds ({} failed, filter: {})",
            articles.len(),
            sources.len(),
            failed,
            filter
        );

        articles
    }

    /// One outcome per source, in source order. Fetches run one after another
    /// with the politeness delay in between.
    pub async fn collect(
        &self,
        sources: &[FeedSource],
        filter: SentimentFilter,
    ) -> Vec<SourceOutcome> {
        let mut outcomes = Vec::with_capacity(sources.len());

        for (i, source) in sources.iter().enumerate() {
            if i > 0 && !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }

            let outcome = self.fetch_source(source, filter).await;
            if let SourceOutcome::Failed { ref reason, .. } = outcome {
                warn!("Skipping feed '{}': {}", source.display_name(), reason);
            }
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn fetch_source(&self, source: &FeedSource, filter: SentimentFilter) -> SourceOutcome {
        let fetched_at = Utc::now();

        let parsed = match tokio::time::timeout(self.fetch_timeout, self.client.fetch_feed(source)).await {
            Ok(Ok(parsed)) => parsed,
            Ok(Err(e)) => {
                return SourceOutcome::Failed {
                    source: source.clone(),
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                let timeout = Error::Timeout {
                    url: source.url.clone(),
                    secs: self.fetch_timeout.as_secs(),
                };
                return SourceOutcome::Failed {
                    source: source.clone(),
                    reason: timeout.to_string(),
                };
            }
        };

        let mut articles = Vec::new();
        let mut rejected = 0;

        for item in parsed.items.iter().take(self.max_items_per_feed) {
            match self
                .normalizer
                .normalize(item, source, parsed.title.as_deref(), fetched_at)
            {
                Ok(article) if filter.matches(&article) => articles.push(article),
                Ok(_) => {}
                Err(rejection) => {
                    debug!("Dropping item from '{}': {}", source.display_name(), rejection);
                    rejected += 1;
                }
            }
        }

        debug!(
            "Feed '{}': {} articles kept, {} rejected",
            source.display_name(),
            articles.len(),
            rejected
        );

        SourceOutcome::Fetched {
            source: source.clone(),
            articles,
            rejected,
        }
    }
}

/// Concatenate in outcome order, keep the first article per stripped link,
/// sort newest first (stable) and cap
pub fn rank_articles(outcomes: Vec<SourceOutcome>, max_articles: usize) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut articles: Vec<Article> = outcomes
        .into_iter()
        .flat_map(SourceOutcome::into_articles)
        .filter(|a| seen.insert(a.dedup_key().to_string()))
        .collect();

    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    articles.truncate(max_articles);
    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Category;
    use crate::sentiment::{LabelRule, Polarity, Sentiment};
    use chrono::{DateTime, TimeZone};

    fn article(link: &str, minute: u32, label: SentimentLabel) -> Article {
        let polarity = match label {
            SentimentLabel::Positive => Polarity { pos: 0.5, neu: 0.5, neg: 0.0, compound: 0.5 },
            SentimentLabel::Negative => Polarity { pos: 0.0, neu: 0.5, neg: 0.5, compound: -0.5 },
            SentimentLabel::Neutral => Polarity { pos: 0.0, neu: 1.0, neg: 0.0, compound: 0.0 },
        };
        Article {
            title: format!("Story {}", link),
            link: link.to_string(),
            image: String::new(),
            published_at: at(minute),
            source: "a.example".to_string(),
            category: Category::General,
            sentiment: Sentiment::from_polarity(polarity, LabelRule::Majority),
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap()
    }

    fn fetched(articles: Vec<Article>) -> SourceOutcome {
        SourceOutcome::Fetched {
            source: FeedSource::new("https://a.example/rss"),
            articles,
            rejected: 0,
        }
    }

    #[test]
    fn test_filter_from_query() {
        assert_eq!(SentimentFilter::from_query("positive"), SentimentFilter::Only(SentimentLabel::Positive));
        assert_eq!(SentimentFilter::from_query("NEGATIVE"), SentimentFilter::Only(SentimentLabel::Negative));
        assert_eq!(SentimentFilter::from_query("all"), SentimentFilter::All);
        assert_eq!(SentimentFilter::from_query("bogus"), SentimentFilter::All);
        assert_eq!(SentimentFilter::from_query(""), SentimentFilter::All);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let first = article("http://a.example/x?utm=1", 1, SentimentLabel::Neutral);
        let second = article("http://a.example/x?utm=2", 30, SentimentLabel::Positive);

        let ranked = rank_articles(vec![fetched(vec![first.clone()]), fetched(vec![second])], 80);
        assert_eq!(ranked, vec![first]);
    }

    #[test]
    fn test_sorted_newest_first_and_stable() {
        let a = article("http://a.example/a", 5, SentimentLabel::Neutral);
        let b = article("http://a.example/b", 20, SentimentLabel::Neutral);
        let c = article("http://a.example/c", 5, SentimentLabel::Neutral);

        let ranked = rank_articles(vec![fetched(vec![a.clone(), b.clone(), c.clone()])], 80);
        assert_eq!(ranked, vec![b, a, c]);
    }

    #[test]
    fn test_cap() {
        let feed = |prefix: &str| {
            let articles = (0..50)
                .map(|i| article(&format!("http://{}.example/{}", prefix, i), i, SentimentLabel::Neutral))
                .collect();
            fetched(articles)
        };

        let ranked = rank_articles(vec![feed("a"), feed("b")], 80);
        assert_eq!(ranked.len(), 80);
        assert!(ranked.windows(2).all(|w| w[0].published_at >= w[1].published_at));
    }

    #[test]
    fn test_failures_contribute_nothing() {
        let failed = SourceOutcome::Failed {
            source: FeedSource::new("https://down.example/rss"),
            reason: "boom".to_string(),
        };
        assert!(failed.is_failure());
        assert_eq!(failed.source().url, "https://down.example/rss");

        let ok = article("http://a.example/ok", 1, SentimentLabel::Neutral);
        let ranked = rank_articles(vec![failed, fetched(vec![ok.clone()])], 80);
        assert_eq!(ranked, vec![ok]);
    }

    #[test]
    fn test_empty() {
        assert!(rank_articles(Vec::new(), 80).is_empty());
    }
}
