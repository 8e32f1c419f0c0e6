pub mod aggregate;
pub mod article;
pub mod config;
pub mod error;
pub mod feed;
pub mod market;
pub mod protocol;
pub mod sentiment;

pub use aggregate::{aggregate_topics, mood_summary, MoodSummary, NewsService, SentimentFilter, SourceOutcome, Topic};
pub use article::{Article, Category};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use feed::{FeedClient, FeedFetcher, FeedSource};
pub use market::{fetch_quotes, Quote, QuoteProvider, Ticker};
pub use sentiment::{LabelRule, LexiconScorer, Sentiment, SentimentLabel, SentimentScorer};
