mod mood;
mod pipeline;
mod service;
mod topics;

pub use mood::{mood_summary, MoodSummary};
pub use pipeline::{rank_articles, Aggregator, SentimentFilter, SourceOutcome};
pub use service::NewsService;
pub use topics::{aggregate_topics, Topic, TopicExtractor, TopicSentiment};
