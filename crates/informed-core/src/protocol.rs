//! JSON envelopes handed to the dashboard
//!
//! Every response carries `updatedAt` in epoch milliseconds next to a single
//! payload field. The `empty` constructors are what a front end sends when a
//! whole query fails, so the page still renders.

use chrono::Utc;
use serde::Serialize;

use crate::aggregate::{MoodSummary, SourceOutcome, Topic};
use crate::article::Article;
use crate::feed::FeedSource;
use crate::market::Quote;

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub updated_at: i64,
    pub articles: Vec<Article>,
}

impl NewsResponse {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            updated_at: now_millis(),
            articles,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicsResponse<'a> {
    pub updated_at: i64,
    pub topics: Vec<Topic<'a>>,
}

impl<'a> TopicsResponse<'a> {
    pub fn new(topics: Vec<Topic<'a>>) -> Self {
        Self {
            updated_at: now_millis(),
            topics,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodResponse {
    pub updated_at: i64,
    pub mood: MoodSummary,
}

impl MoodResponse {
    pub fn new(mood: MoodSummary) -> Self {
        Self {
            updated_at: now_millis(),
            mood,
        }
    }

    pub fn empty() -> Self {
        Self::new(MoodSummary::default())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesResponse {
    pub updated_at: i64,
    pub quotes: Vec<Quote>,
}

impl QuotesResponse {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            updated_at: now_millis(),
            quotes,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

/// One configured feed, optionally with the result of a probe run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    #[serde(flatten)]
    pub source: FeedSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedStatus {
    pub fn unchecked(source: FeedSource) -> Self {
        Self {
            source,
            ok: None,
            articles: None,
            rejected: None,
            error: None,
        }
    }
}

impl From<SourceOutcome> for FeedStatus {
    fn from(outcome: SourceOutcome) -> Self {
        match outcome {
            SourceOutcome::Fetched {
                source,
                articles,
                rejected,
            } => Self {
                source,
                ok: Some(true),
                articles: Some(articles.len()),
                rejected: Some(rejected),
                error: None,
            },
            SourceOutcome::Failed { source, reason } => Self {
                source,
                ok: Some(false),
                articles: None,
                rejected: None,
                error: Some(reason),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedListResponse {
    pub updated_at: i64,
    pub feeds: Vec<FeedStatus>,
}

impl FeedListResponse {
    pub fn new(feeds: Vec<FeedStatus>) -> Self {
        Self {
            updated_at: now_millis(),
            feeds,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}
