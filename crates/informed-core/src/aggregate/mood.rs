use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::sentiment::SentimentLabel;

/// The "nation's mood" pill: share of articles per sentiment label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub total: usize,
    /// Percent of articles labelled positive
    pub positive: u8,
    pub neutral: u8,
    pub negative: u8,
}

impl MoodSummary {
    pub fn from_articles(articles: &[Article]) -> Self {
        let (mut pos, mut neu, mut neg) = (0usize, 0usize, 0usize);
        for article in articles {
            match article.label() {
                SentimentLabel::Positive => pos += 1,
                SentimentLabel::Neutral => neu += 1,
                SentimentLabel::Negative => neg += 1,
            }
        }

        let total = articles.len();
        let denom = total.max(1) as f64;
        let share = |n: usize| ((n as f64 / denom) * 100.0).round() as u8;

        Self {
            total,
            positive: share(pos),
            neutral: share(neu),
            negative: share(neg),
        }
    }

    /// Label with the largest share; neutral on ties or an empty set
    pub fn dominant(&self) -> SentimentLabel {
        if self.positive > self.negative && self.positive > self.neutral {
            SentimentLabel::Positive
        } else if self.negative > self.positive && self.negative > self.neutral {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

pub fn mood_summary(articles: &[Article]) -> MoodSummary {
    MoodSummary::from_articles(articles)
}
