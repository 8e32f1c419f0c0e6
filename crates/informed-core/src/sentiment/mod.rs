//! Sentiment scoring
//!
//! Polarity scoring is a pluggable capability ([`SentimentScorer`]); the rest
//! of the crate only consumes its `{pos, neu, neg, compound}` output and turns
//! it into percentages plus a discrete label.

mod lexicon;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use lexicon::LexiconScorer;

/// Compound score magnitude needed for a non-neutral label under [`LabelRule::Compound`]
pub const COMPOUND_THRESHOLD: f64 = 0.05;

/// Raw polarity fractions for a piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Polarity {
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    /// Normalized overall valence in [-1, 1]
    pub compound: f64,
}

/// Text -> polarity fractions
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Polarity;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(crate::Error::Other(format!("Unknown sentiment label: {}", other))),
        }
    }
}

/// How polarity is reduced to a label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelRule {
    /// Larger of the positive/negative percentages wins; a tie is neutral
    #[default]
    Majority,
    /// `compound >= COMPOUND_THRESHOLD` is positive, `<= -COMPOUND_THRESHOLD` negative
    Compound,
}

impl LabelRule {
    pub fn label(&self, polarity: &Polarity, pos_p: u8, neg_p: u8) -> SentimentLabel {
        match self {
            Self::Majority => {
                if pos_p > neg_p {
                    SentimentLabel::Positive
                } else if neg_p > pos_p {
                    SentimentLabel::Negative
                } else {
                    SentimentLabel::Neutral
                }
            }
            Self::Compound => {
                if polarity.compound >= COMPOUND_THRESHOLD {
                    SentimentLabel::Positive
                } else if polarity.compound <= -COMPOUND_THRESHOLD {
                    SentimentLabel::Negative
                } else {
                    SentimentLabel::Neutral
                }
            }
        }
    }
}

/// Per-article sentiment as rendered on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    pub compound: f64,
    #[serde(rename = "posP")]
    pub pos_p: u8,
    #[serde(rename = "negP")]
    pub neg_p: u8,
    #[serde(rename = "neuP")]
    pub neu_p: u8,
    pub label: SentimentLabel,
}

impl Sentiment {
    pub fn from_polarity(polarity: Polarity, rule: LabelRule) -> Self {
        let pos_p = percent(polarity.pos);
        let neg_p = percent(polarity.neg);
        let neu_p = percent(polarity.neu);
        let label = rule.label(&polarity, pos_p, neg_p);

        Self {
            pos: polarity.pos,
            neu: polarity.neu,
            neg: polarity.neg,
            compound: polarity.compound,
            pos_p,
            neg_p,
            neu_p,
            label,
        }
    }

    /// Score `text` with `scorer` and derive the label
    pub fn score(scorer: &dyn SentimentScorer, text: &str, rule: LabelRule) -> Self {
        Self::from_polarity(scorer.polarity(text), rule)
    }
}

fn percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}
