use std::collections::HashMap;

use super::{Polarity, SentimentScorer};

/// Headline valence lexicon, roughly on the VADER -4..4 scale
const LEXICON: &[(&str, f64)] = &[
    // positive
    ("win", 2.8),
    ("wins", 2.7),
    ("won", 2.7),
    ("victory", 2.8),
    ("success", 2.7),
    ("successful", 2.8),
    ("gain", 2.0),
    ("gains", 1.9),
    ("rise", 1.2),
    ("rises", 1.2),
    ("surge", 1.6),
    ("surges", 1.6),
    ("soar", 1.9),
    ("soars", 1.9),
    ("rally", 1.5),
    ("boost", 1.7),
    ("boosts", 1.7),
    ("growth", 1.6),
    ("profit", 1.9),
    ("profits", 1.9),
    ("record", 0.9),
    ("breakthrough", 2.4),
    ("progress", 1.8),
    ("improve", 1.9),
    ("improves", 1.9),
    ("strong", 2.3),
    ("best", 3.2),
    ("good", 1.9),
    ("great", 3.1),
    ("celebrate", 2.7),
    ("celebrates", 2.7),
    ("hope", 1.9),
    ("optimistic", 2.2),
    ("confident", 2.2),
    ("approve", 2.0),
    ("approves", 2.0),
    ("agree", 1.5),
    ("agreement", 2.2),
    ("peace", 2.5),
    ("safe", 1.9),
    ("rescue", 1.5),
    ("rescued", 1.8),
    ("support", 1.7),
    ("welcome", 2.0),
    ("award", 2.5),
    ("honour", 2.2),
    ("honor", 2.2),
    ("relief", 2.1),
    // negative
    ("loss", -1.3),
    ("losses", -1.5),
    ("lose", -1.7),
    ("loses", -1.6),
    ("lost", -1.3),
    ("fail", -2.5),
    ("fails", -2.3),
    ("failure", -2.3),
    ("fall", -1.1),
    ("falls", -1.1),
    ("drop", -1.1),
    ("drops", -1.1),
    ("plunge", -1.9),
    ("plunges", -1.9),
    ("crash", -1.7),
    ("crashes", -1.7),
    ("collapse", -2.2),
    ("decline", -1.5),
    ("slump", -1.8),
    ("weak", -1.9),
    ("worst", -3.1),
    ("bad", -2.5),
    ("crisis", -3.1),
    ("threat", -2.4),
    ("threatens", -2.0),
    ("risk", -1.1),
    ("fear", -2.2),
    ("fears", -1.8),
    ("concern", -1.1),
    ("concerns", -1.0),
    ("scandal", -1.9),
    ("fraud", -2.8),
    ("war", -2.9),
    ("attack", -2.1),
    ("attacks", -1.9),
    ("killed", -3.5),
    ("kills", -3.3),
    ("dead", -3.3),
    ("death", -2.9),
    ("deaths", -2.7),
    ("injured", -1.7),
    ("violence", -3.1),
    ("protest", -1.0),
    ("protests", -0.9),
    ("arrest", -1.4),
    ("arrested", -2.1),
    ("flood", -1.8),
    ("floods", -1.8),
    ("disaster", -3.1),
    ("reject", -1.7),
    ("rejects", -1.7),
    ("oppose", -1.4),
    ("ban", -2.6),
    ("pessimistic", -1.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "nor", "cannot", "can't", "isn't", "aren't", "wasn't",
    "weren't", "don't", "doesn't", "didn't", "won't", "wouldn't", "hardly",
];

/// Valence multiplier for a word preceded by a negation
const NEGATION_SCALAR: f64 = -0.74;
/// How many preceding tokens are checked for a negation
const NEGATION_WINDOW: usize = 3;
/// Approximates the maximum expected valence sum when normalizing to [-1, 1]
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Dictionary-based polarity scorer tuned for news headlines.
///
/// Each token is looked up in a valence table, flipped and damped when one of
/// the three preceding tokens is a negation, and the resulting valences are
/// split into positive, negative and neutral mass the way VADER does.
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    fn valences(&self, text: &str) -> Vec<f64> {
        let tokens: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let Some(&valence) = self.lexicon.get(token.as_str()) else {
                    return 0.0;
                };
                let start = i.saturating_sub(NEGATION_WINDOW);
                let negated = tokens[start..i]
                    .iter()
                    .any(|prev| NEGATIONS.contains(&prev.as_str()));
                if negated {
                    valence * NEGATION_SCALAR
                } else {
                    valence
                }
            })
            .collect()
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Polarity {
        let valences = self.valences(text);
        // no words at all reads as fully neutral
        if valences.is_empty() {
            return Polarity {
                neu: 1.0,
                ..Polarity::default()
            };
        }

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for &v in &valences {
            if v > 0.0 {
                pos_sum += v + 1.0;
            } else if v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neu_count += 1.0;
            }
        }

        let total = pos_sum + neg_sum.abs() + neu_count;
        let sum: f64 = valences.iter().sum();
        let compound = (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);

        Polarity {
            pos: round3(pos_sum / total),
            neu: round3(neu_count / total),
            neg: round3(neg_sum.abs() / total),
            compound: round3(compound),
        }
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
