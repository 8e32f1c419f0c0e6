use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::article::Article;
use crate::config::AppConfig;

/// Words that never make a topic on their own
const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "against", "also", "amid", "among", "been", "before", "being",
    "between", "both", "could", "does", "doing", "down", "during", "each", "even", "every",
    "from", "further", "have", "having", "here", "into", "just", "like", "live", "latest",
    "more", "most", "much", "news", "only", "other", "over", "says", "said", "same", "should",
    "since", "some", "such", "than", "that", "their", "them", "then", "there", "these", "they",
    "this", "those", "through", "till", "under", "until", "updates", "very", "what", "when",
    "where", "which", "while", "will", "with", "would", "year", "years", "your",
    // short words, for configurations that lower the minimum token length
    "and", "are", "but", "for", "has", "her", "his", "its", "new", "not", "now", "off", "out",
    "the", "was", "who", "why", "how", "all", "can", "get", "got", "may", "our", "two",
];

/// Summed sentiment percentages across a topic's articles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicSentiment {
    pub pos: u32,
    pub neu: u32,
    pub neg: u32,
}

/// A frequent title word across the aggregated articles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topic<'a> {
    pub title: String,
    pub count: usize,
    pub sources: usize,
    pub sentiment: TopicSentiment,
    pub sample: Vec<&'a Article>,
}

/// Per-token accumulator, one entry per distinct token in first-seen order
#[derive(Debug, Default)]
struct TokenAggregate {
    articles: Vec<usize>,
    sentiment: TopicSentiment,
}

/// Derives the trending-topics rail from an article list
#[derive(Debug, Clone)]
pub struct TopicExtractor {
    max_topics: usize,
    min_token_len: usize,
    samples: usize,
}

impl TopicExtractor {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            max_topics: config.aggregate.max_topics,
            min_token_len: config.aggregate.min_token_len,
            samples: config.aggregate.topic_samples,
        }
    }

    /// Distinct candidate tokens of the whole title, in order of first appearance
    pub fn tokenize(&self, title: &str) -> Vec<String> {
        let lowered: String = title
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        let mut seen = HashSet::new();
        lowered
            .split_whitespace()
            .filter(|t| t.chars().count() >= self.min_token_len)
            .filter(|t| !STOP_WORDS.contains(t))
            .filter(|t| seen.insert(*t))
            .map(str::to_string)
            .collect()
    }

    /// Top topics by article count; ties keep first-appearance order
    pub fn extract<'a>(&self, articles: &'a [Article]) -> Vec<Topic<'a>> {
        let mut tokens: IndexMap<String, TokenAggregate> = IndexMap::new();

        for (idx, article) in articles.iter().enumerate() {
            for token in self.tokenize(&article.title) {
                let agg = tokens.entry(token).or_default();
                agg.articles.push(idx);
                agg.sentiment.pos += u32::from(article.sentiment.pos_p);
                agg.sentiment.neu += u32::from(article.sentiment.neu_p);
                agg.sentiment.neg += u32::from(article.sentiment.neg_p);
            }
        }

        let mut ranked: Vec<(String, TokenAggregate)> = tokens.into_iter().collect();
        ranked.sort_by(|a, b| b.1.articles.len().cmp(&a.1.articles.len()));
        ranked.truncate(self.max_topics);

        ranked
            .into_iter()
            .map(|(token, agg)| {
                let sources: HashSet<&str> = agg
                    .articles
                    .iter()
                    .map(|&i| articles[i].source.as_str())
                    .collect();

                Topic {
                    title: token.to_uppercase(),
                    count: agg.articles.len(),
                    sources: sources.len(),
                    sentiment: agg.sentiment,
                    sample: agg
                        .articles
                        .iter()
                        .take(self.samples)
                        .map(|&i| &articles[i])
                        .collect(),
                }
            })
            .collect()
    }
}

impl Default for TopicExtractor {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

/// Topic rail with the default limits (16 topics, 3 samples, 4+ char tokens)
pub fn aggregate_topics(articles: &[Article]) -> Vec<Topic<'_>> {
    TopicExtractor::default().extract(articles)
}
