use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::sentiment::{Sentiment, SentimentLabel};

/// Fixed dashboard taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Sports,
    Tech,
    Politics,
    World,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Sports => "sports",
            Self::Tech => "tech",
            Self::Politics => "politics",
            Self::World => "world",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => Ok(Self::Business),
            "sports" | "sport" => Ok(Self::Sports),
            "tech" | "technology" => Ok(Self::Tech),
            "politics" => Ok(Self::Politics),
            "world" => Ok(Self::World),
            "general" => Ok(Self::General),
            other => Err(crate::Error::Other(format!("Unknown category: {}", other))),
        }
    }
}

/// One normalized news item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub link: String,
    pub image: String,
    #[serde(with = "iso8601")]
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub category: Category,
    pub sentiment: Sentiment,
}

impl Article {
    /// Link with its query string removed; two articles with the same key are duplicates
    pub fn dedup_key(&self) -> &str {
        strip_query(&self.link)
    }

    pub fn label(&self) -> SentimentLabel {
        self.sentiment.label
    }

    /// `publishedAt` exactly as serialized
    pub fn published_iso(&self) -> String {
        to_iso(&self.published_at)
    }
}

pub fn strip_query(link: &str) -> &str {
    link.split_once('?').map_or(link, |(base, _)| base)
}

/// Millisecond-precision UTC timestamp with a `Z` suffix, e.g. `2024-01-02T10:00:00.000Z`
pub fn to_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_iso(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
