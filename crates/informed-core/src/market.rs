//! Market-quote ticker boundary
//!
//! Quotes come from a third-party provider behind [`QuoteProvider`]. This
//! module only maps provider rows onto display quotes and supplies the
//! null-safe fallbacks the ticker relies on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;

/// One configured ticker symbol with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub pretty: String,
}

impl Ticker {
    pub fn new(symbol: impl Into<String>, pretty: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            pretty: pretty.into(),
        }
    }
}

/// Row as returned by a quote provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    pub symbol: String,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub regular_market_change: Option<f64>,
    #[serde(default)]
    pub regular_market_change_percent: Option<f64>,
}

/// Ticker entry; numbers are null when the provider had nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub pretty: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

impl Quote {
    fn placeholder(ticker: &Ticker) -> Self {
        Self {
            symbol: ticker.symbol.clone(),
            pretty: ticker.pretty.clone(),
            price: None,
            change: None,
            change_percent: None,
        }
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote(&self, symbols: &[String]) -> Result<Vec<RawQuote>>;
}

/// Quotes for `tickers`.
///
/// Without a provider every ticker comes back as a placeholder with null
/// numbers; a provider error yields an empty list. Rows are matched to
/// tickers by symbol, and unknown symbols keep the symbol as display name.
pub async fn fetch_quotes(provider: Option<&dyn QuoteProvider>, tickers: &[Ticker]) -> Vec<Quote> {
    let Some(provider) = provider else {
        return tickers.iter().map(Quote::placeholder).collect();
    };

    let symbols: Vec<String> = tickers.iter().map(|t| t.symbol.clone()).collect();
    match provider.quote(&symbols).await {
        Ok(rows) => rows
            .into_iter()
            .map(|row| {
                let pretty = tickers
                    .iter()
                    .find(|t| t.symbol == row.symbol)
                    .map(|t| t.pretty.clone())
                    .unwrap_or_else(|| row.symbol.clone());
                Quote {
                    symbol: row.symbol,
                    pretty,
                    price: row.regular_market_price,
                    change: row.regular_market_change,
                    change_percent: row.regular_market_change_percent,
                }
            })
            .collect(),
        Err(e) => {
            warn!("Quote provider failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct StaticProvider(Vec<RawQuote>);

    #[async_trait]
    impl QuoteProvider for StaticProvider {
        async fn quote(&self, _symbols: &[String]) -> Result<Vec<RawQuote>> {
            Ok(self.0.clone())
        }
    }

    struct DownProvider;

    #[async_trait]
    impl QuoteProvider for DownProvider {
        async fn quote(&self, _symbols: &[String]) -> Result<Vec<RawQuote>> {
            Err(Error::QuoteProvider("rate limited".to_string()))
        }
    }

    fn tickers() -> Vec<Ticker> {
        vec![Ticker::new("^BSESN", "BSE Sensex"), Ticker::new("GC=F", "Gold")]
    }

    #[tokio::test]
    async fn test_placeholders_without_provider() {
        let quotes = fetch_quotes(None, &tickers()).await;
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].pretty, "BSE Sensex");
        assert!(quotes.iter().all(|q| q.price.is_none() && q.change_percent.is_none()));

        let json = serde_json::to_value(&quotes[1]).unwrap();
        assert!(json["changePercent"].is_null());
    }

    #[tokio::test]
    async fn test_rows_matched_by_symbol() {
        let provider = StaticProvider(vec![
            RawQuote {
                symbol: "GC=F".to_string(),
                regular_market_price: Some(2034.5),
                regular_market_change: Some(-3.1),
                regular_market_change_percent: Some(-0.15),
            },
            RawQuote {
                symbol: "^NSEI".to_string(),
                ..Default::default()
            },
        ]);

        let quotes = fetch_quotes(Some(&provider), &tickers()).await;
        assert_eq!(quotes[0].pretty, "Gold");
        assert_eq!(quotes[0].price, Some(2034.5));
        assert_eq!(quotes[1].pretty, "^NSEI");
        assert_eq!(quotes[1].price, None);
    }

    #[tokio::test]
    async fn test_provider_error_is_empty() {
        assert!(fetch_quotes(Some(&DownProvider), &tickers()).await.is_empty());
    }
}
