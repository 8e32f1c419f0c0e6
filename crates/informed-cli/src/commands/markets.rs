use anyhow::Result;

use informed_core::protocol::QuotesResponse;
use informed_core::{fetch_quotes, AppConfig};

use super::emit;

/// No quote provider ships with the binary, so the ticker gets placeholders
pub async fn run(config: &AppConfig, pretty: bool) -> Result<()> {
    let quotes = fetch_quotes(None, &config.markets.tickers).await;
    emit(&QuotesResponse::new(quotes), pretty)
}
