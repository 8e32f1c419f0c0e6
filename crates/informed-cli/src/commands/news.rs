use anyhow::Result;
use tracing::error;

use informed_core::protocol::NewsResponse;
use informed_core::{AppConfig, NewsService, SentimentFilter};

use super::emit;

pub async fn run(config: &AppConfig, sentiment: &str, pretty: bool) -> Result<()> {
    let filter = SentimentFilter::from_query(sentiment);

    let response = match NewsService::from_config(config) {
        Ok(service) => NewsResponse::new(service.fetch_articles(filter).await),
        Err(e) => {
            error!("News query failed: {}", e);
            NewsResponse::empty()
        }
    };

    emit(&response, pretty)
}
