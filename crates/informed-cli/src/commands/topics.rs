use anyhow::Result;
use tracing::error;

use informed_core::protocol::TopicsResponse;
use informed_core::{AppConfig, NewsService, SentimentFilter};

use super::emit;

pub async fn run(config: &AppConfig, pretty: bool) -> Result<()> {
    let service = match NewsService::from_config(config) {
        Ok(service) => service,
        Err(e) => {
            error!("Topics query failed: {}", e);
            return emit(&TopicsResponse::empty(), pretty);
        }
    };

    let articles = service.fetch_articles(SentimentFilter::All).await;
    emit(&TopicsResponse::new(service.aggregate_topics(&articles)), pretty)
}
