use anyhow::Result;
use tracing::{error, info};

use informed_core::protocol::MoodResponse;
use informed_core::{AppConfig, NewsService, SentimentFilter};

use super::emit;

pub async fn run(config: &AppConfig, pretty: bool) -> Result<()> {
    let response = match NewsService::from_config(config) {
        Ok(service) => {
            let articles = service.fetch_articles(SentimentFilter::All).await;
            let mood = service.mood(&articles);
            info!("Nation's mood: {} across {} articles", mood.dominant(), mood.total);
            MoodResponse::new(mood)
        }
        Err(e) => {
            error!("Mood query failed: {}", e);
            MoodResponse::empty()
        }
    };

    emit(&response, pretty)
}
