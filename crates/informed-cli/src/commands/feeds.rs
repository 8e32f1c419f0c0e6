use anyhow::Result;
use tracing::error;

use informed_core::protocol::{FeedListResponse, FeedStatus};
use informed_core::{AppConfig, NewsService};

use super::emit;

pub async fn run(config: &AppConfig, check: bool, pretty: bool) -> Result<()> {
    let response = if check {
        match NewsService::from_config(config) {
            Ok(service) => {
                let outcomes = service.check_feeds().await;
                FeedListResponse::new(outcomes.into_iter().map(FeedStatus::from).collect())
            }
            Err(e) => {
                error!("Feed check failed: {}", e);
                FeedListResponse::empty()
            }
        }
    } else {
        match config.feed_sources() {
            Ok(sources) => {
                FeedListResponse::new(sources.into_iter().map(FeedStatus::unchecked).collect())
            }
            Err(e) => {
                error!("Failed to load feed list: {}", e);
                FeedListResponse::empty()
            }
        }
    };

    emit(&response, pretty)
}
