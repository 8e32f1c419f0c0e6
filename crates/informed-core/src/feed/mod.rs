mod fetcher;
mod models;
mod opml;
mod parser;

pub use fetcher::{FeedClient, FeedFetcher};
pub use models::{FeedSource, ParsedFeed, RawFeedItem};
pub use opml::parse_opml;
pub use parser::parse_feed;
