use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use informed_core::feed::{ParsedFeed, RawFeedItem};
use informed_core::sentiment::Polarity;
use informed_core::{
    aggregate_topics, AppConfig, Category, Error, FeedClient, FeedSource, NewsService, Result,
    SentimentFilter, SentimentLabel, SentimentScorer,
};

/// What a fake origin does when asked for its feed
#[derive(Clone)]
enum Behaviour {
    Items(Vec<RawFeedItem>),
    Fail,
    Hang,
}

struct FakeFeeds {
    feeds: HashMap<String, Behaviour>,
}

impl FakeFeeds {
    fn new(feeds: Vec<(&str, Behaviour)>) -> Arc<Self> {
        Arc::new(Self {
            feeds: feeds
                .into_iter()
                .map(|(url, behaviour)| (url.to_string(), behaviour))
                .collect(),
        })
    }
}

#[async_trait]
impl FeedClient for FakeFeeds {
    async fn fetch_feed(&self, source: &FeedSource) -> Result<ParsedFeed> {
        match self.feeds.get(&source.url) {
            Some(Behaviour::Items(items)) => Ok(ParsedFeed {
                title: Some("Fake Feed".to_string()),
                items: items.clone(),
            }),
            Some(Behaviour::Fail) | None => Err(Error::FeedParse("not a feed".to_string())),
            Some(Behaviour::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::Other("unreachable".to_string()))
            }
        }
    }
}

/// "good" in a title is positive, "bad" negative, anything else neutral
struct KeywordScorer;

impl SentimentScorer for KeywordScorer {
    fn polarity(&self, text: &str) -> Polarity {
        let lowered = text.to_lowercase();
        if lowered.contains("good") {
            Polarity { pos: 0.6, neu: 0.4, neg: 0.0, compound: 0.6 }
        } else if lowered.contains("bad") {
            Polarity { pos: 0.0, neu: 0.4, neg: 0.6, compound: -0.6 }
        } else {
            Polarity { pos: 0.0, neu: 1.0, neg: 0.0, compound: 0.0 }
        }
    }
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
}

fn item(title: &str, link: &str, published: DateTime<Utc>) -> RawFeedItem {
    RawFeedItem {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        published: Some(published),
        ..Default::default()
    }
}

fn service(client: Arc<FakeFeeds>, urls: &[&str]) -> NewsService {
    let sources = urls.iter().map(|u| FeedSource::new(*u)).collect();
    NewsService::new(client, Arc::new(KeywordScorer), sources, &AppConfig::default())
}

fn five_feeds() -> (Arc<FakeFeeds>, Vec<&'static str>) {
    let urls = vec![
        "https://one.example/rss",
        "https://two.example/rss",
        "https://broken.example/rss",
        "https://three.example/rss",
        "https://slow.example/rss",
    ];
    let client = FakeFeeds::new(vec![
        (
            urls[0],
            Behaviour::Items(vec![
                item("Good monsoon lifts farm outlook", "https://one.example/a", at(9, 0)),
                item("Bad traffic after monsoon rain", "https://one.example/b", at(8, 0)),
            ]),
        ),
        (
            urls[1],
            Behaviour::Items(vec![item(
                "Cricket final set for Sunday",
                "https://two.example/a",
                at(10, 0),
            )]),
        ),
        (urls[2], Behaviour::Fail),
        (
            urls[3],
            Behaviour::Items(vec![item(
                "Monsoon session of parliament opens",
                "https://three.example/a",
                at(7, 0),
            )]),
        ),
        (urls[4], Behaviour::Hang),
    ]);
    (client, urls)
}

#[tokio::test(start_paused = true)]
async fn failing_and_hanging_feeds_are_isolated() {
    let (client, urls) = five_feeds();
    let news = service(client, &urls);

    let articles = news.fetch_articles(SentimentFilter::All).await;
    let links: Vec<&str> = articles.iter().map(|a| a.link.as_str()).collect();
    assert_eq!(
        links,
        vec![
            "https://two.example/a",
            "https://one.example/a",
            "https://one.example/b",
            "https://three.example/a",
        ]
    );
    assert_eq!(articles[0].source, "two.example");
}

#[tokio::test(start_paused = true)]
async fn check_feeds_reports_each_source() {
    let (client, urls) = five_feeds();
    let news = service(client, &urls);

    let outcomes = news.check_feeds().await;
    assert_eq!(outcomes.len(), 5);
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.is_failure())
        .map(|o| o.source().url.as_str())
        .collect();
    assert_eq!(failed, vec!["https://broken.example/rss", "https://slow.example/rss"]);
}

#[tokio::test(start_paused = true)]
async fn filter_returns_only_matching_labels() {
    let (client, urls) = five_feeds();
    let news = service(client, &urls);

    let positive = news
        .fetch_articles(SentimentFilter::Only(SentimentLabel::Positive))
        .await;
    assert_eq!(positive.len(), 1);
    assert!(positive.iter().all(|a| a.label() == SentimentLabel::Positive));

    let negative = news.fetch_articles(SentimentFilter::from_query("negative")).await;
    assert_eq!(negative.len(), 1);
    assert_eq!(negative[0].link, "https://one.example/b");

    let fallback = news.fetch_articles(SentimentFilter::from_query("sideways")).await;
    assert_eq!(fallback.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn repeated_runs_are_identical() {
    let (client, urls) = five_feeds();
    let news = service(client, &urls);

    let first = news.fetch_articles(SentimentFilter::All).await;
    let second = news.fetch_articles(SentimentFilter::All).await;
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn query_variants_collapse_to_first_seen() {
    let client = FakeFeeds::new(vec![
        (
            "https://a.example/rss",
            Behaviour::Items(vec![item("Story", "http://a.example/x?utm=1", at(6, 0))]),
        ),
        (
            "https://b.example/rss",
            Behaviour::Items(vec![item("Story again", "http://a.example/x?utm=2", at(12, 0))]),
        ),
    ]);
    let news = service(client, &["https://a.example/rss", "https://b.example/rss"]);

    let articles = news.fetch_articles(SentimentFilter::All).await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].link, "http://a.example/x?utm=1");
}

#[tokio::test(start_paused = true)]
async fn caps_total_across_many_feeds() {
    let feed = |host: &'static str| {
        let items = (0..40)
            .map(|i| {
                item(
                    &format!("Headline {} from {}", i, host),
                    &format!("https://{}/{}", host, i),
                    at(i / 60, i % 60),
                )
            })
            .collect();
        Behaviour::Items(items)
    };
    let hosts = [
        "a.example", "b.example", "c.example", "d.example", "e.example", "f.example",
    ];
    let urls: Vec<String> = hosts.iter().map(|h| format!("https://{}/rss", h)).collect();
    let client = FakeFeeds::new(
        urls.iter()
            .zip(hosts.iter())
            .map(|(url, host)| (url.as_str(), feed(*host)))
            .collect(),
    );
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let news = service(client, &url_refs);

    let articles = news.fetch_articles(SentimentFilter::All).await;
    assert_eq!(articles.len(), 80);

    let mut per_source: HashMap<&str, usize> = HashMap::new();
    for article in &articles {
        *per_source.entry(article.source.as_str()).or_default() += 1;
    }
    assert!(per_source.values().all(|&n| n <= 15));

    let keys: HashSet<&str> = articles.iter().map(|a| a.dedup_key()).collect();
    assert_eq!(keys.len(), articles.len());
    assert!(articles
        .windows(2)
        .all(|w| w[0].published_at >= w[1].published_at));

    let topics = aggregate_topics(&articles);
    assert!(topics.len() <= 16);
    assert!(topics.iter().all(|t| t.count >= 1 && t.count <= articles.len()));
}

#[tokio::test(start_paused = true)]
async fn topics_follow_article_titles() {
    let (client, urls) = five_feeds();
    let news = service(client, &urls);

    let articles = news.fetch_articles(SentimentFilter::All).await;
    let topics = news.aggregate_topics(&articles);

    assert_eq!(topics[0].title, "MONSOON");
    assert_eq!(topics[0].count, 3);
    assert_eq!(topics[0].sources, 2);
    assert_eq!(topics[0].sample.len(), 3);

    let mood = news.mood(&articles);
    assert_eq!(mood.total, 4);
    assert_eq!((mood.positive, mood.neutral, mood.negative), (25, 50, 25));
}

#[tokio::test]
async fn empty_feed_list_yields_nothing() {
    let news = service(FakeFeeds::new(Vec::new()), &[]);
    let articles = news.fetch_articles(SentimentFilter::All).await;
    assert!(articles.is_empty());
    assert!(aggregate_topics(&articles).is_empty());
}

#[tokio::test(start_paused = true)]
async fn titles_drive_categories() {
    let client = FakeFeeds::new(vec![(
        "https://a.example/rss",
        Behaviour::Items(vec![
            item("Markets surge as IPO sees record profit", "https://a.example/1", at(5, 0)),
            item("", "https://a.example/2", at(5, 1)),
        ]),
    )]);
    let news = service(client, &["https://a.example/rss"]);

    let articles = news.fetch_articles(SentimentFilter::All).await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].category, Category::Business);
}

fn numbered_feed(host: &str, count: u32, published: impl Fn(u32) -> DateTime<Utc>) -> Behaviour {
    let items = (0..count)
        .map(|i| {
            item(
                &format!("Bulletin number {}", i),
                &format!("https://{}/{}", host, i),
                published(i),
            )
        })
        .collect();
    Behaviour::Items(items)
}

#[tokio::test(start_paused = true)]
async fn long_feed_contributes_exactly_fifteen() {
    let client = FakeFeeds::new(vec![(
        "https://long.example/rss",
        numbered_feed("long.example", 25, |i| at(1, i)),
    )]);
    let news = service(client, &["https://long.example/rss"]);

    let articles = news.fetch_articles(SentimentFilter::All).await;
    assert_eq!(articles.len(), 15);
}

#[tokio::test(start_paused = true)]
async fn items_past_the_feed_limit_are_ignored_even_when_newest() {
    // positions 15.. carry the latest timestamps
    let client = FakeFeeds::new(vec![(
        "https://long.example/rss",
        numbered_feed("long.example", 20, |i| if i < 15 { at(1, i) } else { at(23, i) }),
    )]);
    let news = service(client, &["https://long.example/rss"]);

    let articles = news.fetch_articles(SentimentFilter::All).await;
    assert_eq!(articles.len(), 15);
    let kept: HashSet<&str> = articles.iter().map(|a| a.link.as_str()).collect();
    for i in 15..20 {
        let link = format!("https://long.example/{}", i);
        assert!(!kept.contains(link.as_str()), "{} is past the feed limit", link);
    }
    assert_eq!(articles[0].link, "https://long.example/14");
}
