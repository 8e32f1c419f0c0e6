use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use informed_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "informed")]
#[command(author, version, about = "News aggregator with headline sentiment and trending topics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/informed/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Feed list to use instead of the configured feeds (.json or .opml)
    #[arg(short, long, global = true)]
    feeds: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregated, deduplicated articles, newest first
    News {
        /// all, positive, neutral or negative; anything else means all
        #[arg(short, long, default_value = "all")]
        sentiment: String,
    },
    /// Trending topics across the aggregated headlines
    Topics,
    /// Share of positive, neutral and negative headlines
    Mood,
    /// Configured feed sources
    Feeds {
        /// Fetch every feed once and report its status
        #[arg(long)]
        check: bool,
    },
    /// Market ticker quotes
    Markets,
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let loaded = AppConfig::load_from(&config_path);

    let log_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // stdout carries the JSON envelope, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(log_level),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = loaded.unwrap_or_else(|e| {
        error!("Failed to load {}: {}; using defaults", config_path.display(), e);
        AppConfig::default()
    });

    if let Some(feeds) = cli.feeds {
        config.general.feeds_path = Some(feeds);
    }

    match cli.command {
        Commands::News { sentiment } => commands::news::run(&config, &sentiment, cli.pretty).await,
        Commands::Topics => commands::topics::run(&config, cli.pretty).await,
        Commands::Mood => commands::mood::run(&config, cli.pretty).await,
        Commands::Feeds { check } => commands::feeds::run(&config, check, cli.pretty).await,
        Commands::Markets => commands::markets::run(&config, cli.pretty).await,
        Commands::InitConfig { force } => commands::init::run(&config_path, force),
    }
}
