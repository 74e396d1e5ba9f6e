use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use navifeed::config::Config;
use navifeed::fetcher::{RemoteFeedLoader, ReqwestHttpClient};
use navifeed::{
    FeedImage, FeedLoader, FeedLoaderWithFallback, FileFeedStore, LocalFeedLoader,
    SaveThroughFeedLoader,
};

#[derive(Parser)]
#[command(name = "navifeed")]
#[command(about = "Photo feed client with an offline cache", long_about = None)]
struct Cli {
    /// Directory holding the feed cache
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed, falling back to the cache when offline
    Fetch {
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Print the cached feed
    Show,
    /// Drop the cache if it is expired or unreadable
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("navifeed=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let store = Arc::new(FileFeedStore::new(config.store_path()));
    let local = Arc::new(LocalFeedLoader::new(store, Utc::now));

    match cli.command {
        Commands::Fetch { url } => {
            if let Some(url) = &url {
                config = config.with_feed_url(url);
            }
            let url = config.feed_url()?;

            let client = Arc::new(ReqwestHttpClient::new(config.request_timeout)?);
            let remote = Arc::new(RemoteFeedLoader::new(url, client));
            let save_through = Arc::new(SaveThroughFeedLoader::new(remote, local.clone()));
            let loader = FeedLoaderWithFallback::new(save_through.clone(), local.clone());

            let loaded = loader.load().await;
            save_through.wait_for_pending_writes().await;

            let feed = loaded.context("Failed to fetch feed and no cached feed is readable")?;
            print_feed(&feed);
        }
        Commands::Show => {
            let feed = local.load().await?;
            print_feed(&feed);
        }
        Commands::Validate => {
            local.validate_cache().await?;
            println!("Cache at {} validated", config.store_path().display());
        }
    }

    Ok(())
}

fn print_feed(feed: &[FeedImage]) {
    if feed.is_empty() {
        println!("No images available");
        return;
    }

    println!("{} images:", feed.len());
    for image in feed {
        println!("  - {} {}", image.id, image.url);
        if let Some(description) = &image.description {
            println!("      {}", description);
        }
        if let Some(location) = &image.location {
            println!("      📍 {}", location);
        }
    }
}
