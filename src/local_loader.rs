//! Orchestrates the feed cache: save, load and validate over a [`FeedStore`].

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::loader::{FeedCache, FeedLoader};
use crate::models::FeedImage;
use crate::owner::{self, Owner, Task};
use crate::policy;
use crate::store::{FeedStore, LocalFeedImage};

type CurrentDate = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Serves and persists the feed through a store, applying the cache policy.
///
/// Completions registered with [`save_with`](Self::save_with) or
/// [`load_with`](Self::load_with) are dropped silently if the loader is
/// dropped while the store is still working.
pub struct LocalFeedLoader {
    store: Arc<dyn FeedStore>,
    current_date: CurrentDate,
    owner: Owner,
}

impl LocalFeedLoader {
    pub fn new<F>(store: Arc<dyn FeedStore>, current_date: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            store,
            current_date: Arc::new(current_date),
            owner: Owner::default(),
        }
    }

    /// Replaces the cache with `feed` and reports the outcome to `completion`.
    pub fn save_with<F>(&self, feed: Vec<FeedImage>, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        owner::spawn_with(self.save_task(feed), completion)
    }

    pub fn load_with<F>(&self, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Vec<FeedImage>>) + Send + 'static,
    {
        owner::spawn_with(self.load_task(), completion)
    }

    /// Purges the cache when it is unreadable or expired.
    ///
    /// The handle only tells when the check is over; failures are logged.
    pub fn validate_cache(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let current_date = Arc::clone(&self.current_date);
        let watcher = self.owner.watch();

        tokio::spawn(async move {
            let retrieved = store.retrieve().await;
            if watcher.alive().is_none() {
                return;
            }

            let reason = match retrieved {
                Err(error) => format!("unreadable cache: {:#}", error),
                Ok(Some(cache)) if !policy::is_valid(cache.timestamp, current_date()) => {
                    format!("cache saved at {} has expired", cache.timestamp)
                }
                Ok(_) => return,
            };

            info!("Deleting cached feed: {}", reason);
            if let Err(error) = store.delete_cached_feed().await {
                warn!("Failed to delete cached feed during validation: {:#}", error);
            }
        })
    }

    fn save_task(&self, feed: Vec<FeedImage>) -> Task<Result<()>> {
        let store = Arc::clone(&self.store);
        let current_date = Arc::clone(&self.current_date);
        let watcher = self.owner.watch();

        Box::pin(async move {
            let deleted = store.delete_cached_feed().await;
            watcher.alive()?;
            if let Err(error) = deleted {
                return Some(Err(error));
            }

            let local = feed.iter().map(LocalFeedImage::from).collect();
            let inserted = store.insert(local, current_date()).await;
            watcher.alive()?;
            Some(inserted)
        })
    }

    fn load_task(&self) -> Task<Result<Vec<FeedImage>>> {
        let store = Arc::clone(&self.store);
        let current_date = Arc::clone(&self.current_date);
        let watcher = self.owner.watch();

        Box::pin(async move {
            let retrieved = store.retrieve().await;
            watcher.alive()?;

            Some(match retrieved {
                Err(error) => Err(error),
                Ok(None) => Ok(Vec::new()),
                Ok(Some(cache)) if policy::is_valid(cache.timestamp, current_date()) => {
                    Ok(cache.feed.into_iter().map(FeedImage::from).collect())
                }
                Ok(Some(cache)) => {
                    debug!("Cached feed from {} has expired", cache.timestamp);
                    Ok(Vec::new())
                }
            })
        })
    }
}

#[async_trait]
impl FeedLoader for LocalFeedLoader {
    async fn load(&self) -> Result<Vec<FeedImage>> {
        owner::settle(self.load_task().await, "LocalFeedLoader")
    }
}

#[async_trait]
impl FeedCache for LocalFeedLoader {
    async fn save(&self, feed: &[FeedImage]) -> Result<()> {
        owner::settle(self.save_task(feed.to_vec()).await, "LocalFeedLoader")
    }
}

#[cfg(test)]
#[path = "local_loader_tests.rs"]
mod tests;
