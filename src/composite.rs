//! Loader compositions used to serve the feed while offline.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::loader::{FeedCache, FeedLoader};
use crate::models::FeedImage;
use crate::owner::{self, Owner, Task};

/// Tries `primary` and only falls back once it has failed.
///
/// The fallback's outcome replaces the primary error entirely.
pub struct FeedLoaderWithFallback {
    primary: Arc<dyn FeedLoader>,
    fallback: Arc<dyn FeedLoader>,
    owner: Owner,
}

impl FeedLoaderWithFallback {
    pub fn new(primary: Arc<dyn FeedLoader>, fallback: Arc<dyn FeedLoader>) -> Self {
        Self {
            primary,
            fallback,
            owner: Owner::default(),
        }
    }

    pub fn load_with<F>(&self, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Vec<FeedImage>>) + Send + 'static,
    {
        owner::spawn_with(self.load_task(), completion)
    }

    fn load_task(&self) -> Task<Result<Vec<FeedImage>>> {
        let primary = Arc::clone(&self.primary);
        let fallback = Arc::clone(&self.fallback);
        let watcher = self.owner.watch();

        Box::pin(async move {
            let loaded = primary.load().await;
            watcher.alive()?;

            match loaded {
                Ok(feed) => Some(Ok(feed)),
                Err(error) => {
                    info!("Primary feed loader failed, using fallback: {:#}", error);
                    let loaded = fallback.load().await;
                    watcher.alive()?;
                    Some(loaded)
                }
            }
        })
    }
}

#[async_trait]
impl FeedLoader for FeedLoaderWithFallback {
    async fn load(&self) -> Result<Vec<FeedImage>> {
        owner::settle(self.load_task().await, "FeedLoaderWithFallback")
    }
}

/// Mirrors every successfully loaded feed into a cache.
///
/// The mirrored write runs on its own task and its outcome never reaches the
/// caller. [`wait_for_pending_writes`](Self::wait_for_pending_writes) lets a
/// short-lived process flush them before exiting.
pub struct SaveThroughFeedLoader {
    loader: Arc<dyn FeedLoader>,
    cache: Arc<dyn FeedCache>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
    owner: Owner,
}

impl SaveThroughFeedLoader {
    pub fn new(loader: Arc<dyn FeedLoader>, cache: Arc<dyn FeedCache>) -> Self {
        Self {
            loader,
            cache,
            pending: Arc::new(Mutex::new(Vec::new())),
            owner: Owner::default(),
        }
    }

    pub fn load_with<F>(&self, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Vec<FeedImage>>) + Send + 'static,
    {
        owner::spawn_with(self.load_task(), completion)
    }

    /// Waits until every mirrored write started so far has finished.
    pub async fn wait_for_pending_writes(&self) {
        let pending = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for write in pending {
            let _ = write.await;
        }
    }

    fn load_task(&self) -> Task<Result<Vec<FeedImage>>> {
        let loader = Arc::clone(&self.loader);
        let cache = Arc::clone(&self.cache);
        let pending = Arc::clone(&self.pending);
        let watcher = self.owner.watch();

        Box::pin(async move {
            let loaded = loader.load().await;
            watcher.alive()?;

            if let Ok(feed) = &loaded {
                let write = save_ignoring_outcome(cache, feed.clone());
                if let Ok(mut pending) = pending.lock() {
                    pending.retain(|write| !write.is_finished());
                    pending.push(write);
                }
            }
            Some(loaded)
        })
    }
}

fn save_ignoring_outcome(cache: Arc<dyn FeedCache>, feed: Vec<FeedImage>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(error) = cache.save(&feed).await {
            debug!("Ignoring failed cache write: {:#}", error);
        }
    })
}

#[async_trait]
impl FeedLoader for SaveThroughFeedLoader {
    async fn load(&self) -> Result<Vec<FeedImage>> {
        owner::settle(self.load_task().await, "SaveThroughFeedLoader")
    }
}
