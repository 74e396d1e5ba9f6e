use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::FeedError;
use crate::store::{CachedFeed, FeedStore, LocalFeedImage};

/// Format revision written into every cache file.
pub const CACHE_FORMAT_VERSION: u32 = 1;

fn unversioned() -> u32 {
    1
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    #[serde(default = "unversioned")]
    version: u32,
    items: Vec<LocalFeedImage>,
    timestamp: DateTime<Utc>,
}

/// JSON file backed feed store
///
/// Retrievals may run side by side; deletions and insertions wait for every
/// operation issued before them and hold off everything issued after.
pub struct FileFeedStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileFeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unique per write so instances sharing a path never share a staging file.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", Uuid::new_v4()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FeedStore for FileFeedStore {
    async fn delete_cached_feed(&self) -> Result<()> {
        let _barrier = self.lock.write().await;

        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to delete feed cache {}", self.path.display())),
        }
    }

    async fn insert(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<()> {
        let _barrier = self.lock.write().await;

        let cache = CacheFile {
            version: CACHE_FORMAT_VERSION,
            items: feed,
            timestamp,
        };
        let encoded = serde_json::to_vec(&cache).context("Failed to encode feed cache")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create cache directory {}", parent.display())
            })?;
        }

        // Write aside and rename so readers never observe a partial file.
        let staging = self.staging_path();
        let written = match fs::write(&staging, encoded).await {
            Ok(()) => fs::rename(&staging, &self.path)
                .await
                .with_context(|| format!("Failed to replace feed cache {}", self.path.display())),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to write feed cache {}", staging.display()))
            }
        };
        if written.is_err() {
            let _ = fs::remove_file(&staging).await;
        }

        written
    }

    async fn retrieve(&self) -> Result<Option<CachedFeed>> {
        let _shared = self.lock.read().await;

        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read feed cache {}", self.path.display()))
            }
        };

        let cache: CacheFile = serde_json::from_slice(&data)
            .with_context(|| format!("Invalid feed cache in {}", self.path.display()))?;
        if cache.version != CACHE_FORMAT_VERSION {
            return Err(FeedError::UnsupportedCacheVersion(cache.version).into());
        }

        Ok(Some(CachedFeed {
            feed: cache.items,
            timestamp: cache.timestamp,
        }))
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
