//! Offline copies of feed image bytes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use url::Url;
use uuid::Uuid;

use crate::error::FeedError;
use crate::loader::FeedImageDataLoader;

/// Persists image bytes keyed by their source URL.
#[async_trait]
pub trait FeedImageDataStore: Send + Sync {
    async fn insert(&self, url: &Url, data: &[u8]) -> Result<()>;

    /// `Ok(None)` when nothing was stored for `url`.
    async fn retrieve(&self, url: &Url) -> Result<Option<Vec<u8>>>;
}

/// One file per image inside a directory.
pub struct FileImageDataStore {
    dir: PathBuf,
}

impl FileImageDataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, url: &Url) -> PathBuf {
        let key = Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_str().as_bytes());
        self.dir.join(format!("{}.img", key))
    }
}

#[async_trait]
impl FeedImageDataStore for FileImageDataStore {
    async fn insert(&self, url: &Url, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create image directory {}", self.dir.display()))?;

        let path = self.file_for(url);
        let staging = path.with_extension("img.tmp");
        fs::write(&staging, data)
            .await
            .with_context(|| format!("Failed to write image data for {}", url))?;
        fs::rename(&staging, &path)
            .await
            .with_context(|| format!("Failed to store image data for {}", url))?;

        Ok(())
    }

    async fn retrieve(&self, url: &Url) -> Result<Option<Vec<u8>>> {
        match fs::read(self.file_for(url)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read image data for {}", url)),
        }
    }
}

/// Serves image bytes from a [`FeedImageDataStore`].
pub struct LocalFeedImageDataLoader {
    store: Arc<dyn FeedImageDataStore>,
}

impl LocalFeedImageDataLoader {
    pub fn new(store: Arc<dyn FeedImageDataStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, url: &Url, data: &[u8]) -> Result<()> {
        self.store.insert(url, data).await
    }
}

#[async_trait]
impl FeedImageDataLoader for LocalFeedImageDataLoader {
    async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>> {
        self.store
            .retrieve(url)
            .await?
            .ok_or_else(|| FeedError::ImageNotFound(url.to_string()).into())
    }
}
