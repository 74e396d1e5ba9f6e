//! Capabilities shared by the remote and local sides of the feed.

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::models::FeedImage;

/// Produces an ordered feed, from wherever it lives.
#[async_trait]
pub trait FeedLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<FeedImage>>;
}

/// Accepts a feed for later offline use.
#[async_trait]
pub trait FeedCache: Send + Sync {
    async fn save(&self, feed: &[FeedImage]) -> Result<()>;
}

/// Produces the raw bytes behind a feed image URL.
///
/// Dropping the returned future abandons the request.
#[async_trait]
pub trait FeedImageDataLoader: Send + Sync {
    async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>>;
}
