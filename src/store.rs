//! Storage contract for the cached feed.
//!
//! A store knows nothing about freshness; it only deletes, inserts and
//! retrieves one [`CachedFeed`] as a whole.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::models::FeedImage;

/// Persisted form of a [`FeedImage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFeedImage {
    pub id: Uuid,
    #[serde(rename = "imageURL")]
    pub image_url: Url,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl From<&FeedImage> for LocalFeedImage {
    fn from(image: &FeedImage) -> Self {
        Self {
            id: image.id,
            image_url: image.url.clone(),
            description: image.description.clone(),
            location: image.location.clone(),
        }
    }
}

impl From<LocalFeedImage> for FeedImage {
    fn from(local: LocalFeedImage) -> Self {
        Self {
            id: local.id,
            url: local.image_url,
            description: local.description,
            location: local.location,
        }
    }
}

/// The unit a store persists: every item plus the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
    pub feed: Vec<LocalFeedImage>,
    pub timestamp: DateTime<Utc>,
}

/// Persistence primitives for a single cached feed.
///
/// `retrieve` yields `Ok(None)` when nothing is cached. Unreadable data is an
/// error, never `None`.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Removes the cached feed. Succeeds when there is nothing to remove.
    async fn delete_cached_feed(&self) -> Result<()>;

    /// Replaces whatever is stored with `feed` stamped at `timestamp`.
    async fn insert(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<()>;

    async fn retrieve(&self) -> Result<Option<CachedFeed>>;
}
