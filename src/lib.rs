//! Offline-first cache for a photo feed.
//!
//! A [`LocalFeedLoader`] saves, loads and validates the feed through a
//! [`FeedStore`]; [`FeedLoaderWithFallback`] and [`SaveThroughFeedLoader`]
//! compose it with a remote source so the last good feed is served when the
//! network is gone.

pub mod cache;
pub mod composite;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod image_cache;
pub mod loader;
pub mod local_loader;
pub mod models;
mod owner;
pub mod policy;
pub mod store;

#[cfg(test)]
mod test_support;

pub use cache::FileFeedStore;
pub use composite::{FeedLoaderWithFallback, SaveThroughFeedLoader};
pub use error::FeedError;
pub use loader::{FeedCache, FeedImageDataLoader, FeedLoader};
pub use local_loader::LocalFeedLoader;
pub use models::FeedImage;
pub use store::{CachedFeed, FeedStore, LocalFeedImage};
