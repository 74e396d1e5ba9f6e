use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::error::FeedError;
use crate::loader::{FeedImageDataLoader, FeedLoader};
use crate::models::{FeedImage, HttpResponse};

const OK_200: u16 = 200;

/// Minimal GET transport the remote loaders are written against.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by a shared `reqwest` client.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("NaviFeed/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[derive(Deserialize)]
struct RemoteFeed {
    items: Vec<RemoteFeedImage>,
}

#[derive(Deserialize)]
struct RemoteFeedImage {
    id: Uuid,
    image: Url,
    description: Option<String>,
    location: Option<String>,
}

/// Maps a feed endpoint response onto the feed model
/// Anything but a 200 carrying the expected JSON is invalid data
fn map_feed(response: &HttpResponse) -> Result<Vec<FeedImage>> {
    if response.status != OK_200 {
        return Err(FeedError::InvalidData.into());
    }

    let feed: RemoteFeed =
        serde_json::from_slice(&response.body).map_err(|_| FeedError::InvalidData)?;

    Ok(feed
        .items
        .into_iter()
        .map(|item| FeedImage::new(item.id, item.image, item.description, item.location))
        .collect())
}

/// Fetches the feed from its remote endpoint.
pub struct RemoteFeedLoader {
    url: Url,
    client: Arc<dyn HttpClient>,
}

impl RemoteFeedLoader {
    pub fn new(url: Url, client: Arc<dyn HttpClient>) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl FeedLoader for RemoteFeedLoader {
    async fn load(&self) -> Result<Vec<FeedImage>> {
        let response = self
            .client
            .get(&self.url)
            .await
            .map_err(|e| FeedError::Connectivity(format!("{:#}", e)))?;

        map_feed(&response)
    }
}

/// Downloads image bytes; empty or non-200 responses are rejected.
pub struct RemoteFeedImageDataLoader {
    client: Arc<dyn HttpClient>,
}

impl RemoteFeedImageDataLoader {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedImageDataLoader for RemoteFeedImageDataLoader {
    async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| FeedError::Connectivity(format!("{:#}", e)))?;

        if response.status != OK_200 || response.body.is_empty() {
            return Err(FeedError::InvalidData.into());
        }
        Ok(response.body)
    }
}
