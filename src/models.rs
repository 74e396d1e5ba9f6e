use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A single image entry of the photo feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedImage {
    pub id: Uuid,
    pub url: Url,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl FeedImage {
    pub fn new(
        id: Uuid,
        url: Url,
        description: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            id,
            url,
            description,
            location,
        }
    }
}

/// Raw response handed back by an [`HttpClient`](crate::fetcher::HttpClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}
