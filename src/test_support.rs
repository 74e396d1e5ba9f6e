//! Doubles and fixtures shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use url::Url;
use uuid::Uuid;

use crate::loader::{FeedCache, FeedLoader};
use crate::models::FeedImage;
use crate::store::{CachedFeed, FeedStore, LocalFeedImage};

pub(crate) fn any_url() -> Url {
    Url::parse("https://any-url.com").unwrap()
}

pub(crate) fn unique_image() -> FeedImage {
    let id = Uuid::new_v4();
    FeedImage::new(
        id,
        Url::parse(&format!("https://images.example.com/{}.jpg", id)).unwrap(),
        Some("a description".to_string()),
        Some("a location".to_string()),
    )
}

pub(crate) fn unique_feed() -> (Vec<FeedImage>, Vec<LocalFeedImage>) {
    let models = vec![unique_image(), unique_image()];
    let locals = models.iter().map(LocalFeedImage::from).collect();
    (models, locals)
}

/// Makes an operation wait until the test lets it finish.
#[derive(Default)]
pub(crate) struct Gate {
    held: AtomicBool,
    notify: Notify,
}

impl Gate {
    pub(crate) fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release_one(&self) {
        self.notify.notify_one();
    }

    async fn pass(&self) {
        if self.held.load(Ordering::SeqCst) {
            self.notify.notified().await;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreMessage {
    DeleteCachedFeed,
    Insert(Vec<LocalFeedImage>, DateTime<Utc>),
    Retrieve,
}

pub(crate) enum RetrievalStub {
    Empty,
    Found(CachedFeed),
    Failure,
}

/// Records every message it receives and answers with stubbed outcomes.
pub(crate) struct FeedStoreSpy {
    messages: Mutex<Vec<StoreMessage>>,
    deletion_fails: AtomicBool,
    insertion_fails: AtomicBool,
    retrieval: Mutex<RetrievalStub>,
    pub(crate) gate: Gate,
}

impl FeedStoreSpy {
    pub(crate) fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            deletion_fails: AtomicBool::new(false),
            insertion_fails: AtomicBool::new(false),
            retrieval: Mutex::new(RetrievalStub::Empty),
            gate: Gate::default(),
        }
    }

    pub(crate) fn messages(&self) -> Vec<StoreMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub(crate) fn fail_deletion(&self) {
        self.deletion_fails.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_insertion(&self) {
        self.insertion_fails.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stub_retrieval(&self, stub: RetrievalStub) {
        *self.retrieval.lock().unwrap() = stub;
    }

    pub(crate) async fn wait_for_messages(&self, count: usize) {
        while self.messages.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }

    fn record(&self, message: StoreMessage) {
        self.messages.lock().unwrap().push(message);
    }
}

#[async_trait]
impl FeedStore for FeedStoreSpy {
    async fn delete_cached_feed(&self) -> Result<()> {
        self.record(StoreMessage::DeleteCachedFeed);
        self.gate.pass().await;
        if self.deletion_fails.load(Ordering::SeqCst) {
            return Err(anyhow!("deletion error"));
        }
        Ok(())
    }

    async fn insert(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<()> {
        self.record(StoreMessage::Insert(feed, timestamp));
        self.gate.pass().await;
        if self.insertion_fails.load(Ordering::SeqCst) {
            return Err(anyhow!("insertion error"));
        }
        Ok(())
    }

    async fn retrieve(&self) -> Result<Option<CachedFeed>> {
        self.record(StoreMessage::Retrieve);
        self.gate.pass().await;
        match &*self.retrieval.lock().unwrap() {
            RetrievalStub::Empty => Ok(None),
            RetrievalStub::Found(cache) => Ok(Some(cache.clone())),
            RetrievalStub::Failure => Err(anyhow!("retrieval error")),
        }
    }
}

/// A [`FeedLoader`] answering with a fixed feed or a fixed error message.
pub(crate) struct FeedLoaderStub {
    result: std::result::Result<Vec<FeedImage>, &'static str>,
    calls: AtomicUsize,
    pub(crate) gate: Gate,
}

impl FeedLoaderStub {
    pub(crate) fn succeeding(feed: Vec<FeedImage>) -> Self {
        Self::with(Ok(feed))
    }

    pub(crate) fn failing(message: &'static str) -> Self {
        Self::with(Err(message))
    }

    fn with(result: std::result::Result<Vec<FeedImage>, &'static str>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            gate: Gate::default(),
        }
    }

    pub(crate) fn load_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn wait_for_calls(&self, count: usize) {
        while self.load_calls() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl FeedLoader for FeedLoaderStub {
    async fn load(&self) -> Result<Vec<FeedImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        match &self.result {
            Ok(feed) => Ok(feed.clone()),
            Err(message) => Err(anyhow!(*message)),
        }
    }
}

/// A [`FeedCache`] that records what it was asked to save.
#[derive(Default)]
pub(crate) struct FeedCacheSpy {
    saved: Mutex<Vec<Vec<FeedImage>>>,
    fails: AtomicBool,
}

impl FeedCacheSpy {
    pub(crate) fn failing() -> Self {
        let spy = Self::default();
        spy.fails.store(true, Ordering::SeqCst);
        spy
    }

    pub(crate) fn saved(&self) -> Vec<Vec<FeedImage>> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedCache for FeedCacheSpy {
    async fn save(&self, feed: &[FeedImage]) -> Result<()> {
        self.saved.lock().unwrap().push(feed.to_vec());
        if self.fails.load(Ordering::SeqCst) {
            return Err(anyhow!("save error"));
        }
        Ok(())
    }
}
