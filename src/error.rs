//! Error categories surfaced by the feed loaders.
//!
//! Most failures travel as opaque [`anyhow::Error`] values. The variants here
//! are the ones callers can recover by downcasting, e.g. to tell a dead
//! network apart from a malformed payload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The remote endpoint could not be reached.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// The remote endpoint answered with something that is not a feed.
    #[error("invalid data received from remote")]
    InvalidData,

    /// No cached image data exists for the requested URL.
    #[error("no cached image data for {0}")]
    ImageNotFound(String),

    /// The cache file was written by an incompatible format revision.
    #[error("unsupported cache format version {0}")]
    UnsupportedCacheVersion(u32),

    /// The orchestrating object was dropped before its operation finished.
    ///
    /// The awaitable loader methods borrow their orchestrator, so they never
    /// yield this. It surfaces only when a task built for a `*_with` call is
    /// awaited on its own after the orchestrator is gone.
    #[error("{0} was released before the operation completed")]
    Released(&'static str),
}
