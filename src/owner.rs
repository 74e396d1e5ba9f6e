//! Liveness tracking for in-flight operations.
//!
//! Orchestrators hold an [`Owner`]; the tasks they spawn only keep a
//! [`Watcher`]. Once the orchestrator is dropped every pending continuation
//! resolves to `None` instead of reaching its completion.

use std::sync::{Arc, Weak};

use anyhow::Result;
use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::error::FeedError;

/// An operation that yields `None` when its owner vanished mid-flight.
pub(crate) type Task<T> = BoxFuture<'static, Option<T>>;

#[derive(Debug, Default)]
pub(crate) struct Owner(Arc<()>);

impl Owner {
    pub(crate) fn watch(&self) -> Watcher {
        Watcher(Arc::downgrade(&self.0))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Watcher(Weak<()>);

impl Watcher {
    /// `Some(())` while the owner exists, so continuations can bail with `?`.
    pub(crate) fn alive(&self) -> Option<()> {
        (self.0.strong_count() > 0).then_some(())
    }
}

/// Runs `task` on the runtime and hands its outcome to `completion`, unless
/// the task was silenced.
pub(crate) fn spawn_with<T, F>(task: Task<T>, completion: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce(T) + Send + 'static,
{
    tokio::spawn(async move {
        if let Some(outcome) = task.await {
            completion(outcome);
        }
    })
}

/// Flattens a task outcome for callers that awaited it directly.
///
/// A borrowed orchestrator outlives its own task, so `None` is only seen when
/// the task is driven after its owner was dropped.
pub(crate) fn settle<T>(outcome: Option<Result<T>>, owner: &'static str) -> Result<T> {
    match outcome {
        Some(result) => result,
        None => Err(FeedError::Released(owner).into()),
    }
}
