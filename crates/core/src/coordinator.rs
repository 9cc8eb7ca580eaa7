//! Per-key request coalescing.
//!
//! Concurrent lookups for the same content id share one upstream execution.
//! The registry maps each key to a shared handle of the running task; all
//! callers for that key await the same handle and observe the same outcome,
//! success or failure.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tracing::debug;

use crate::metrics::COALESCED_REQUESTS;

/// Failure of the coordinated task itself (not of the work it performs).
#[derive(Debug, Clone, Error)]
pub enum CoordinatorError {
    #[error("Coordinated task aborted: {0}")]
    TaskAborted(String),
}

type SharedOutcome<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;
type Registry<T, E> = Arc<Mutex<HashMap<String, SharedOutcome<T, E>>>>;

/// Coalesces concurrent executions sharing a key.
///
/// A task is spawned onto the runtime when the first caller arrives, so it
/// always runs to completion even if every caller goes away. Its key is
/// removed from the registry as soon as it settles and before the outcome
/// is published; the next call for that key starts a fresh execution.
pub struct RequestCoordinator<T, E> {
    pending: Registry<T, E>,
}

impl<T, E> Default for RequestCoordinator<T, E> {
    fn default() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T, E> RequestCoordinator<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<CoordinatorError> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` for `key`, or join the execution already in flight.
    ///
    /// `task` is only invoked when this call starts a new execution.
    pub async fn run<F, Fut>(&self, key: &str, task: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (handle, joined) = {
            let mut pending = lock(&self.pending);
            match pending.get(key) {
                Some(existing) => (existing.clone(), true),
                None => {
                    let handle = self.spawn(key, task());
                    pending.insert(key.to_string(), handle.clone());
                    (handle, false)
                }
            }
        };

        if joined {
            COALESCED_REQUESTS.inc();
            debug!(key, "Joining in-flight execution");
        } else {
            debug!(key, "Starting new execution");
        }

        handle.await
    }

    /// Number of keys with an execution in flight.
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Whether `key` currently has an execution in flight.
    pub fn is_pending(&self, key: &str) -> bool {
        lock(&self.pending).contains_key(key)
    }

    fn spawn<Fut>(&self, key: &str, work: Fut) -> SharedOutcome<T, E>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let guard = PendingGuard {
            registry: Arc::clone(&self.pending),
            key: key.to_string(),
        };

        let join = tokio::spawn(async move {
            // Dropped on completion and on panic alike.
            let _guard = guard;
            work.await
        });

        async move {
            match join.await {
                Ok(outcome) => outcome,
                Err(e) => Err(E::from(CoordinatorError::TaskAborted(e.to_string()))),
            }
        }
        .boxed()
        .shared()
    }
}

/// Removes its key from the registry when dropped.
struct PendingGuard<T, E> {
    registry: Registry<T, E>,
    key: String,
}

impl<T, E> Drop for PendingGuard<T, E> {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.key);
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    // Critical sections never panic, so a poisoned lock still holds a
    // consistent map.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
