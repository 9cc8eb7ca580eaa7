//! Mock time source for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::challenge::{ChallengeError, TimeSource};

/// Mock implementation of the TimeSource trait.
///
/// Returns a fixed epoch or fails every call, and counts lookups.
#[derive(Debug)]
pub struct MockTimeSource {
    epoch: Option<i64>,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl MockTimeSource {
    /// A source that always reports `epoch`.
    pub fn fixed(epoch: i64) -> Self {
        Self {
            epoch: Some(epoch),
            calls: AtomicUsize::new(0),
            delay: Mutex::new(None),
        }
    }

    /// A source whose every lookup fails.
    pub fn unavailable() -> Self {
        Self {
            epoch: None,
            calls: AtomicUsize::new(0),
            delay: Mutex::new(None),
        }
    }

    /// Delay each lookup, to keep executions in flight.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Number of lookups made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeSource for MockTimeSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn now_epoch_secs(&self) -> Result<i64, ChallengeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.epoch.ok_or_else(|| {
            ChallengeError::UpstreamTimeUnavailable("mock time source unavailable".to_string())
        })
    }
}
