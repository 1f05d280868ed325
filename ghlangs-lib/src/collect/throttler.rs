use super::sleeper::Sleeper;
use core::time::Duration;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limits how many queries are in flight and spaces out their dispatch.
///
/// Wrap in an `Arc` via [`Throttler::new`], then call [`Throttler::acquire`] before
/// each request. At most `max_concurrent` requests run simultaneously, and each one
/// waits `smoothing_delay` after admission so that a burst of admitted requests does not
/// hit the API at the same instant.
#[derive(Debug)]
pub struct Throttler {
    semaphore: Arc<Semaphore>,
    smoothing_delay: Duration,
}

impl Throttler {
    /// Create a new throttler that allows at most `max_concurrent` requests at a time.
    pub fn new(max_concurrent: usize, smoothing_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            smoothing_delay,
        })
    }

    /// Wait for a concurrency slot, then for the smoothing delay.
    ///
    /// The returned permit must be held for the duration of the request. When it
    /// is dropped, the slot becomes available for another caller.
    pub async fn acquire(&self, sleeper: &impl Sleeper) -> OwnedSemaphorePermit {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("semaphore is never closed");

        sleeper.sleep(self.smoothing_delay).await;
        permit
    }

    /// Number of slots currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
