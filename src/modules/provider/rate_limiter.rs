//! Admission control for calls to the upstream catalog API.
//!
//! Jikan allows roughly 3 requests per second. Instead of trusting every
//! caller to pace itself, the limiter bounds in-flight requests and enforces
//! a minimum spacing between the *start* of successive admitted requests.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep, Instant};

/// Upstream ceiling: at most this many requests in flight at once.
const MAX_CONCURRENT_REQUESTS: usize = 3;
/// Minimum spacing between admitted request starts (~3 req/sec).
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(350);

pub struct RateLimiter {
    slots: Arc<Semaphore>,
    last_admitted: Arc<Mutex<Instant>>,
    min_interval: Duration,
}

/// Held for the duration of one upstream call; dropping it frees the slot.
pub struct RateLimiterPermit {
    _slot: Option<OwnedSemaphorePermit>,
}

impl RateLimiter {
    pub fn new(max_concurrent: usize, min_interval: Duration) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_admitted: Arc::new(Mutex::new(Instant::now() - min_interval)),
            min_interval,
        }
    }

    /// Limiter tuned for the Jikan API ceiling.
    pub fn for_jikan() -> Self {
        Self::new(MAX_CONCURRENT_REQUESTS, MIN_REQUEST_INTERVAL)
    }

    /// Waits until a concurrency slot is free and the minimum interval since
    /// the previously admitted start has elapsed, then records the new start.
    pub async fn acquire(&self) -> RateLimiterPermit {
        // A closed semaphore can only happen through explicit misuse; fail
        // open with an unslotted permit rather than refusing all traffic.
        let slot = self.slots.clone().acquire_owned().await.ok();

        let mut last = self.last_admitted.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();

        RateLimiterPermit { _slot: slot }
    }

    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::for_jikan()
    }
}
