//! Token bucket shared across all outbound calls to the upstream API.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Single-process token bucket.
///
/// Tokens accrue at `rate` per second up to `capacity` and are deducted per
/// acquisition. The mutex covers only the refill-and-check critical
/// section; the wait between attempts happens with the lock released, so
/// contending tasks are not serialized behind a sleeper. Acquisition order
/// under contention is not FIFO.
pub struct TokenBucket {
    rate: f64,
    capacity: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a bucket that starts full.
    pub fn new(rate: f64, capacity: f64) -> Self {
        Self {
            rate,
            capacity,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Suspend until `n` tokens are available, then deduct them.
    pub async fn acquire(&self, n: f64) {
        loop {
            {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
                state.last_refill = now;
                if state.tokens >= n {
                    state.tokens -= n;
                    return;
                }
            }
            time::sleep(Duration::from_secs_f64(1.0 / self.rate)).await;
        }
    }
}
