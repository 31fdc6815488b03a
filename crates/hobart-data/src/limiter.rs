//! Client-side request rate limiting.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Published SEC fair-access budget: requests per second.
pub const SEC_CALL_LIMIT: u32 = 10;

/// A token bucket shared between the components of a pipeline.
pub type SharedTokenBucket = Arc<Mutex<TokenBucket>>;

/// Token-bucket rate limiter.
///
/// Holds up to `capacity` permits and refills one permit per
/// `refill_interval`. [`TokenBucket::acquire`] sleeps until a permit is
/// available; callers observe a delay, never an error.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    available: u32,
    refill_interval: Duration,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a bucket starting full.
    ///
    /// A zero `capacity` is treated as one permit.
    #[must_use]
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            available: capacity,
            refill_interval,
            last_refill: Instant::now(),
        }
    }

    /// Bucket tuned to half the published SEC request budget.
    #[must_use]
    pub fn sec_default() -> Self {
        let per_second = SEC_CALL_LIMIT / 2;
        Self::new(
            per_second,
            Duration::from_millis(1000 / u64::from(per_second)),
        )
    }

    /// Wrap a bucket for sharing across clients.
    #[must_use]
    pub fn shared(self) -> SharedTokenBucket {
        Arc::new(Mutex::new(self))
    }

    /// Take one permit, sleeping until one is available.
    pub async fn acquire(&mut self) {
        loop {
            self.refill();
            if self.available > 0 {
                self.available -= 1;
                return;
            }
            sleep_until(self.last_refill + self.refill_interval).await;
        }
    }

    /// Take one permit without waiting, if one is available.
    pub fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.available > 0 {
            self.available -= 1;
            true
        } else {
            false
        }
    }

    /// Maximum number of permits the bucket can hold.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    fn refill(&mut self) {
        if self.refill_interval.is_zero() {
            self.available = self.capacity;
            self.last_refill = Instant::now();
            return;
        }
        let elapsed = self.last_refill.elapsed();
        let intervals = elapsed.as_nanos() / self.refill_interval.as_nanos();
        if intervals == 0 {
            return;
        }
        if intervals >= u128::from(self.capacity) {
            self.available = self.capacity;
            self.last_refill = Instant::now();
        } else {
            // intervals < capacity here, so the cast and multiply stay small
            let intervals = intervals as u32;
            self.available = (self.available + intervals).min(self.capacity);
            self.last_refill += self.refill_interval * intervals;
        }
    }
}

impl Default for TokenBucket {
    fn default() -> Self {
        Self::sec_default()
    }
}
