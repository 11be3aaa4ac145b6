//! Pacing of outbound model calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Gate awaited before each external model call.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next call may be made.
    async fn acquire(&self);

    /// Forget previous calls; the next `acquire` starts a fresh batch.
    fn reset(&self) {}
}

/// Sleeps a fixed interval before every call except the first of a batch.
///
/// The pause is unconditional: it does not account for time already spent
/// in the previous call and does not change on errors.
#[derive(Debug)]
pub struct FixedIntervalGate {
    interval: Duration,
    primed: AtomicBool,
}

impl FixedIntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            primed: AtomicBool::new(false),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl RateLimiter for FixedIntervalGate {
    async fn acquire(&self) {
        if self.primed.swap(true, Ordering::SeqCst) && !self.interval.is_zero() {
            debug!("Waiting {:?} before next categorization call", self.interval);
            tokio::time::sleep(self.interval).await;
        }
    }

    fn reset(&self) {
        self.primed.store(false, Ordering::SeqCst);
    }
}
