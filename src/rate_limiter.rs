// Fixed-interval pacing for remote API calls.
//
// Both the forum API and the moderation API are called strictly in sequence.
// Each client owns a RateLimiter that enforces a minimum gap between
// consecutive requests: the first call goes straight through, later calls
// sleep for whatever is left of the interval.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Gap between successive forum page requests.
pub const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Gap between successive moderation calls.
pub const MODERATION_DELAY: Duration = Duration::from_millis(400);

/// Enforces a minimum interval between requests.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    interval: Duration,
    /// When the last request was allowed through
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                last_request: None,
            })),
        }
    }

    /// Wait until the interval since the previous request has passed.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;

        if let Some(last) = inner.last_request {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < inner.interval {
                tokio::time::sleep(inner.interval - elapsed).await;
            }
        }

        inner.last_request = Some(Instant::now());
    }
}
