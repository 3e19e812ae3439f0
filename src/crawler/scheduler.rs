//! Request pacing for the chapter loop
//!
//! This module handles:
//! - Spacing requests `1 / requests_per_second` apart
//! - Letting the first request through immediately
//! - Abandoning a wait as soon as the crawl is cancelled

use crate::HarvestError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Longest spacing the limiter will impose between two requests
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// Token-bucket style limiter with a burst of one
///
/// The limiter remembers when the next request is allowed. Callers that
/// arrive early sleep until that instant; callers that arrive late go
/// through at once and push the next slot forward from "now".
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `requests_per_second` sustained requests
    ///
    /// Non-positive or non-finite rates disable pacing. Rates slow enough
    /// to exceed [`MAX_INTERVAL`] are clamped to it.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            Duration::try_from_secs_f64(1.0 / requests_per_second)
                .map_or(MAX_INTERVAL, |interval| interval.min(MAX_INTERVAL))
        } else {
            Duration::ZERO
        };

        Self::with_interval(interval)
    }

    /// Creates a limiter with an explicit spacing between requests
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Minimum spacing between two acquisitions
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the next request slot
    ///
    /// # Returns
    ///
    /// * `Ok(())` - A slot was granted
    /// * `Err(HarvestError::Cancelled)` - The token fired before or during the wait
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), HarvestError> {
        if cancel.is_cancelled() {
            return Err(HarvestError::Cancelled);
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        let wait = slot.saturating_duration_since(Instant::now());
        if wait.is_zero() {
            return Ok(());
        }

        trace!("Rate limiter waiting {:?}", wait);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(HarvestError::Cancelled),
            _ = tokio::time::sleep_until(slot) => Ok(()),
        }
    }
}
