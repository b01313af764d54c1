//! Bounded polling.
//!
//! Every suspension in the suite goes through [`Wait`]: a check is polled
//! until it yields a value or the deadline passes. A timeout is reported as
//! `Ok(None)` so each caller can raise the named error of its own operation.
//! Check errors are not retried; they propagate immediately.
//!
//! Uses `tokio::time`, so tests can run on a paused clock.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

// ============================================================================
// Wait
// ============================================================================

/// A bounded wait: deadline plus polling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
    timeout: Duration,
    interval: Duration,
}

impl Wait {
    /// Creates a wait with the default polling interval.
    #[inline]
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the polling interval.
    #[inline]
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the timeout.
    #[inline]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the polling interval.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls `check` until it returns `Some` or the timeout elapses.
    ///
    /// The check always runs at least once, and once more at the deadline.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `check`.
    pub async fn until<T, F, Fut>(&self, mut check: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if let Some(value) = check().await? {
                trace!(attempts, "Wait satisfied");
                return Ok(Some(value));
            }

            let now = Instant::now();
            if now >= deadline {
                trace!(attempts, timeout_ms = self.timeout.as_millis(), "Wait timed out");
                return Ok(None);
            }
            sleep(self.interval.min(deadline - now)).await;
        }
    }

    /// Polls a boolean condition; returns whether it held before the timeout.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `condition`.
    pub async fn until_true<F, Fut>(&self, mut condition: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let satisfied = self
            .until(|| {
                let fut = condition();
                async move { Ok(fut.await?.then_some(())) }
            })
            .await?;
        Ok(satisfied.is_some())
    }
}

// ============================================================================
// Tests
// ============================================================================
