//! Bounded polling for UI synchronization.
//!
//! This module provides the [`Waiter`], the single primitive every other
//! harness component uses to synchronize with the application: re-evaluate a
//! probe at a fixed cadence until it is satisfied or an explicit timeout
//! elapses. There is no cancellation beyond the deadline; a wait either
//! succeeds early or reports [`WaitOutcome::TimedOut`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use paydrive_core::wait::{Waiter, WaitOutcome};
//!
//! # async fn example() {
//! let waiter = Waiter::default();
//! let mut polls = 0;
//! let outcome = waiter
//!     .wait_until(Duration::from_secs(4), || {
//!         polls += 1;
//!         async move { polls >= 3 }
//!     })
//!     .await;
//! assert!(outcome.is_satisfied());
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::trace;

/// Default polling cadence. Short enough to catch UI transitions promptly,
/// long enough not to busy-spin the accessibility backend.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Named wait windows observed to cover the harness's call sites.
///
/// Timeouts are always explicit parameters; these constants are the
/// documented defaults for each latency class, not a protocol.
pub mod timeouts {
    use std::time::Duration;

    /// A local UI transition (sheet presentation, tab switch).
    pub const UI_TRANSITION: Duration = Duration::from_secs(4);
    /// The landing screen's ready signal after a launch or reload.
    pub const READY_SIGNAL: Duration = Duration::from_secs(5);
    /// A UI update that requires one network round-trip.
    pub const NETWORKED_UI: Duration = Duration::from_secs(10);
    /// A webview-backed screen finishing its initial load.
    pub const WEBVIEW_LOAD: Duration = Duration::from_secs(30);
    /// Worst-case external flows (bank redirects, slow sandboxes).
    pub const SLOW_NETWORK: Duration = Duration::from_secs(60);
}

/// One evaluation of a wait probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The condition holds; the wait returns immediately.
    Satisfied,
    /// The condition does not hold yet. May carry a note describing what was
    /// observed instead, surfaced in timeout diagnostics.
    Pending(Option<String>),
}

impl Probe {
    /// Pending with a description of the last-observed state.
    pub fn observed(state: impl Into<String>) -> Self {
        Probe::Pending(Some(state.into()))
    }
}

impl From<bool> for Probe {
    fn from(satisfied: bool) -> Self {
        if satisfied {
            Probe::Satisfied
        } else {
            Probe::Pending(None)
        }
    }
}

/// Result of a [`Waiter::wait_until`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The probe was satisfied within the timeout.
    Satisfied,
    /// The deadline elapsed without the probe ever being satisfied.
    TimedOut {
        /// Total time spent waiting.
        waited: Duration,
        /// The last observed-state note reported by the probe, if any.
        last_observed: Option<String>,
    },
}

impl WaitOutcome {
    /// Returns true if the wait was satisfied.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitOutcome::Satisfied)
    }
}

/// Re-evaluates a probe at a bounded cadence until satisfied or timed out.
///
/// The waiter suspends only between evaluations (`tokio::time::sleep`); the
/// probe itself runs on the calling task, so actions stay in program order.
#[derive(Debug, Clone)]
pub struct Waiter {
    poll_interval: Duration,
}

impl Default for Waiter {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Waiter {
    /// Creates a waiter with a custom polling cadence.
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Returns the polling cadence.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Polls `probe` until it reports [`Probe::Satisfied`] or `timeout`
    /// elapses.
    ///
    /// The probe is evaluated once immediately, then at the polling cadence.
    /// Returns on the first satisfied evaluation without waiting out the
    /// remainder of the window. The probe may return `bool` directly; it
    /// converts into [`Probe`].
    pub async fn wait_until<F, Fut, P>(&self, timeout: Duration, mut probe: F) -> WaitOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = P>,
        P: Into<Probe>,
    {
        let start = tokio::time::Instant::now();
        let deadline = start + timeout;
        let mut last_observed = None;

        loop {
            match probe().await.into() {
                Probe::Satisfied => {
                    trace!(elapsed_ms = start.elapsed().as_millis() as u64, "wait satisfied");
                    return WaitOutcome::Satisfied;
                }
                Probe::Pending(observed) => {
                    if observed.is_some() {
                        last_observed = observed;
                    }
                }
            }

            if tokio::time::Instant::now() >= deadline {
                return WaitOutcome::TimedOut {
                    waited: start.elapsed(),
                    last_observed,
                };
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
