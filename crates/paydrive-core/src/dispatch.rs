//! Wait-then-act dispatch of simulated user input.
//!
//! This module provides the [`Dispatcher`], which composes the
//! [`Waiter`](crate::wait::Waiter) with a backend [`UiDriver`] so that an
//! action is only attempted once its target element is confirmed ready.
//! This eliminates the class of flaky "element not yet rendered" failures
//! inherent to asynchronous UI rendering.
//!
//! Callers choose the readiness gate per call: [`Gate::Presence`] (the
//! element exists in the tree) or [`Gate::Hittable`] (it exists *and* can
//! receive input — not obscured, not mid-animation, not disabled).

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info_span, Instrument};

use crate::action::Action;
use crate::driver::{DriverError, UiDriver};
use crate::element::ElementQuery;
use crate::settings::RELOAD_CONTROL;
use crate::wait::{Probe, WaitOutcome, Waiter};

/// Errors produced while dispatching actions.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The readiness gate was never satisfied within the deadline.
    ///
    /// Carries the query and elapsed time for diagnostics. Recoverable only
    /// by the reload controller during startup; everywhere else this is a
    /// hard test failure.
    #[error("Timed out after {}ms waiting for {query}", .waited.as_millis())]
    Timeout {
        /// The query that was being waited on.
        query: String,
        /// Total time spent waiting.
        waited: Duration,
        /// The last observed-state note, if any.
        last_observed: Option<String>,
    },

    /// The backend reported an error. Ambiguous resolutions surface here
    /// immediately; they are never retried.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Readiness condition an element must meet before an action is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The element exists in the accessibility tree.
    Presence,
    /// The element exists and can currently receive input.
    Hittable,
}

/// Executes simulated user actions, gated on element readiness.
///
/// The dispatcher holds the backend driver and a [`Waiter`]; every gated
/// call polls the live tree (no cached handles) until the gate passes, then
/// performs the action.
pub struct Dispatcher {
    driver: Arc<dyn UiDriver>,
    waiter: Waiter,
}

impl Dispatcher {
    /// Creates a dispatcher over the given driver with the default waiter.
    pub fn new(driver: Arc<dyn UiDriver>) -> Self {
        Self {
            driver,
            waiter: Waiter::default(),
        }
    }

    /// Replaces the waiter, e.g. to slow the polling cadence.
    pub fn with_waiter(mut self, waiter: Waiter) -> Self {
        self.waiter = waiter;
        self
    }

    /// Returns a reference to the underlying driver.
    pub fn driver(&self) -> &Arc<dyn UiDriver> {
        &self.driver
    }

    /// Waits until `query` satisfies `gate`, returning the time it took.
    ///
    /// Zero matches count as "not yet" and keep polling; more than one match
    /// is a [`DriverError::Ambiguous`] and fails immediately. A backend
    /// reporting [`DriverError::NotRunning`] also keeps polling — the
    /// application may still be starting.
    pub async fn await_gate(
        &self,
        query: &ElementQuery,
        timeout: Duration,
        gate: Gate,
    ) -> Result<Duration, DispatchError> {
        let start = tokio::time::Instant::now();
        let fatal: Mutex<Option<DispatchError>> = Mutex::new(None);

        let outcome = self
            .waiter
            .wait_until(timeout, || {
                let driver = Arc::clone(&self.driver);
                let fatal = &fatal;
                async move {
                    match driver.query(query).await {
                        Ok(matches) if matches.is_empty() => Probe::observed("not present"),
                        Ok(matches) if matches.len() > 1 => {
                            *fatal.lock().await = Some(
                                DriverError::Ambiguous {
                                    query: query.to_string(),
                                    count: matches.len(),
                                }
                                .into(),
                            );
                            // Satisfied only to stop the poll loop; the
                            // stored error takes precedence below.
                            Probe::Satisfied
                        }
                        Ok(matches) => match gate {
                            Gate::Presence => Probe::Satisfied,
                            Gate::Hittable if matches[0].is_hittable() => Probe::Satisfied,
                            Gate::Hittable => Probe::observed("present but not hittable"),
                        },
                        Err(DriverError::NotRunning) => {
                            Probe::observed("application not running")
                        }
                        Err(e) => {
                            *fatal.lock().await = Some(e.into());
                            Probe::Satisfied
                        }
                    }
                }
            })
            .await;

        if let Some(err) = fatal.lock().await.take() {
            return Err(err);
        }

        match outcome {
            WaitOutcome::Satisfied => Ok(start.elapsed()),
            WaitOutcome::TimedOut {
                waited,
                last_observed,
            } => Err(DispatchError::Timeout {
                query: query.to_string(),
                waited,
                last_observed,
            }),
        }
    }

    /// Waits until the element is present in the tree.
    pub async fn wait_for(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), DispatchError> {
        self.await_gate(query, timeout, Gate::Presence).await.map(|_| ())
    }

    /// Waits until the element is present and able to receive input.
    pub async fn wait_for_hittable(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), DispatchError> {
        self.await_gate(query, timeout, Gate::Hittable).await.map(|_| ())
    }

    /// Waits until no element matches the query.
    pub async fn wait_gone(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), DispatchError> {
        let outcome = self
            .waiter
            .wait_until(timeout, || {
                let driver = Arc::clone(&self.driver);
                async move {
                    match driver.query(query).await {
                        Ok(matches) => matches.is_empty().into(),
                        // A backend that can't answer counts as "still there".
                        Err(_) => Probe::observed("query failed"),
                    }
                }
            })
            .await;

        match outcome {
            WaitOutcome::Satisfied => Ok(()),
            WaitOutcome::TimedOut {
                waited,
                last_observed,
            } => Err(DispatchError::Timeout {
                query: format!("disappearance of {query}"),
                waited,
                last_observed,
            }),
        }
    }

    /// Waits for the gate on `query`, then performs `action`.
    ///
    /// The gate and the action may target different elements (e.g. wait for
    /// a sheet to present, then tap a button inside it).
    pub async fn wait_then_act(
        &self,
        query: &ElementQuery,
        timeout: Duration,
        gate: Gate,
        action: Action,
    ) -> Result<(), DispatchError> {
        self.await_gate(query, timeout, gate).await?;
        self.dispatch(&action).await
    }

    /// Taps an element once it is hittable.
    pub async fn tap(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), DispatchError> {
        self.wait_then_act(
            query,
            timeout,
            Gate::Hittable,
            Action::Tap {
                query: query.clone(),
            },
        )
        .await
    }

    /// Types text into an element once it is hittable.
    pub async fn type_text(
        &self,
        query: &ElementQuery,
        timeout: Duration,
        text: impl Into<String>,
    ) -> Result<(), DispatchError> {
        self.wait_then_act(
            query,
            timeout,
            Gate::Hittable,
            Action::TypeText {
                query: query.clone(),
                text: text.into(),
            },
        )
        .await
    }

    /// Reads the value of the unique element matching the query.
    pub async fn read_value(
        &self,
        query: &ElementQuery,
    ) -> Result<Option<String>, DispatchError> {
        let element = self.driver.resolve_unique(query).await?;
        Ok(element.value)
    }

    /// Performs an action immediately, without a readiness gate.
    pub async fn dispatch(&self, action: &Action) -> Result<(), DispatchError> {
        let span = info_span!("dispatch_action", action = action.name());
        async {
            let start = tokio::time::Instant::now();
            let result = self.dispatch_inner(action).await;
            debug!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                success = result.is_ok(),
                "action complete"
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn dispatch_inner(&self, action: &Action) -> Result<(), DispatchError> {
        match action {
            Action::Tap { query } => self.driver.tap(query).await?,
            Action::TypeText { query, text } => self.driver.type_text(query, text).await?,
            Action::TapLocation { x, y } => self.driver.tap_location(*x, *y).await?,
            Action::Swipe { direction } => self.driver.swipe(*direction).await?,
            Action::Reload => {
                self.driver
                    .tap(&ElementQuery::button(RELOAD_CONTROL))
                    .await?
            }
            // Launching goes through the launcher, not the input path.
            Action::Launch => {
                return Err(DriverError::CommandFailed(
                    "launch must be performed through the launcher".to_string(),
                )
                .into());
            }
        }
        Ok(())
    }
}
