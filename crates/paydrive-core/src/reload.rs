//! Reload-retry orchestration for reliable application startup.
//!
//! Cold starts of the example application are the flakiest moment of a UI
//! test run: webview state may be stale, the first render can race the
//! accessibility tree, and a landing screen occasionally never arrives.
//! The [`ReloadController`] makes startup deterministic:
//!
//! 1. **Launch** the application with the encoded settings
//! 2. **Await the ready signal** — the landing element selected by the
//!    configuration's UI style — within a fixed window
//! 3. **Retry** by tapping the playground's reload control (not a cold
//!    relaunch) up to a bounded number of times
//! 4. **Fail hard** with [`ReloadError::ExhaustedRetries`] once the bound is
//!    reached — never silently swallowed
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use paydrive_core::reload::{ReloadConfig, ReloadController};
//! use paydrive_core::settings::PlaygroundSettings;
//! # use paydrive_core::driver::UiDriver;
//! # use paydrive_core::launcher::AppHost;
//!
//! # async fn example(driver: Arc<dyn UiDriver>, host: Arc<dyn AppHost>) {
//! let mut controller = ReloadController::new(driver, host, ReloadConfig::default());
//! let report = controller.boot(&PlaygroundSettings::default()).await.unwrap();
//! println!("ready after {} reloads", report.attempts);
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::action::Action;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::driver::UiDriver;
use crate::launcher::{AppHost, LaunchError, LaunchOptions, Launcher};
use crate::settings::PlaygroundSettings;
use crate::wait::{timeouts, Waiter};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the reload-retry controller.
#[derive(Debug, Clone)]
pub struct ReloadConfig {
    /// How long to wait for the ready signal after each launch or reload.
    pub ready_timeout: Duration,
    /// Maximum number of reload attempts before giving up.
    pub max_retries: u32,
    /// Polling cadence while awaiting the ready signal.
    pub poll_interval: Duration,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            ready_timeout: timeouts::READY_SIGNAL,
            max_retries: 3,
            poll_interval: crate::wait::DEFAULT_POLL_INTERVAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors and state
// ---------------------------------------------------------------------------

/// Errors specific to the boot orchestration.
#[derive(Error, Debug)]
pub enum ReloadError {
    /// The ready signal never appeared across the initial launch and every
    /// permitted reload. Fatal for the test.
    #[error("Ready signal did not appear after {attempts} reload attempts")]
    ExhaustedRetries {
        /// How many reloads were performed (equals the configured bound).
        attempts: u32,
    },

    /// Launching the application failed (including settings encoding).
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// A non-timeout dispatch failure while awaiting or reloading, e.g. an
    /// ambiguous ready-element query. Not retried.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Progress of one boot orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    /// A launch request has been issued.
    Launching,
    /// Awaiting the ready signal. `attempt` counts completed reloads.
    AwaitingReady {
        /// Reloads performed so far.
        attempt: u32,
    },
    /// The ready signal was missed; a reload is about to be issued.
    RetryPending {
        /// The reload about to be performed (1-based).
        attempt: u32,
    },
    /// The ready signal was observed.
    Ready {
        /// Reloads it took to get there.
        attempt: u32,
    },
    /// Every permitted reload was spent without the signal appearing.
    Failed {
        /// Reloads performed.
        attempts: u32,
    },
}

/// Summary of a successful boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// How many reloads were needed (0 = ready on the initial launch).
    pub attempts: u32,
    /// Total wall-clock time from launch to ready.
    pub waited: Duration,
}

// ---------------------------------------------------------------------------
// ReloadController
// ---------------------------------------------------------------------------

/// Orchestrates launch, ready-signal waiting, and bounded reload retries.
///
/// The ready signal is a pure function of the configuration's UI style (see
/// [`UiStyle::ready_element`](crate::settings::UiStyle::ready_element));
/// the controller never guesses a fallback element.
pub struct ReloadController {
    launcher: Launcher,
    dispatcher: Dispatcher,
    config: ReloadConfig,
    state: BootState,
}

impl ReloadController {
    /// Creates a controller over the given driver and host backends.
    pub fn new(
        driver: Arc<dyn UiDriver>,
        host: Arc<dyn AppHost>,
        config: ReloadConfig,
    ) -> Self {
        let dispatcher = Dispatcher::new(driver)
            .with_waiter(Waiter::with_poll_interval(config.poll_interval));
        Self {
            launcher: Launcher::new(host),
            dispatcher,
            config,
            state: BootState::Launching,
        }
    }

    /// Overrides the launch options used for the cold start.
    pub fn with_launch_options(mut self, options: LaunchOptions) -> Self {
        let host = Arc::clone(self.launcher.host());
        self.launcher = Launcher::new(host).with_options(options);
        self
    }

    /// The most recent boot state.
    pub fn state(&self) -> BootState {
        self.state
    }

    fn transition(&mut self, state: BootState) {
        debug!(state = ?state, "boot state");
        self.state = state;
    }

    /// Launches the application and drives it to the ready state.
    ///
    /// On success the landing screen for the configured UI style is on
    /// screen and interactive. On a missed ready window the playground's
    /// reload control is tapped and the wait restarts, up to
    /// [`ReloadConfig::max_retries`] times; exhaustion is a hard error.
    ///
    /// # Errors
    ///
    /// - [`ReloadError::Launch`] if encoding or the cold start fails —
    ///   encoding failures abort before any process start
    /// - [`ReloadError::ExhaustedRetries`] after the final missed window
    /// - [`ReloadError::Dispatch`] for non-timeout failures (ambiguous
    ///   queries, backend errors), which are never retried
    pub async fn boot(
        &mut self,
        settings: &PlaygroundSettings,
    ) -> Result<BootReport, ReloadError> {
        let start = tokio::time::Instant::now();
        let ready = settings.ui_style.ready_element();

        self.transition(BootState::Launching);
        self.launcher.launch(settings).await?;

        for attempt in 0..=self.config.max_retries {
            self.transition(BootState::AwaitingReady { attempt });
            match self
                .dispatcher
                .wait_for(&ready, self.config.ready_timeout)
                .await
            {
                Ok(()) => {
                    self.transition(BootState::Ready { attempt });
                    return Ok(BootReport {
                        attempts: attempt,
                        waited: start.elapsed(),
                    });
                }
                Err(DispatchError::Timeout { .. }) if attempt < self.config.max_retries => {
                    self.transition(BootState::RetryPending { attempt: attempt + 1 });
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        ready_element = %ready,
                        "ready signal missed, reloading playground"
                    );
                    self.dispatcher.dispatch(&Action::Reload).await?;
                }
                Err(DispatchError::Timeout { .. }) => {
                    self.transition(BootState::Failed {
                        attempts: self.config.max_retries,
                    });
                    return Err(ReloadError::ExhaustedRetries {
                        attempts: self.config.max_retries,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        // The loop always returns from its final iteration.
        self.transition(BootState::Failed {
            attempts: self.config.max_retries,
        });
        Err(ReloadError::ExhaustedRetries {
            attempts: self.config.max_retries,
        })
    }

    /// Terminates the application. Used by session teardown.
    pub async fn shutdown(&self) -> Result<(), crate::launcher::HostError> {
        self.launcher.terminate().await
    }

    /// Returns the dispatcher bound to this controller's driver.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
