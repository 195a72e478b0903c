//! Per-scenario session state for playground automation.
//!
//! A [`Session`] is the explicit object a test scenario drives the
//! application through: created at scenario start (which launches the
//! application and waits for it to become ready), passed into every harness
//! interaction, and torn down at scenario end. There is no ambient
//! singleton; two sessions never share state, and cross-test isolation
//! comes from each session launching the application fresh.
//!
//! Every action driven through a session is recorded to an in-memory ring
//! buffer (capped at [`MAX_ACTION_LOG_SIZE`] entries) and appended to a
//! JSON Lines file in `~/.paydrive/logs/`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use paydrive_core::session::{Session, SessionConfig};
//! use paydrive_core::settings::PlaygroundSettings;
//! use paydrive_core::element::ElementQuery;
//! # use paydrive_core::driver::UiDriver;
//! # use paydrive_core::launcher::AppHost;
//!
//! # async fn example(driver: Arc<dyn UiDriver>, host: Arc<dyn AppHost>) {
//! let settings = PlaygroundSettings::default();
//! let session = Session::start("card_checkout", driver, host, settings, SessionConfig::default())
//!     .await
//!     .unwrap();
//!
//! session.tap(&ElementQuery::button("Present PaymentSheet")).await.unwrap();
//! session.teardown().await.unwrap();
//! # }
//! ```

use std::collections::VecDeque;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::action::{Action, ActionRecord, ActionResult};
use crate::dispatch::{DispatchError, Dispatcher, Gate};
use crate::driver::{SwipeDirection, UiDriver};
use crate::element::ElementQuery;
use crate::launcher::{AppHost, HostError, LaunchOptions};
use crate::reload::{BootReport, ReloadConfig, ReloadController, ReloadError};
use crate::settings::PlaygroundSettings;
use crate::wait::{timeouts, Waiter};

/// Maximum number of action records retained in the ring buffer.
pub const MAX_ACTION_LOG_SIZE: usize = 1000;

/// Returns the harness state directory (`~/.paydrive`).
fn harness_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".paydrive")
}

/// Returns the logs directory (`~/.paydrive/logs/`), creating it if needed.
fn logs_dir() -> PathBuf {
    let dir = harness_dir().join("logs");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Errors raised while starting or driving a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Boot orchestration failed (launch, encoding, or exhausted reloads).
    #[error(transparent)]
    Reload(#[from] ReloadError),

    /// An action or wait failed after the session was ready.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The host failed during teardown.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Configuration knobs for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Boot orchestration parameters.
    pub reload: ReloadConfig,
    /// Launch environment toggles.
    pub launch_options: LaunchOptions,
    /// Timeout applied by the convenience methods ([`Session::tap`],
    /// [`Session::type_text`], ...). Explicit-timeout variants exist for
    /// slower screens.
    pub default_timeout: Duration,
    /// Polling cadence for action gating.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reload: ReloadConfig::default(),
            launch_options: LaunchOptions::default(),
            default_timeout: timeouts::UI_TRANSITION,
            poll_interval: crate::wait::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// An exclusive automation session over one freshly launched application.
///
/// The session owns the dispatcher and the host handle; only one session
/// drives the application at a time (enforced by the test runner's
/// scheduling, not by locking — see the concurrency notes in the crate
/// docs).
pub struct Session {
    /// Unique identifier for this session.
    pub id: Uuid,

    /// When the session was created.
    pub created_at: DateTime<Utc>,

    /// The settings the application was launched with. Frozen at launch.
    pub settings: PlaygroundSettings,

    dispatcher: Dispatcher,
    host: Arc<dyn AppHost>,
    boot: BootReport,
    default_timeout: Duration,
    action_log: RwLock<VecDeque<ActionRecord>>,
    log_writer: Mutex<Option<BufWriter<std::fs::File>>>,
}

impl Session {
    /// Launches the application with `settings` and returns a ready session.
    ///
    /// `name` labels the persistent log file
    /// (`~/.paydrive/logs/{name}_{timestamp}.jsonl`).
    ///
    /// # Errors
    ///
    /// Any [`ReloadError`] from the boot orchestration, including
    /// [`EncodeError`](crate::settings::EncodeError) failures raised before
    /// the application is started.
    pub async fn start(
        name: &str,
        driver: Arc<dyn UiDriver>,
        host: Arc<dyn AppHost>,
        settings: PlaygroundSettings,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let created_at = Utc::now();

        let mut controller =
            ReloadController::new(Arc::clone(&driver), Arc::clone(&host), config.reload.clone())
                .with_launch_options(config.launch_options.clone());
        let boot = controller.boot(&settings).await?;
        info!(attempts = boot.attempts, "application ready");

        let log_writer = {
            let timestamp = created_at.format("%Y%m%d_%H%M%S");
            let path = logs_dir().join(format!("{name}_{timestamp}.jsonl"));
            std::fs::File::create(&path).ok().map(BufWriter::new)
        };

        let dispatcher = Dispatcher::new(driver)
            .with_waiter(Waiter::with_poll_interval(config.poll_interval));

        Ok(Self {
            id: Uuid::new_v4(),
            created_at,
            settings,
            dispatcher,
            host,
            boot,
            default_timeout: config.default_timeout,
            action_log: RwLock::new(VecDeque::with_capacity(MAX_ACTION_LOG_SIZE)),
            log_writer: Mutex::new(log_writer),
        })
    }

    /// How the boot went (reload attempts, time to ready).
    pub fn boot_report(&self) -> BootReport {
        self.boot
    }

    /// The dispatcher, for gates and waits not covered by the convenience
    /// methods.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Taps an element once hittable, within the default timeout.
    pub async fn tap(&self, query: &ElementQuery) -> Result<(), SessionError> {
        self.tap_within(query, self.default_timeout).await
    }

    /// Taps an element once hittable, within an explicit timeout.
    pub async fn tap_within(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let start = tokio::time::Instant::now();
        let outcome = self.dispatcher.tap(query, timeout).await;
        self.finish(
            Action::Tap {
                query: query.clone(),
            },
            outcome,
            start,
        )
        .await
    }

    /// Types text into an element once hittable, within the default timeout.
    pub async fn type_text(
        &self,
        query: &ElementQuery,
        text: &str,
    ) -> Result<(), SessionError> {
        let start = tokio::time::Instant::now();
        let outcome = self
            .dispatcher
            .type_text(query, self.default_timeout, text)
            .await;
        self.finish(
            Action::TypeText {
                query: query.clone(),
                text: text.to_string(),
            },
            outcome,
            start,
        )
        .await
    }

    /// Swipes the screen.
    pub async fn swipe(&self, direction: SwipeDirection) -> Result<(), SessionError> {
        let action = Action::Swipe { direction };
        let start = tokio::time::Instant::now();
        let outcome = self.dispatcher.dispatch(&action).await;
        self.finish(action, outcome, start).await
    }

    /// Waits until the element is present.
    pub async fn wait_for(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        Ok(self.dispatcher.wait_for(query, timeout).await?)
    }

    /// Waits until the element is present and hittable.
    pub async fn wait_for_hittable(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        Ok(self.dispatcher.wait_for_hittable(query, timeout).await?)
    }

    /// Waits until no element matches the query.
    pub async fn wait_gone(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        Ok(self.dispatcher.wait_gone(query, timeout).await?)
    }

    /// Reads the value of the unique element matching the query.
    pub async fn read_value(
        &self,
        query: &ElementQuery,
    ) -> Result<Option<String>, SessionError> {
        Ok(self.dispatcher.read_value(query).await?)
    }

    /// Asserts that the given static text appears within the default
    /// timeout.
    pub async fn assert_text(&self, text: &str) -> Result<(), SessionError> {
        let query = ElementQuery::static_text(text);
        Ok(self
            .dispatcher
            .await_gate(&query, self.default_timeout, Gate::Presence)
            .await
            .map(|_| ())?)
    }

    /// Returns all recorded actions in chronological order.
    pub async fn action_log(&self) -> Vec<ActionRecord> {
        self.action_log.read().await.iter().cloned().collect()
    }

    /// Terminates the application and flushes the persistent log.
    pub async fn teardown(self) -> Result<(), SessionError> {
        if let Some(writer) = self.log_writer.lock().await.as_mut() {
            let _ = writer.flush();
        }
        self.host.terminate().await?;
        Ok(())
    }

    /// Records the outcome of a driven action and propagates its error.
    async fn finish(
        &self,
        action: Action,
        outcome: Result<(), DispatchError>,
        start: tokio::time::Instant,
    ) -> Result<(), SessionError> {
        let duration_ms = start.elapsed().as_millis() as u64;
        let result = match &outcome {
            Ok(()) => ActionResult::Success,
            Err(e) => ActionResult::Failure(e.to_string()),
        };
        self.record(ActionRecord::new(action, result, Some(duration_ms)))
            .await;
        Ok(outcome?)
    }

    /// Appends a record to the ring buffer and the JSON Lines file.
    async fn record(&self, record: ActionRecord) {
        {
            let mut log = self.action_log.write().await;
            if log.len() >= MAX_ACTION_LOG_SIZE {
                log.pop_front();
            }
            log.push_back(record.clone());
        }

        let mut writer_guard = self.log_writer.lock().await;
        if let Some(writer) = writer_guard.as_mut() {
            if let Ok(json) = serde_json::to_string(&record) {
                let _ = writeln!(writer, "{json}");
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("settings", &self.settings)
            .field("boot", &self.boot)
            .field("action_log", &"<RwLock<VecDeque<ActionRecord>>>")
            .field("log_writer", &"<Mutex<Option<BufWriter<File>>>>")
            .finish()
    }
}
