//! Settings encoding into the launch environment, and application startup.
//!
//! The application under test reads its configuration at cold start from an
//! environment-variable-like channel: a set of key/value pairs passed with
//! the launch request. This module builds that request from a
//! [`PlaygroundSettings`] record plus feature/stub toggles, and hands it to
//! an [`AppHost`] — the backend capable of actually starting and stopping
//! the process.
//!
//! Encoding happens strictly before the host is invoked: an unencodable
//! configuration fails the launch without any process start being attempted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::settings::{EncodeError, PlaygroundSettings};

/// Marks the launch as a UI-test launch. The application skips onboarding
/// and analytics when set.
pub const ENV_UITEST: &str = "PAYDRIVE_UITEST";

/// Carries the encoded [`PlaygroundSettings`] blob.
pub const ENV_SETTINGS: &str = "PAYDRIVE_SETTINGS";

/// Makes the bank-account linking flow use its stubbed backend.
pub const ENV_STUB_BANK_LINKING: &str = "PAYDRIVE_STUB_BANK_LINKING";

/// Disables UI animations for faster, more stable runs.
pub const ENV_DISABLE_ANIMATIONS: &str = "PAYDRIVE_DISABLE_ANIMATIONS";

/// Errors reported by an [`AppHost`] backend.
#[derive(Error, Debug)]
pub enum HostError {
    /// The host failed to start the application.
    #[error("Failed to launch application: {0}")]
    LaunchFailed(String),

    /// The host failed to terminate the application.
    #[error("Failed to terminate application: {0}")]
    TerminateFailed(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while launching the application.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The settings could not be encoded. Raised before any process start.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The host failed to start the process.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Feature and stub toggles passed alongside the settings blob.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Route bank-linking flows through the stubbed backend.
    pub stub_bank_linking: bool,
    /// Disable animations in the application.
    pub disable_animations: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            stub_bank_linking: true,
            disable_animations: true,
        }
    }
}

/// A fully built launch request: the environment the application will read
/// at cold start.
///
/// Immutable once constructed. Consumers must ignore keys they do not
/// recognize; the request may carry toggles an older build does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    env: BTreeMap<String, String>,
}

impl LaunchRequest {
    /// Builds a request from settings and options.
    ///
    /// # Errors
    ///
    /// Any [`EncodeError`] from serializing the settings.
    pub fn build(
        settings: &PlaygroundSettings,
        options: &LaunchOptions,
    ) -> Result<Self, EncodeError> {
        let blob = settings.encode()?;
        let mut env = BTreeMap::new();
        env.insert(ENV_UITEST.to_string(), "1".to_string());
        env.insert(ENV_SETTINGS.to_string(), blob);
        if options.stub_bank_linking {
            env.insert(ENV_STUB_BANK_LINKING.to_string(), "1".to_string());
        }
        if options.disable_animations {
            env.insert(ENV_DISABLE_ANIMATIONS.to_string(), "1".to_string());
        }
        Ok(Self { env })
    }

    /// Adds or replaces one environment entry.
    ///
    /// For toggles outside the standard set; consumers ignore keys they do
    /// not recognize.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The environment key/value pairs, in deterministic key order.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Looks up a single environment value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }
}

/// Trait for backends that can start and stop the application under test.
///
/// Implemented by device/simulator hosts in real deployments and by the
/// in-process mock playground in hermetic suites.
#[async_trait]
pub trait AppHost: Send + Sync {
    /// Cold-start the application with the given environment.
    ///
    /// A repeated launch while the application is running restarts it fresh.
    async fn launch(&self, request: &LaunchRequest) -> Result<(), HostError>;

    /// Terminate the application if it is running.
    ///
    /// Terminating an application that is not running succeeds silently.
    async fn terminate(&self) -> Result<(), HostError>;
}

/// Encodes settings and starts the application through an [`AppHost`].
pub struct Launcher {
    host: std::sync::Arc<dyn AppHost>,
    options: LaunchOptions,
}

impl Launcher {
    /// Creates a launcher with default options.
    pub fn new(host: std::sync::Arc<dyn AppHost>) -> Self {
        Self {
            host,
            options: LaunchOptions::default(),
        }
    }

    /// Overrides the launch options.
    pub fn with_options(mut self, options: LaunchOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the host backend.
    pub fn host(&self) -> &std::sync::Arc<dyn AppHost> {
        &self.host
    }

    /// Encodes `settings`, builds the launch request, and starts the
    /// application.
    ///
    /// Returns the request that was used, for logging and assertions.
    ///
    /// # Errors
    ///
    /// [`LaunchError::Encode`] if the settings fail to serialize — raised
    /// before the host is invoked; [`LaunchError::Host`] if the process
    /// start fails.
    pub async fn launch(
        &self,
        settings: &PlaygroundSettings,
    ) -> Result<LaunchRequest, LaunchError> {
        let request = LaunchRequest::build(settings, &self.options)?;
        info!(ui_style = ?settings.ui_style, "launching application");
        self.host.launch(&request).await?;
        Ok(request)
    }

    /// Terminates the application.
    pub async fn terminate(&self) -> Result<(), HostError> {
        self.host.terminate().await
    }
}
