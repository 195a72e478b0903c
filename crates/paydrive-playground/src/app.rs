//! The in-process mock playground application.
//!
//! [`PlaygroundApp`] stands in for the payment SDK's example app in
//! hermetic suites. It consumes the launch environment exactly the way the
//! real application does — decode the settings blob, honor the recognized
//! toggles, ignore everything it does not recognize — and serves a live
//! element tree that taps and typing mutate.
//!
//! Boot flakiness is scripted through [`FlakePlan`]: the first N boots
//! (cold launches and reload taps alike) land on a spinner-only screen with
//! no ready signal, which is exactly the failure mode the reload-retry
//! controller exists to absorb.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use paydrive_core::driver::{DriverError, SwipeDirection, UiDriver};
use paydrive_core::element::{ElementQuery, UiElement};
use paydrive_core::launcher::{
    AppHost, HostError, LaunchRequest, ENV_DISABLE_ANIMATIONS, ENV_SETTINGS,
    ENV_STUB_BANK_LINKING, ENV_UITEST,
};
use paydrive_core::settings::{PlaygroundSettings, RELOAD_CONTROL};

use crate::screens::{render, FormState, Screen};

/// Scripted boot flakiness.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlakePlan {
    /// How many boots (launches + reloads) fail to reach the landing screen
    /// before the application starts booting cleanly.
    pub failing_boots: u32,
}

#[derive(Debug)]
struct AppState {
    running: bool,
    boots: u32,
    settings: PlaygroundSettings,
    screen: Screen,
    form: FormState,
    stub_bank_linking: bool,
    animations_disabled: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            running: false,
            boots: 0,
            settings: PlaygroundSettings::default(),
            screen: Screen::Spinner,
            form: FormState::default(),
            stub_bank_linking: false,
            animations_disabled: false,
        }
    }
}

/// The mock example application. Implements [`AppHost`] (process lifecycle)
/// and [`UiDriver`] (accessibility reads and simulated input) over one
/// shared state cell.
pub struct PlaygroundApp {
    state: Mutex<AppState>,
    flake: FlakePlan,
}

impl PlaygroundApp {
    /// An application that boots cleanly on the first attempt.
    pub fn new() -> std::sync::Arc<Self> {
        Self::with_flake(FlakePlan::default())
    }

    /// An application whose first `failing_boots` boots miss the landing
    /// screen.
    pub fn flaky(failing_boots: u32) -> std::sync::Arc<Self> {
        Self::with_flake(FlakePlan { failing_boots })
    }

    /// An application with an explicit flake plan.
    pub fn with_flake(flake: FlakePlan) -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            state: Mutex::new(AppState::default()),
            flake,
        })
    }

    /// Total boots performed so far (cold launches plus reloads).
    pub async fn boots(&self) -> u32 {
        self.state.lock().await.boots
    }

    /// Whether the application process is currently running.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    /// Whether the launch environment enabled the stubbed bank-linking
    /// backend.
    pub async fn bank_linking_stubbed(&self) -> bool {
        self.state.lock().await.stub_bank_linking
    }

    /// Whether the launch environment disabled animations.
    pub async fn animations_disabled(&self) -> bool {
        self.state.lock().await.animations_disabled
    }

    fn landing_screen(&self, boots: u32) -> Screen {
        if boots > self.flake.failing_boots {
            Screen::Landing
        } else {
            Screen::Spinner
        }
    }
}

#[async_trait]
impl AppHost for PlaygroundApp {
    async fn launch(&self, request: &LaunchRequest) -> Result<(), HostError> {
        let mut settings = PlaygroundSettings::default();
        let mut stub_bank_linking = false;
        let mut animations_disabled = false;

        for (key, value) in request.env() {
            match key.as_str() {
                ENV_SETTINGS => {
                    settings = PlaygroundSettings::decode(value).map_err(|e| {
                        HostError::LaunchFailed(format!("settings blob rejected: {e}"))
                    })?;
                }
                ENV_STUB_BANK_LINKING => stub_bank_linking = value == "1",
                ENV_DISABLE_ANIMATIONS => animations_disabled = value == "1",
                ENV_UITEST => {}
                // Unrecognized keys are ignored, never fatal.
                other => debug!(key = other, "ignoring unrecognized launch key"),
            }
        }

        let mut state = self.state.lock().await;
        state.boots += 1;
        state.running = true;
        state.settings = settings;
        state.form = FormState::default();
        state.stub_bank_linking = stub_bank_linking;
        state.animations_disabled = animations_disabled;
        state.screen = self.landing_screen(state.boots);
        debug!(boots = state.boots, screen = ?state.screen, "cold start");
        Ok(())
    }

    async fn terminate(&self) -> Result<(), HostError> {
        let mut state = self.state.lock().await;
        state.running = false;
        state.screen = Screen::Spinner;
        Ok(())
    }
}

#[async_trait]
impl UiDriver for PlaygroundApp {
    async fn dump_tree(&self) -> Result<Vec<UiElement>, DriverError> {
        let state = self.state.lock().await;
        if !state.running {
            return Err(DriverError::NotRunning);
        }
        Ok(render(state.screen, &state.settings, &state.form))
    }

    async fn tap(&self, query: &ElementQuery) -> Result<(), DriverError> {
        let element = self.resolve_unique(query).await?;
        if !element.is_hittable() {
            return Err(DriverError::CommandFailed(format!(
                "element {query} is not hittable"
            )));
        }
        let name = element.identifier.unwrap_or_default();

        let mut state = self.state.lock().await;
        if name == RELOAD_CONTROL {
            state.boots += 1;
            state.form = FormState::default();
            state.screen = self.landing_screen(state.boots);
            debug!(boots = state.boots, screen = ?state.screen, "reload");
        } else if name == state.settings.ui_style.landing_button() {
            state.form = FormState::default();
            state.screen = Screen::Sheet;
        } else if name == "Pay" {
            state.screen = Screen::Result;
        } else if name == "Done" {
            state.screen = Screen::Landing;
        }
        Ok(())
    }

    async fn tap_location(&self, _x: f64, _y: f64) -> Result<(), DriverError> {
        // Coordinate taps land on nothing in the mock; the tree is the
        // source of truth.
        Ok(())
    }

    async fn type_text(&self, query: &ElementQuery, text: &str) -> Result<(), DriverError> {
        let element = self.resolve_unique(query).await?;
        if !element.is_hittable() {
            return Err(DriverError::CommandFailed(format!(
                "element {query} is not hittable"
            )));
        }
        let name = element.identifier.unwrap_or_default();

        let mut state = self.state.lock().await;
        let field = match name.as_str() {
            "Card number" => &mut state.form.card_number,
            "MM/YY" => &mut state.form.expiry,
            "CVC" => &mut state.form.cvc,
            "ZIP" => &mut state.form.postal_code,
            _ => {
                return Err(DriverError::CommandFailed(format!(
                    "element {query} does not accept text"
                )));
            }
        };
        // Keystrokes append, like a real keyboard.
        field.push_str(text);
        Ok(())
    }

    async fn swipe(&self, _direction: SwipeDirection) -> Result<(), DriverError> {
        Ok(())
    }
}
