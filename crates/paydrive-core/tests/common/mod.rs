//! Shared test doubles for paydrive-core integration tests.
//!
//! Provides two mock backends:
//!
//! - [`ScriptedApp`] — a host + driver pair sharing one state cell, scripted
//!   to become ready after a configurable number of boots (launches plus
//!   reload taps). Used by the reload-retry tests.
//! - [`PhasedDriver`] — a driver that serves a scripted sequence of element
//!   trees, one per `dump_tree` call, the last tree persisting. Used by the
//!   wait/dispatch tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use paydrive_core::driver::{DriverError, SwipeDirection, UiDriver};
use paydrive_core::element::{ElementQuery, Role, UiElement};
use paydrive_core::launcher::{AppHost, HostError, LaunchRequest, ENV_SETTINGS};
use paydrive_core::settings::{PlaygroundSettings, RELOAD_CONTROL};

// ---------------------------------------------------------------------------
// ScriptedApp: host + driver over shared state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedState {
    /// Cold launches performed.
    pub launches: u32,
    /// Reload taps performed.
    pub reloads: u32,
    /// Total boots (launches + reloads).
    pub boots: u32,
    /// Whether the application is currently running.
    pub running: bool,
    /// The landing button name decoded from the last launch request.
    pub landing_button: Option<String>,
    /// The env of the last launch request.
    pub last_env: Option<Vec<(String, String)>>,
    /// Identifiers of tapped elements other than the reload control.
    pub taps: Vec<String>,
}

/// A scripted application: ready iff the boot count has reached
/// `ready_on_boot` (1-based). `None` means the ready signal never appears.
pub struct ScriptedApp {
    state: Arc<Mutex<ScriptedState>>,
    ready_on_boot: Option<u32>,
}

impl ScriptedApp {
    pub fn new(ready_on_boot: Option<u32>) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(ScriptedState::default())),
            ready_on_boot,
        })
    }

    pub fn state(&self) -> ScriptedState {
        let s = self.state.lock().unwrap();
        ScriptedState {
            launches: s.launches,
            reloads: s.reloads,
            boots: s.boots,
            running: s.running,
            landing_button: s.landing_button.clone(),
            last_env: s.last_env.clone(),
            taps: s.taps.clone(),
        }
    }

    fn current_tree(&self) -> Vec<UiElement> {
        let s = self.state.lock().unwrap();
        if !s.running {
            return Vec::new();
        }
        let ready = self
            .ready_on_boot
            .is_some_and(|threshold| s.boots >= threshold);
        let mut children = vec![UiElement::leaf(Role::Button, RELOAD_CONTROL)];
        if ready {
            if let Some(name) = &s.landing_button {
                children.push(UiElement::leaf(Role::Button, name.clone()));
            }
        } else {
            children.push(UiElement::leaf(Role::StaticText, "Loading…"));
        }
        vec![UiElement::leaf(Role::Other, "playground").with_children(children)]
    }
}

#[async_trait]
impl AppHost for ScriptedApp {
    async fn launch(&self, request: &LaunchRequest) -> Result<(), HostError> {
        let settings = request
            .get(ENV_SETTINGS)
            .and_then(|blob| PlaygroundSettings::decode(blob).ok())
            .unwrap_or_default();

        let mut s = self.state.lock().unwrap();
        s.launches += 1;
        s.boots += 1;
        s.running = true;
        s.landing_button = Some(settings.ui_style.landing_button().to_string());
        s.last_env = Some(
            request
                .env()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );
        Ok(())
    }

    async fn terminate(&self) -> Result<(), HostError> {
        self.state.lock().unwrap().running = false;
        Ok(())
    }
}

#[async_trait]
impl UiDriver for ScriptedApp {
    async fn dump_tree(&self) -> Result<Vec<UiElement>, DriverError> {
        if !self.state.lock().unwrap().running {
            return Err(DriverError::NotRunning);
        }
        Ok(self.current_tree())
    }

    async fn tap(&self, query: &ElementQuery) -> Result<(), DriverError> {
        let element = self.resolve_unique(query).await?;
        let name = element.identifier.unwrap_or_default();
        let mut s = self.state.lock().unwrap();
        if name == RELOAD_CONTROL {
            s.reloads += 1;
            s.boots += 1;
        } else {
            s.taps.push(name);
        }
        Ok(())
    }

    async fn tap_location(&self, _x: f64, _y: f64) -> Result<(), DriverError> {
        Ok(())
    }

    async fn type_text(&self, query: &ElementQuery, _text: &str) -> Result<(), DriverError> {
        self.resolve_unique(query).await?;
        Ok(())
    }

    async fn swipe(&self, _direction: SwipeDirection) -> Result<(), DriverError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NullHost: a host that only counts calls
// ---------------------------------------------------------------------------

/// A host whose launches always "succeed" without any application behind
/// them. Pair it with a [`PhasedDriver`] when the test scripts the tree
/// directly.
#[derive(Default)]
pub struct NullHost {
    launches: AtomicU32,
    terminations: AtomicU32,
}

impl NullHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn launches(&self) -> u32 {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn terminations(&self) -> u32 {
        self.terminations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppHost for NullHost {
    async fn launch(&self, _request: &LaunchRequest) -> Result<(), HostError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn terminate(&self) -> Result<(), HostError> {
        self.terminations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PhasedDriver: one scripted tree per poll
// ---------------------------------------------------------------------------

/// Serves `phases[n]` for the n-th `dump_tree` call; the last phase repeats
/// forever. Records taps and typed text.
pub struct PhasedDriver {
    phases: Vec<Vec<UiElement>>,
    polls: AtomicU32,
    pub taps: Mutex<Vec<String>>,
    pub typed: Mutex<Vec<(String, String)>>,
}

impl PhasedDriver {
    pub fn new(phases: Vec<Vec<UiElement>>) -> Arc<Self> {
        assert!(!phases.is_empty(), "need at least one phase");
        Arc::new(Self {
            phases,
            polls: AtomicU32::new(0),
            taps: Mutex::new(Vec::new()),
            typed: Mutex::new(Vec::new()),
        })
    }

    /// A driver that always serves the same tree.
    pub fn fixed(tree: Vec<UiElement>) -> Arc<Self> {
        Self::new(vec![tree])
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UiDriver for PhasedDriver {
    async fn dump_tree(&self) -> Result<Vec<UiElement>, DriverError> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst) as usize;
        let idx = n.min(self.phases.len() - 1);
        Ok(self.phases[idx].clone())
    }

    async fn tap(&self, query: &ElementQuery) -> Result<(), DriverError> {
        let element = self.resolve_unique(query).await?;
        self.taps
            .lock()
            .unwrap()
            .push(element.identifier.unwrap_or_default());
        Ok(())
    }

    async fn tap_location(&self, _x: f64, _y: f64) -> Result<(), DriverError> {
        Ok(())
    }

    async fn type_text(&self, query: &ElementQuery, text: &str) -> Result<(), DriverError> {
        let element = self.resolve_unique(query).await?;
        self.typed
            .lock()
            .unwrap()
            .push((element.identifier.unwrap_or_default(), text.to_string()));
        Ok(())
    }

    async fn swipe(&self, _direction: SwipeDirection) -> Result<(), DriverError> {
        Ok(())
    }
}
