//! Action types and logging for automation operations.
//!
//! This module defines the simulated user actions the harness can perform,
//! along with the [`ActionRecord`] type used to persist executed actions to
//! the session log.
//!
//! # Example
//!
//! ```
//! use paydrive_core::action::{Action, ActionRecord, ActionResult};
//! use paydrive_core::element::ElementQuery;
//!
//! let action = Action::Tap {
//!     query: ElementQuery::button("Pay"),
//! };
//! let record = ActionRecord::new(action, ActionResult::Success, None);
//! println!("{} at {}", record.id, record.timestamp);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::driver::SwipeDirection;
use crate::element::ElementQuery;

/// The result of executing an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActionResult {
    /// The action completed successfully.
    Success,
    /// The action failed with the given error message.
    Failure(String),
}

/// A simulated user action.
///
/// Serialized with a `type` tag discriminator for the JSON Lines session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Tap the unique element matching a query.
    Tap {
        /// The element to tap.
        query: ElementQuery,
    },

    /// Type text into the unique element matching a query.
    TypeText {
        /// The element to type into.
        query: ElementQuery,
        /// The text to type.
        text: String,
    },

    /// Tap at specific screen coordinates.
    TapLocation {
        /// The x-coordinate in screen points.
        x: f64,
        /// The y-coordinate in screen points.
        y: f64,
    },

    /// Swipe the screen in a direction.
    Swipe {
        /// Direction to swipe.
        direction: SwipeDirection,
    },

    /// Tap the landing screen's reload control.
    Reload,

    /// Cold-start the application with a fresh launch request.
    Launch,
}

impl Action {
    /// Returns a short, static name for this action suitable for tracing
    /// span metadata. Avoids Debug-formatting query payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Tap { .. } => "tap",
            Action::TypeText { .. } => "type_text",
            Action::TapLocation { .. } => "tap_location",
            Action::Swipe { .. } => "swipe",
            Action::Reload => "reload",
            Action::Launch => "launch",
        }
    }
}

/// A logged action with metadata.
///
/// Every action driven through a session is recorded with a unique id,
/// timestamp, the action details, its result, and how long it took including
/// any wait that gated it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Unique identifier for this record.
    pub id: Uuid,

    /// When the action was executed.
    pub timestamp: DateTime<Utc>,

    /// The action that was performed.
    pub action: Action,

    /// The result of the action.
    pub result: ActionResult,

    /// How long the action took, including any gating wait (milliseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ActionRecord {
    /// Creates a new record with a fresh id and the current timestamp.
    pub fn new(action: Action, result: ActionResult, duration_ms: Option<u64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action,
            result,
            duration_ms,
        }
    }
}
