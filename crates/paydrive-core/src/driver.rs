//! Automation driver trait for backend-agnostic UI automation.
//!
//! This module defines the [`UiDriver`] trait, the seam between the harness
//! and whatever actually renders the application under test (a device
//! automation agent, a webview bridge, or the in-process mock playground
//! used by the hermetic suites). The dispatcher, reload controller, and
//! session all consume this trait and never a concrete backend.
//!
//! The trait includes default implementations for element lookup that fetch
//! the full hierarchy via [`dump_tree`](UiDriver::dump_tree) and search
//! locally. Backends with server-side search can override them.

use async_trait::async_trait;
use thiserror::Error;

use crate::element::{ElementQuery, UiElement};

/// Errors that can occur during driver operations.
///
/// Unifies errors from all backends behind a single type so consumers can
/// handle them uniformly.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A command or operation failed with the given message.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// The backend is not available or the application is not running.
    #[error("Application is not running")]
    NotRunning,

    /// A query matched zero or multiple elements when exactly one was
    /// expected. Indicates a harness or query bug, not transient flakiness;
    /// never retried.
    #[error("Query {query} matched {count} elements, expected exactly one")]
    Ambiguous {
        /// The query that was resolved.
        query: String,
        /// How many elements it matched.
        count: usize,
    },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse data received from the backend.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Direction of a swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SwipeDirection {
    /// Swipe up (scrolls content down).
    Up,
    /// Swipe down (scrolls content up, dismisses keyboards).
    Down,
    /// Swipe left.
    Left,
    /// Swipe right.
    Right,
}

impl SwipeDirection {
    /// Returns a short, static name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

/// Recursively collects every element in the tree matching the query.
///
/// Scoped queries only match inside the subtree rooted at the element whose
/// identifier equals the scope string; the scope element itself is not a
/// candidate.
pub fn search_tree(elements: &[UiElement], query: &ElementQuery) -> Vec<UiElement> {
    let mut matches = Vec::new();
    match &query.scope {
        Some(scope) => {
            for root in find_scopes(elements, scope) {
                collect_matches(&root.children, query, &mut matches);
            }
        }
        None => collect_matches(elements, query, &mut matches),
    }
    matches
}

fn collect_matches(elements: &[UiElement], query: &ElementQuery, out: &mut Vec<UiElement>) {
    for element in elements {
        if query.matches(element) {
            out.push(element.clone());
        }
        collect_matches(&element.children, query, out);
    }
}

fn find_scopes<'a>(elements: &'a [UiElement], scope: &str) -> Vec<&'a UiElement> {
    let mut found = Vec::new();
    collect_scopes(elements, scope, &mut found);
    found
}

fn collect_scopes<'a>(elements: &'a [UiElement], scope: &str, out: &mut Vec<&'a UiElement>) {
    for element in elements {
        if element.identifier.as_deref() == Some(scope) {
            out.push(element);
        }
        collect_scopes(&element.children, scope, out);
    }
}

/// Flattens a hierarchy into a list of addressable elements.
///
/// Elements with neither identifier nor label are excluded; they are
/// typically layout containers with nothing to act on.
pub fn flatten_tree(elements: &[UiElement]) -> Vec<UiElement> {
    let mut result = Vec::new();
    collect_flat(elements, &mut result);
    result
}

fn collect_flat(elements: &[UiElement], result: &mut Vec<UiElement>) {
    for element in elements {
        if element.identifier.is_some() || element.label.is_some() {
            result.push(element.clone());
        }
        collect_flat(&element.children, result);
    }
}

/// Trait for backend-agnostic UI automation.
///
/// Implementors provide the raw capabilities (tapping, typing, swiping,
/// hierarchy inspection); the harness layers waiting, retry, and logging on
/// top. All methods that touch the application are async so that both
/// blocking CLI backends (wrapped in `spawn_blocking`) and in-process
/// backends fit the same seam.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Get the full UI element hierarchy of the current screen.
    async fn dump_tree(&self) -> Result<Vec<UiElement>, DriverError>;

    /// Tap the unique element matching the query.
    ///
    /// Backends must fail with [`DriverError::Ambiguous`] when the query does
    /// not resolve to exactly one element at tap time.
    async fn tap(&self, query: &ElementQuery) -> Result<(), DriverError>;

    /// Tap at specific screen coordinates.
    async fn tap_location(&self, x: f64, y: f64) -> Result<(), DriverError>;

    /// Type text into the unique element matching the query.
    ///
    /// The element is focused first if the backend distinguishes focus.
    async fn type_text(&self, query: &ElementQuery, text: &str) -> Result<(), DriverError>;

    /// Perform a swipe gesture across the screen.
    async fn swipe(&self, direction: SwipeDirection) -> Result<(), DriverError>;

    /// Find every element matching the query.
    ///
    /// The default implementation dumps the tree and searches locally.
    async fn query(&self, query: &ElementQuery) -> Result<Vec<UiElement>, DriverError> {
        let tree = self.dump_tree().await?;
        Ok(search_tree(&tree, query))
    }

    /// Resolve the query to exactly one element.
    ///
    /// # Errors
    ///
    /// [`DriverError::Ambiguous`] when the query matches zero or more than
    /// one element.
    async fn resolve_unique(&self, query: &ElementQuery) -> Result<UiElement, DriverError> {
        let mut matches = self.query(query).await?;
        if matches.len() != 1 {
            return Err(DriverError::Ambiguous {
                query: query.to_string(),
                count: matches.len(),
            });
        }
        Ok(matches.remove(0))
    }

    /// Returns true if at least one element matches the query.
    async fn exists(&self, query: &ElementQuery) -> Result<bool, DriverError> {
        Ok(!self.query(query).await?.is_empty())
    }

    /// Returns true if exactly one element matches and can receive input.
    ///
    /// Distinct from [`exists`](Self::exists): an element can be in the tree
    /// before it is tappable (mid-animation, obscured, disabled).
    async fn is_hittable(&self, query: &ElementQuery) -> Result<bool, DriverError> {
        let matches = self.query(query).await?;
        Ok(matches.len() == 1 && matches[0].is_hittable())
    }

    /// Get a flattened list of addressable elements on the current screen.
    async fn list_elements(&self) -> Result<Vec<UiElement>, DriverError> {
        let tree = self.dump_tree().await?;
        Ok(flatten_tree(&tree))
    }
}
