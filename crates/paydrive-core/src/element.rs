//! Shared UI element types for accessibility-based automation.
//!
//! This module defines the data structures representing UI elements from the
//! application's accessibility tree, plus the typed [`ElementQuery`] used to
//! locate them. Queries are logical descriptions, not handles: they are
//! re-resolved against the live tree on every access, so they stay valid
//! across application reloads.

use serde::{Deserialize, Serialize};

/// The accessibility role of a UI element.
///
/// Closed set: every element the harness can address falls into one of these
/// roles. Elements the backend cannot classify are reported as [`Role::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A tappable button.
    Button,
    /// A plain text input field.
    TextField,
    /// A text input field with obscured contents (e.g., CVC).
    SecureTextField,
    /// Non-interactive text.
    StaticText,
    /// An on/off toggle.
    Switch,
    /// A picker / segmented selection control.
    Picker,
    /// An embedded web view.
    WebView,
    /// A row in a list or table.
    Cell,
    /// An image.
    Image,
    /// Anything the backend could not classify.
    Other,
}

impl Role {
    /// Returns a short, static name for this role suitable for log output.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::TextField => "text_field",
            Role::SecureTextField => "secure_text_field",
            Role::StaticText => "static_text",
            Role::Switch => "switch",
            Role::Picker => "picker",
            Role::WebView => "web_view",
            Role::Cell => "cell",
            Role::Image => "image",
            Role::Other => "other",
        }
    }
}

/// A logical query for a UI element: role plus accessible name, with an
/// optional container scope.
///
/// The `name` matches either the accessibility identifier or the visible
/// label of an element. `scope`, when set, restricts the search to the
/// subtree rooted at the element whose identifier equals the scope string.
///
/// Equality is structural: two queries with the same role, name, and scope
/// are the same query. There is no cached handle and no persistent identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementQuery {
    /// The role the matched element must have.
    pub role: Role,
    /// Accessibility identifier or label to match exactly.
    pub name: String,
    /// Optional identifier of a container element to scope the search to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl ElementQuery {
    /// Creates a query for an element with the given role and name.
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            scope: None,
        }
    }

    /// Query for a button by name.
    pub fn button(name: impl Into<String>) -> Self {
        Self::new(Role::Button, name)
    }

    /// Query for a text field by name.
    pub fn text_field(name: impl Into<String>) -> Self {
        Self::new(Role::TextField, name)
    }

    /// Query for a secure text field by name.
    pub fn secure_text_field(name: impl Into<String>) -> Self {
        Self::new(Role::SecureTextField, name)
    }

    /// Query for static text by its content or identifier.
    pub fn static_text(name: impl Into<String>) -> Self {
        Self::new(Role::StaticText, name)
    }

    /// Query for a switch by name.
    pub fn switch(name: impl Into<String>) -> Self {
        Self::new(Role::Switch, name)
    }

    /// Restricts the query to the subtree under the container with the given
    /// identifier.
    pub fn within(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Returns true if the given element satisfies this query's role and name.
    ///
    /// The name matches against the identifier first, then the label. Scope
    /// is not checked here; scoping happens during tree traversal.
    pub fn matches(&self, element: &UiElement) -> bool {
        if element.role != self.role {
            return false;
        }
        element.identifier.as_deref() == Some(self.name.as_str())
            || element.label.as_deref() == Some(self.name.as_str())
    }
}

impl std::fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{} '{}' in '{}'", self.role.name(), self.name, scope),
            None => write!(f, "{} '{}'", self.role.name(), self.name),
        }
    }
}

/// A UI element from the accessibility hierarchy.
///
/// Elements form a tree via the `children` field. The harness never holds on
/// to elements across actions; each query re-reads the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiElement {
    /// The unique accessibility identifier, if the element has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// The accessibility label, typically the user-visible text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// The current value, e.g. text field contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// The element's role.
    pub role: Role,

    /// The element's frame in screen points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<ElementFrame>,

    /// Whether the element can currently receive input. `None` means the
    /// backend does not report hittability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hittable: Option<bool>,

    /// Whether the element is enabled. `None` means not reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Child elements nested within this element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UiElement>,
}

impl UiElement {
    /// Creates a leaf element with the given role and identifier.
    ///
    /// The label defaults to the identifier, hittable and enabled to `true`.
    /// Primarily useful for backends and tests building trees by hand.
    pub fn leaf(role: Role, identifier: impl Into<String>) -> Self {
        let id = identifier.into();
        Self {
            identifier: Some(id.clone()),
            label: Some(id),
            value: None,
            role,
            frame: None,
            hittable: Some(true),
            enabled: Some(true),
            children: Vec::new(),
        }
    }

    /// Sets the element's value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the element's hittable flag.
    pub fn with_hittable(mut self, hittable: bool) -> Self {
        self.hittable = Some(hittable);
        self
    }

    /// Adds child elements.
    pub fn with_children(mut self, children: Vec<UiElement>) -> Self {
        self.children = children;
        self
    }

    /// Returns true if the element is present and able to receive input.
    ///
    /// A missing hittable report counts as hittable: backends that don't
    /// track the flag only surface elements that are on screen.
    pub fn is_hittable(&self) -> bool {
        self.hittable != Some(false) && self.enabled != Some(false)
    }
}

/// The frame (position and dimensions) of a UI element, in screen points
/// with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementFrame {
    /// The x-coordinate of the element's top-left corner.
    pub x: f64,
    /// The y-coordinate of the element's top-left corner.
    pub y: f64,
    /// The width of the element in points.
    pub width: f64,
    /// The height of the element in points.
    pub height: f64,
}
