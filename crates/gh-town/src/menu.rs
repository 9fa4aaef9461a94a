//! Menu item descriptors handed to the UI layer.

use serde::{Deserialize, Serialize};

/// Rendering hint for a menu item. Consumed only by the UI layer; the core
/// state machine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Fires immediately (possibly via a confirm step).
    Action,
    /// Multi-step selection flow.
    Wizard,
    /// Opens a listing first.
    List,
    /// Opens an input panel.
    Panel,
}

/// An immutable descriptor of one selectable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Action id to pass to `execute_service`.
    pub id: String,
    /// Display label.
    pub label: String,
    /// One-line description.
    pub description: String,
    /// Whether the service is currently selectable.
    pub enabled: bool,
    /// Rendering hint.
    pub service_type: ServiceType,
}

impl MenuItem {
    /// Create an enabled menu item with an empty description.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        service_type: ServiceType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            enabled: true,
            service_type,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
