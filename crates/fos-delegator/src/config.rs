//! Delegator Configuration

use serde::{Deserialize, Serialize};

/// Events delegated by default
pub const COMMON_EVENTS: &[&str] = &[
    "blur", "change", "click", "contextmenu", "dblclick",
    "error", "focus", "focusin", "focusout", "input",
    "keydown", "keypress", "keyup", "load", "mousedown",
    "mouseup", "resize", "select", "submit", "touchcancel",
    "touchend", "touchstart", "unload",
];

/// Delegator configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegatorConfig {
    /// Listen to `events` as soon as the delegator is built
    pub default_events: bool,
    
    /// Event names delegated at construction
    pub events: Vec<String>,
}

impl DelegatorConfig {
    /// Configuration that attaches nothing up front
    pub fn manual() -> Self {
        Self {
            default_events: false,
            events: Vec::new(),
        }
    }
    
    /// Event names to listen to at construction
    pub fn initial_events(&self) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .map(String::as_str)
            .filter(move |_| self.default_events)
    }
}

impl Default for DelegatorConfig {
    fn default() -> Self {
        Self {
            default_events: true,
            events: COMMON_EVENTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
