//! DOM Events
//!
//! Native event object handed to listeners by [`DomTree::dispatch_event`](crate::DomTree::dispatch_event).

use crate::NodeId;

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

/// Modifier keys held during the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

/// Type-specific event properties
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventDetail {
    #[default]
    None,
    Mouse {
        client_x: f64,
        client_y: f64,
        screen_x: f64,
        screen_y: f64,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Key {
        key: String,
        code: String,
        repeat: bool,
        modifiers: Modifiers,
    },
    Custom(String),
}

/// Native DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    pub timestamp: f64,
    pub detail: EventDetail,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create a bubbling, cancelable event with no detail
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            phase: EventPhase::None,
            bubbles: true,
            cancelable: true,
            timestamp: 0.0,
            detail: EventDetail::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }
    
    /// Create a mouse event at client coordinates
    pub fn mouse(event_type: &str, target: NodeId, client_x: f64, client_y: f64) -> Self {
        Self::new(event_type, target).with_detail(EventDetail::Mouse {
            client_x,
            client_y,
            screen_x: client_x,
            screen_y: client_y,
            button: MouseButton::Primary,
            modifiers: Modifiers::default(),
        })
    }
    
    /// Create a keyboard event
    pub fn key(event_type: &str, target: NodeId, key: &str) -> Self {
        Self::new(event_type, target).with_detail(EventDetail::Key {
            key: key.to_string(),
            code: String::new(),
            repeat: false,
            modifiers: Modifiers::default(),
        })
    }
    
    /// Replace the detail payload
    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }
    
    /// Set whether the event bubbles
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }
    
    /// Set whether the event is cancelable
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }
    
    /// Set the event timestamp (ms)
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
    
    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }
    
    /// Stop propagation to further nodes
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
    
    /// Stop propagation, including remaining listeners on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
    
    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
    
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
    
    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
    
    /// Client coordinates for mouse events
    pub fn client_position(&self) -> Option<(f64, f64)> {
        match self.detail {
            EventDetail::Mouse { client_x, client_y, .. } => Some((client_x, client_y)),
            _ => None,
        }
    }
    
    /// Key value for keyboard events
    pub fn key_value(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Key { key, .. } => Some(key),
            _ => None,
        }
    }
}
