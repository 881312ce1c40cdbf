//! Proxy Event
//!
//! Per-level view of a native event. Reads pass through to the native
//! [`Event`] via `Deref`; `current_target` and the bubbling flag belong to
//! the proxy alone.

use std::ops::Deref;

use fos_dom::{Event, NodeId};

/// Event handed to delegated handlers
///
/// A fresh proxy is built for every matched level of the walk, so stopping
/// bubbling never leaks into another dispatch.
#[derive(Debug)]
pub struct ProxyEvent<'a> {
    raw: &'a mut Event,
    current: NodeId,
    continue_bubbling: bool,
}

impl<'a> ProxyEvent<'a> {
    /// Wrap a native event; `current_target` starts as the native target
    pub fn new(raw: &'a mut Event) -> Self {
        let current = raw.target;
        Self {
            raw,
            current,
            continue_bubbling: true,
        }
    }
    
    /// Node whose handlers are running
    #[inline]
    pub fn current_target(&self) -> NodeId {
        self.current
    }
    
    pub fn set_current_target(&mut self, node: NodeId) {
        self.current = node;
    }
    
    /// Halt synthetic bubbling after the current level
    ///
    /// Does not touch native propagation.
    pub fn stop_bubbling(&mut self) {
        self.continue_bubbling = false;
    }
    
    /// Re-enable synthetic bubbling stopped earlier at this level
    pub fn start_bubbling(&mut self) {
        self.continue_bubbling = true;
    }
    
    /// Whether the walk continues past this level
    #[inline]
    pub fn is_bubbling(&self) -> bool {
        self.continue_bubbling
    }
    
    /// Prevent the native default action
    pub fn prevent_default(&mut self) {
        self.raw.prevent_default();
    }
    
    /// The native event, for its own propagation API
    pub fn native_mut(&mut self) -> &mut Event {
        &mut *self.raw
    }
}

impl Deref for ProxyEvent<'_> {
    type Target = Event;
    
    fn deref(&self) -> &Event {
        &*self.raw
    }
}
