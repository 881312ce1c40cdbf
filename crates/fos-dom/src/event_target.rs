//! Native event listeners and dispatch
//!
//! Listeners are keyed by node and event type. Dispatch follows the DOM
//! order: capture from the top of the tree down to the target's parent,
//! the target itself, then bubble back up when the event bubbles.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use anyhow::Context;
use tracing::{debug, trace};

use crate::{DomError, DomTree, Event, EventPhase, NodeId};

/// Native listener callback
///
/// Identity is the `Rc` allocation: registering a clone of the same `Rc`
/// twice with the same capture flag is a no-op.
pub type NativeListener = Rc<dyn Fn(&DomTree, &mut Event) -> anyhow::Result<()>>;

#[derive(Clone)]
struct ListenerEntry {
    callback: NativeListener,
    capture: bool,
}

/// Listener registry stored on the tree
#[derive(Default)]
pub(crate) struct EventListenerMap {
    by_node: HashMap<NodeId, HashMap<String, Vec<ListenerEntry>>>,
}

impl fmt::Debug for EventListenerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.by_node.values()
            .flat_map(|types| types.values())
            .map(Vec::len)
            .sum();
        f.debug_struct("EventListenerMap")
            .field("nodes", &self.by_node.len())
            .field("listeners", &total)
            .finish()
    }
}

impl EventListenerMap {
    fn entries(&self, node: NodeId, event_type: &str) -> &[ListenerEntry] {
        self.by_node
            .get(&node)
            .and_then(|types| types.get(event_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
    
    fn snapshot(&self, node: NodeId, event_type: &str, capture: bool) -> Vec<NativeListener> {
        self.entries(node, event_type)
            .iter()
            .filter(|entry| entry.capture == capture)
            .map(|entry| Rc::clone(&entry.callback))
            .collect()
    }
}

impl DomTree {
    /// Register a native listener on `node`
    ///
    /// Returns `false` if the same listener was already registered with the
    /// same capture flag.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: NativeListener,
        capture: bool,
    ) -> Result<bool, DomError> {
        if !self.contains(node) {
            return Err(DomError::InvalidNode(node));
        }
        
        let entries = self.listeners.by_node
            .entry(node)
            .or_default()
            .entry(event_type.to_string())
            .or_default();
        if entries.iter().any(|e| e.capture == capture && Rc::ptr_eq(&e.callback, &listener)) {
            return Ok(false);
        }
        
        entries.push(ListenerEntry { callback: listener, capture });
        debug!("Added {} listener for {} on {:?}", if capture { "capture" } else { "bubble" }, event_type, node);
        Ok(true)
    }
    
    /// Remove a native listener; returns `false` if it was not registered
    pub fn remove_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: &NativeListener,
        capture: bool,
    ) -> bool {
        let Some(types) = self.listeners.by_node.get_mut(&node) else {
            return false;
        };
        let Some(entries) = types.get_mut(event_type) else {
            return false;
        };
        
        let before = entries.len();
        entries.retain(|e| !(e.capture == capture && Rc::ptr_eq(&e.callback, listener)));
        let removed = entries.len() < before;
        
        if entries.is_empty() {
            types.remove(event_type);
        }
        if types.is_empty() {
            self.listeners.by_node.remove(&node);
        }
        if removed {
            debug!("Removed {} listener for {} on {:?}", if capture { "capture" } else { "bubble" }, event_type, node);
        }
        removed
    }
    
    /// Number of listeners (both phases) registered on `node` for `event_type`
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners.entries(node, event_type).len()
    }
    
    /// Dispatch a native event at `event.target`
    ///
    /// Returns `Ok(false)` if a listener prevented the default action. The
    /// first listener error aborts dispatch and is returned.
    pub fn dispatch_event(&self, event: &mut Event) -> anyhow::Result<bool> {
        let target = event.target;
        if !self.contains(target) {
            return Err(DomError::InvalidNode(target).into());
        }
        
        // target first, top of the tree last
        let path: Vec<NodeId> = self.ancestors(target).collect();
        trace!("Dispatching {} at {:?} through {} nodes", event.event_type, target, path.len());
        
        let result = self.run_phases(&path, event);
        event.phase = EventPhase::None;
        event.current_target = None;
        result?;
        
        Ok(!event.is_default_prevented())
    }
    
    fn run_phases(&self, path: &[NodeId], event: &mut Event) -> anyhow::Result<()> {
        event.phase = EventPhase::Capturing;
        for &node in path.iter().skip(1).rev() {
            self.invoke(node, event, true)?;
            if event.is_propagation_stopped() {
                return Ok(());
            }
        }
        
        event.phase = EventPhase::AtTarget;
        self.invoke(path[0], event, true)?;
        if !event.is_immediate_propagation_stopped() {
            self.invoke(path[0], event, false)?;
        }
        if event.is_propagation_stopped() || !event.bubbles {
            return Ok(());
        }
        
        event.phase = EventPhase::Bubbling;
        for &node in path.iter().skip(1) {
            self.invoke(node, event, false)?;
            if event.is_propagation_stopped() {
                break;
            }
        }
        Ok(())
    }
    
    fn invoke(&self, node: NodeId, event: &mut Event, capture: bool) -> anyhow::Result<()> {
        let listeners = self.listeners.snapshot(node, &event.event_type, capture);
        if listeners.is_empty() {
            return Ok(());
        }
        
        event.current_target = Some(node);
        for listener in listeners {
            listener(self, event)
                .with_context(|| format!("{} listener on {:?} failed", event.event_type, node))?;
            if event.is_immediate_propagation_stopped() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    
    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> NativeListener {
        let log = Rc::clone(log);
        let label = label.to_string();
        Rc::new(move |_tree: &DomTree, event: &mut Event| -> anyhow::Result<()> {
            log.borrow_mut().push(format!("{}:{:?}", label, event.phase));
            Ok(())
        })
    }
    
    fn chain() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("button");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        (tree, outer, inner)
    }
    
    #[test]
    fn test_phase_order() {
        let (mut tree, outer, inner) = chain();
        let log = Rc::new(RefCell::new(Vec::new()));
        tree.add_event_listener(outer, "click", recorder(&log, "outer-bubble"), false).unwrap();
        tree.add_event_listener(outer, "click", recorder(&log, "outer-capture"), true).unwrap();
        tree.add_event_listener(inner, "click", recorder(&log, "inner"), false).unwrap();
        
        let mut event = Event::new("click", inner);
        assert!(tree.dispatch_event(&mut event).unwrap());
        
        assert_eq!(*log.borrow(), vec![
            "outer-capture:Capturing",
            "inner:AtTarget",
            "outer-bubble:Bubbling",
        ]);
        assert_eq!(event.phase, EventPhase::None);
        assert_eq!(event.current_target, None);
    }
    
    #[test]
    fn test_duplicate_listener_ignored() {
        let (mut tree, outer, _) = chain();
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder(&log, "l");
        
        assert!(tree.add_event_listener(outer, "click", Rc::clone(&listener), true).unwrap());
        assert!(!tree.add_event_listener(outer, "click", Rc::clone(&listener), true).unwrap());
        assert!(tree.add_event_listener(outer, "click", Rc::clone(&listener), false).unwrap());
        assert_eq!(tree.listener_count(outer, "click"), 2);
        
        assert!(tree.remove_event_listener(outer, "click", &listener, true));
        assert!(!tree.remove_event_listener(outer, "click", &listener, true));
        assert_eq!(tree.listener_count(outer, "click"), 1);
    }
    
    #[test]
    fn test_stop_propagation_in_capture() {
        let (mut tree, outer, inner) = chain();
        let log = Rc::new(RefCell::new(Vec::new()));
        let stopper: NativeListener = Rc::new(|_: &DomTree, event: &mut Event| -> anyhow::Result<()> {
            event.stop_propagation();
            Ok(())
        });
        tree.add_event_listener(outer, "click", stopper, true).unwrap();
        tree.add_event_listener(inner, "click", recorder(&log, "inner"), false).unwrap();
        
        tree.dispatch_event(&mut Event::new("click", inner)).unwrap();
        assert!(log.borrow().is_empty());
    }
    
    #[test]
    fn test_non_bubbling_event() {
        let (mut tree, outer, inner) = chain();
        let log = Rc::new(RefCell::new(Vec::new()));
        tree.add_event_listener(outer, "focus", recorder(&log, "outer"), false).unwrap();
        tree.add_event_listener(inner, "focus", recorder(&log, "inner"), false).unwrap();
        
        tree.dispatch_event(&mut Event::new("focus", inner).with_bubbles(false)).unwrap();
        assert_eq!(*log.borrow(), vec!["inner:AtTarget"]);
    }
    
    #[test]
    fn test_listener_error_aborts() {
        let (mut tree, outer, inner) = chain();
        let log = Rc::new(RefCell::new(Vec::new()));
        let failing: NativeListener = Rc::new(|_: &DomTree, _: &mut Event| -> anyhow::Result<()> {
            anyhow::bail!("boom")
        });
        tree.add_event_listener(inner, "click", failing, false).unwrap();
        tree.add_event_listener(outer, "click", recorder(&log, "outer"), false).unwrap();
        
        let err = tree.dispatch_event(&mut Event::new("click", inner)).unwrap_err();
        assert_eq!(err.root_cause().to_string(), "boom");
        assert!(log.borrow().is_empty());
    }
    
    #[test]
    fn test_prevent_default_result() {
        let (mut tree, _, inner) = chain();
        let cancel: NativeListener = Rc::new(|_: &DomTree, event: &mut Event| -> anyhow::Result<()> {
            event.prevent_default();
            Ok(())
        });
        tree.add_event_listener(inner, "submit", cancel, false).unwrap();
        
        assert!(!tree.dispatch_event(&mut Event::new("submit", inner)).unwrap());
    }
    
    #[test]
    fn test_dispatch_unknown_target() {
        let tree = DomTree::new();
        assert!(tree.dispatch_event(&mut Event::new("click", NodeId(42))).is_err());
    }
}
