//! Delegator
//!
//! One capture listener per event name on the root node, with bubbling
//! re-derived by walking up from the native target.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, DomTree, Event, NativeListener, NodeId};
use tracing::{debug, trace, warn};

use crate::handler::{call_all, insert_unique, remove_handler};
use crate::{DataSet, DelegatorConfig, DelegatorError, EventKey, Handler, HandlerResult, ProxyEvent};

/// State read by the root listeners while dispatching
#[derive(Debug, Default)]
struct Registry {
    data: DataSet,
    global: HashMap<String, Vec<Handler>>,
}

/// Event delegator bound to one root node
///
/// Handlers may register or unregister other handlers while running; no
/// registry borrow is held across a handler call.
pub struct Delegator {
    target: NodeId,
    events: HashSet<String>,
    raw_listeners: HashMap<String, NativeListener>,
    registry: Rc<RefCell<Registry>>,
}

impl Delegator {
    /// Create a delegator for `root` without listening to anything
    pub fn new(root: NodeId) -> Self {
        Self {
            target: root,
            events: HashSet::new(),
            raw_listeners: HashMap::new(),
            registry: Rc::default(),
        }
    }
    
    /// Create a delegator for `root` and apply `config`
    pub fn with_config(
        tree: &mut DomTree,
        root: NodeId,
        config: &DelegatorConfig,
    ) -> Result<Self, DelegatorError> {
        let mut delegator = Self::new(root);
        for event_name in config.initial_events() {
            delegator.listen_to(tree, event_name)?;
        }
        Ok(delegator)
    }
    
    /// Create a delegator rooted at the document's `<html>` element
    pub fn for_document(doc: &mut Document, config: &DelegatorConfig) -> Result<Self, DelegatorError> {
        let root = doc.document_element();
        Self::with_config(doc.tree_mut(), root, config)
    }
    
    /// Node every native listener is attached to
    #[inline]
    pub fn root(&self) -> NodeId {
        self.target
    }
    
    /// Whether a native listener is attached for `event_name`
    pub fn is_listening(&self, event_name: &str) -> bool {
        self.events.contains(event_name)
    }
    
    /// Event names with a live native listener
    pub fn listened_events(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(String::as_str)
    }
    
    /// The root listener built for `event_name`, if one was ever built
    pub fn raw_listener(&self, event_name: &str) -> Option<&NativeListener> {
        self.raw_listeners.get(event_name)
    }
    
    /// Start delegating `event_name`; no-op if already delegated
    pub fn listen_to(&mut self, tree: &mut DomTree, event_name: &str) -> Result<(), DelegatorError> {
        if self.events.contains(event_name) {
            return Ok(());
        }
        
        let listener = match self.raw_listeners.get(event_name) {
            Some(listener) => Rc::clone(listener),
            None => self.create_handler(event_name),
        };
        
        // memoize only after a successful attach
        tree.add_event_listener(self.target, event_name, Rc::clone(&listener), true)?;
        self.raw_listeners.entry(event_name.to_string()).or_insert(listener);
        self.events.insert(event_name.to_string());
        debug!("Listening to {} on {:?}", event_name, self.target);
        Ok(())
    }
    
    /// Stop delegating `event_name`; no-op if not currently delegated
    ///
    /// Fails if no root listener was ever built for `event_name`, which
    /// means it was never listened to.
    pub fn unlisten_to(&mut self, tree: &mut DomTree, event_name: &str) -> Result<(), DelegatorError> {
        let Some(listener) = self.raw_listeners.get(event_name) else {
            warn!("Cannot unlisten to {}: never listened", event_name);
            return Err(DelegatorError::CannotUnlisten { event: event_name.to_string() });
        };
        if !self.events.remove(event_name) {
            return Ok(());
        }
        
        tree.remove_event_listener(self.target, event_name, listener, true);
        debug!("Stopped listening to {} on {:?}", event_name, self.target);
        Ok(())
    }
    
    /// Register `handler` on `node` for an event name or [`EventKey::Any`]
    ///
    /// Returns `false` if the handler was already registered there.
    pub fn add_event_listener(&self, node: NodeId, key: impl Into<EventKey>, handler: Handler) -> bool {
        self.registry.borrow_mut().data.add(node, key.into(), handler)
    }
    
    /// Unregister `handler` from `node`; returns `false` if it was absent
    pub fn remove_event_listener(&self, node: NodeId, key: impl Into<EventKey>, handler: &Handler) -> bool {
        self.registry.borrow_mut().data.remove(node, &key.into(), handler)
    }
    
    /// Drop every handler registered on `node`
    pub fn clear_node(&self, node: NodeId) {
        self.registry.borrow_mut().data.clear(node);
    }
    
    /// Register a handler run once per native `event_name`, before any node handler
    ///
    /// Returns `false` if the handler was already registered.
    pub fn add_global_event_listener(&self, event_name: &str, handler: Handler) -> bool {
        let mut registry = self.registry.borrow_mut();
        let list = registry.global.entry(event_name.to_string()).or_default();
        insert_unique(list, handler)
    }
    
    /// Unregister a global handler; returns `false` if it was absent
    pub fn remove_global_event_listener(&self, event_name: &str, handler: &Handler) -> bool {
        let mut registry = self.registry.borrow_mut();
        match registry.global.get_mut(event_name) {
            Some(list) => remove_handler(list, handler),
            None => false,
        }
    }
    
    fn create_handler(&self, event_name: &str) -> NativeListener {
        let registry = Rc::clone(&self.registry);
        let root = self.target;
        let event_name = event_name.to_string();
        
        Rc::new(move |tree: &DomTree, ev: &mut Event| -> HandlerResult {
            let global = registry.borrow()
                .global
                .get(&event_name)
                .cloned()
                .unwrap_or_default();
            if !global.is_empty() {
                let mut global_event = ProxyEvent::new(ev);
                global_event.set_current_target(root);
                call_all(&global, &mut global_event)?;
            }
            
            let target = ev.target;
            find_and_invoke_listeners(&registry, tree, target, ev, &event_name)
        })
    }
}

/// Walk from `start` toward the top of the tree, invoking each matched level
fn find_and_invoke_listeners(
    registry: &RefCell<Registry>,
    tree: &DomTree,
    start: NodeId,
    ev: &mut Event,
    event_name: &str,
) -> HandlerResult {
    let mut next = Some(start);
    while let Some(elem) = next {
        let listener = registry.borrow().data.lookup(tree, elem, event_name);
        let Some(listener) = listener else {
            break;
        };
        
        let mut listener_event = ProxyEvent::new(ev);
        listener_event.set_current_target(listener.current_target);
        call_all(&listener.handlers, &mut listener_event)?;
        
        if !listener_event.is_bubbling() {
            trace!("Bubbling of {} stopped at {:?}", event_name, listener.current_target);
            break;
        }
        next = tree.parent(listener.current_target);
    }
    Ok(())
}

impl fmt::Debug for Delegator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegator")
            .field("target", &self.target)
            .field("events", &self.events)
            .field("raw_listeners", &self.raw_listeners.keys().collect::<Vec<_>>())
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn doc_with_button() -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let button = doc.append_element(body, "button").unwrap();
        (doc, button)
    }
    
    #[test]
    fn test_listen_is_idempotent() {
        let (mut doc, _) = doc_with_button();
        let root = doc.document_element();
        let mut delegator = Delegator::new(root);
        
        delegator.listen_to(doc.tree_mut(), "click").unwrap();
        delegator.listen_to(doc.tree_mut(), "click").unwrap();
        
        assert!(delegator.is_listening("click"));
        assert_eq!(doc.tree().listener_count(root, "click"), 1);
    }
    
    #[test]
    fn test_unlisten_without_listen_fails() {
        let (mut doc, _) = doc_with_button();
        let mut delegator = Delegator::new(doc.document_element());
        
        let err = delegator.unlisten_to(doc.tree_mut(), "click").unwrap_err();
        assert!(matches!(err, DelegatorError::CannotUnlisten { ref event } if event == "click"));
    }
    
    #[test]
    fn test_double_unlisten_is_noop() {
        let (mut doc, _) = doc_with_button();
        let root = doc.document_element();
        let mut delegator = Delegator::new(root);
        
        delegator.listen_to(doc.tree_mut(), "click").unwrap();
        delegator.unlisten_to(doc.tree_mut(), "click").unwrap();
        delegator.unlisten_to(doc.tree_mut(), "click").unwrap();
        
        assert!(!delegator.is_listening("click"));
        assert_eq!(doc.tree().listener_count(root, "click"), 0);
    }
    
    #[test]
    fn test_listen_to_invalid_root() {
        let mut tree = DomTree::new();
        let mut delegator = Delegator::new(NodeId(42));
        
        assert!(matches!(
            delegator.listen_to(&mut tree, "click"),
            Err(DelegatorError::Dom(_))
        ));
        assert!(!delegator.is_listening("click"));
    }
    
    #[test]
    fn test_unlisten_after_failed_listen_fails() {
        let mut tree = DomTree::new();
        let mut delegator = Delegator::new(NodeId(42));
        
        assert!(delegator.listen_to(&mut tree, "click").is_err());
        assert!(delegator.raw_listener("click").is_none());
        assert!(matches!(
            delegator.unlisten_to(&mut tree, "click"),
            Err(DelegatorError::CannotUnlisten { .. })
        ));
    }
    
    #[test]
    fn test_global_registration_is_a_set() {
        let delegator = Delegator::new(NodeId::ROOT);
        let h = Handler::from_fn(|_| Ok(()));
        
        assert!(delegator.add_global_event_listener("click", h.clone()));
        assert!(!delegator.add_global_event_listener("click", h.clone()));
        assert!(delegator.remove_global_event_listener("click", &h));
        assert!(!delegator.remove_global_event_listener("click", &h));
        assert!(!delegator.remove_global_event_listener("keydown", &h));
    }
    
    #[test]
    fn test_with_config_listens_to_defaults() {
        let mut doc = Document::default();
        let delegator = Delegator::for_document(&mut doc, &DelegatorConfig::default()).unwrap();
        
        assert_eq!(delegator.root(), doc.document_element());
        assert_eq!(delegator.listened_events().count(), crate::COMMON_EVENTS.len());
        assert_eq!(doc.tree().listener_count(delegator.root(), "submit"), 1);
    }
    
    #[test]
    fn test_clear_node() {
        let (mut doc, button) = doc_with_button();
        let mut delegator = Delegator::new(doc.document_element());
        delegator.listen_to(doc.tree_mut(), "click").unwrap();
        
        let hits = Rc::new(std::cell::Cell::new(0));
        let counted = Rc::clone(&hits);
        delegator.add_event_listener(button, "click", Handler::from_fn(move |_| {
            counted.set(counted.get() + 1);
            Ok(())
        }));
        delegator.clear_node(button);
        
        doc.tree().dispatch_event(&mut Event::new("click", button)).unwrap();
        assert_eq!(hits.get(), 0);
    }
}
