//! Node-local handler storage
//!
//! Each node carries a small map from [`EventKey`] to an ordered, duplicate
//! free list of handlers. [`DataSet::lookup`] resolves the nearest node (self
//! or ancestor) with anything registered for an event.

use std::collections::HashMap;

use fos_dom::{DomTree, NodeId};
use tracing::trace;

use crate::handler::{insert_unique, remove_handler};
use crate::Handler;

/// Storage key for node handlers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// Handlers for one event name
    Named(String),
    /// Catch-all handlers, run for every event name
    Any,
}

impl EventKey {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Result of a handler lookup for one tree level
#[derive(Debug, Clone)]
pub struct Listener {
    /// Node the handlers were found on
    pub current_target: NodeId,
    /// Named handlers followed by catch-all handlers
    pub handlers: Vec<Handler>,
}

#[derive(Debug, Default)]
struct NodeHandlers {
    named: HashMap<String, Vec<Handler>>,
    any: Vec<Handler>,
}

impl NodeHandlers {
    fn list_mut(&mut self, key: EventKey) -> &mut Vec<Handler> {
        match key {
            EventKey::Named(name) => self.named.entry(name).or_default(),
            EventKey::Any => &mut self.any,
        }
    }
    
    fn is_empty(&self) -> bool {
        self.named.is_empty() && self.any.is_empty()
    }
}

/// Handler storage for every node of one tree
#[derive(Debug, Default)]
pub struct DataSet {
    nodes: HashMap<NodeId, NodeHandlers>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register `handler` on `node`; a handler already present is left alone
    pub fn add(&mut self, node: NodeId, key: EventKey, handler: Handler) -> bool {
        let list = self.nodes.entry(node).or_default().list_mut(key);
        insert_unique(list, handler)
    }
    
    /// Unregister `handler` from `node`; absent handlers are ignored
    pub fn remove(&mut self, node: NodeId, key: &EventKey, handler: &Handler) -> bool {
        let Some(entry) = self.nodes.get_mut(&node) else {
            return false;
        };
        
        let removed = match key {
            EventKey::Named(name) => match entry.named.get_mut(name) {
                Some(list) => {
                    let removed = remove_handler(list, handler);
                    if list.is_empty() {
                        entry.named.remove(name);
                    }
                    removed
                }
                None => false,
            },
            EventKey::Any => remove_handler(&mut entry.any, handler),
        };
        
        if entry.is_empty() {
            self.nodes.remove(&node);
        }
        removed
    }
    
    /// Handlers registered on `node` under `key`
    pub fn get(&self, node: NodeId, key: &EventKey) -> &[Handler] {
        let Some(entry) = self.nodes.get(&node) else {
            return &[];
        };
        match key {
            EventKey::Named(name) => entry.named.get(name).map(Vec::as_slice).unwrap_or(&[]),
            EventKey::Any => &entry.any,
        }
    }
    
    /// Drop every handler registered on `node`
    pub fn clear(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }
    
    /// Find the nearest node, starting at `start`, with handlers for `event_type`
    ///
    /// Nodes with neither named nor catch-all handlers are skipped. Returns
    /// `None` once the walk runs past the top of the tree.
    pub fn lookup(&self, tree: &DomTree, start: NodeId, event_type: &str) -> Option<Listener> {
        tree.ancestors(start).find_map(|node| {
            let entry = self.nodes.get(&node)?;
            let named = entry.named.get(event_type).map(Vec::as_slice).unwrap_or(&[]);
            if named.is_empty() && entry.any.is_empty() {
                return None;
            }
            
            trace!("Found {} handlers for {} on {:?}", named.len() + entry.any.len(), event_type, node);
            let handlers = named.iter().chain(&entry.any).cloned().collect();
            Some(Listener { current_target: node, handlers })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn noop() -> Handler {
        Handler::from_fn(|_| Ok(()))
    }
    
    fn chain() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let a = tree.create_element("section");
        let b = tree.create_element("div");
        let c = tree.create_element("button");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(b, c).unwrap();
        (tree, a, b, c)
    }
    
    #[test]
    fn test_add_is_idempotent() {
        let mut data = DataSet::new();
        let h = noop();
        
        assert!(data.add(NodeId(1), "click".into(), h.clone()));
        assert!(!data.add(NodeId(1), "click".into(), h.clone()));
        assert_eq!(data.get(NodeId(1), &"click".into()).len(), 1);
        
        // the same handler under another key is a separate registration
        assert!(data.add(NodeId(1), EventKey::Any, h));
        assert_eq!(data.get(NodeId(1), &EventKey::Any).len(), 1);
    }
    
    #[test]
    fn test_remove_drops_empty_entries() {
        let mut data = DataSet::new();
        let h = noop();
        data.add(NodeId(1), "click".into(), h.clone());
        
        assert!(!data.remove(NodeId(1), &EventKey::Any, &h));
        assert!(data.remove(NodeId(1), &"click".into(), &h));
        assert!(!data.remove(NodeId(1), &"click".into(), &h));
        assert!(data.nodes.is_empty());
    }
    
    #[test]
    fn test_lookup_skips_empty_nodes() {
        let (tree, a, _, c) = chain();
        let mut data = DataSet::new();
        let h = noop();
        data.add(a, "click".into(), h.clone());
        
        let listener = data.lookup(&tree, c, "click").unwrap();
        assert_eq!(listener.current_target, a);
        assert_eq!(listener.handlers, vec![h]);
        
        assert!(data.lookup(&tree, c, "keydown").is_none());
    }
    
    #[test]
    fn test_lookup_orders_named_before_any() {
        let (tree, _, b, c) = chain();
        let mut data = DataSet::new();
        let any = noop();
        let click = noop();
        data.add(b, EventKey::Any, any.clone());
        data.add(b, "click".into(), click.clone());
        
        let listener = data.lookup(&tree, c, "click").unwrap();
        assert_eq!(listener.current_target, b);
        assert_eq!(listener.handlers, vec![click, any.clone()]);
        
        let listener = data.lookup(&tree, c, "input").unwrap();
        assert_eq!(listener.handlers, vec![any]);
    }
    
    #[test]
    fn test_lookup_from_detached_node() {
        let (mut tree, a, _, _) = chain();
        let orphan = tree.create_element("p");
        let mut data = DataSet::new();
        data.add(a, EventKey::Any, noop());
        
        assert!(data.lookup(&tree, orphan, "click").is_none());
        assert!(data.lookup(&tree, NodeId(999), "click").is_none());
    }
}
