//! DOM Tree (arena-based allocation)

use crate::event_target::EventListenerMap;
use crate::{DomError, Node, NodeId};

/// Arena-based DOM tree for memory efficiency
///
/// Node 0 is always the document node. Nodes are never freed; a removed
/// subtree stays in the arena detached from the document.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    pub(crate) listeners: EventListenerMap,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            listeners: EventListenerMap::default(),
        }
    }
    
    /// Document node ID
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }
    
    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }
    
    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }
    
    /// Check that `id` names a node in this tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }
    
    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    
    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    
    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }
    
    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }
    
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
    
    /// Parent of `id`, or `None` at the top of the tree
    ///
    /// Unknown ids also answer `None`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .map(|node| node.parent)
            .filter(|parent| parent.is_valid())
    }
    
    /// Iterate from `id` up to the top of the tree, `id` included
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.contains(id).then_some(id),
        }
    }
    
    /// Iterate the direct children of `id`
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        let mut next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        std::iter::from_fn(move || {
            let node = self.get(next)?;
            let current = next;
            next = node.next_sibling;
            Some((current, node))
        })
    }
    
    /// Append `child` as the last child of `parent`
    ///
    /// A child that already has a parent is moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(DomError::InvalidNode(id));
            }
        }
        if child == NodeId::ROOT || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        
        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child)?;
        }
        
        self.link_last_child(parent, child);
        Ok(())
    }
    
    /// Link a detached `child` after the last child of `parent`
    ///
    /// Both ids must be in the arena and `child` must not be an ancestor of
    /// `parent`; `append_child` checks this, fresh nodes satisfy it trivially.
    pub(crate) fn link_last_child(&mut self, parent: NodeId, child: NodeId) {
        let prev = self.nodes[parent.0 as usize].last_child;
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = NodeId::NONE;
        }
        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;
    }
    
    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.contains(parent) {
            return Err(DomError::InvalidNode(parent));
        }
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        
        let (prev, next) = {
            let node = &mut self.nodes[child.0 as usize];
            let links = (node.prev_sibling, node.next_sibling);
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
            links
        };
        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive ancestor iterator, see [`DomTree::ancestors`]
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;
    
    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
