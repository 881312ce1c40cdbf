//! Document - High-level document API

use crate::{DomError, DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with `html`, `head` and `body`
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        
        let root = tree.root();
        tree.link_last_child(root, html);
        tree.link_last_child(html, head);
        tree.link_last_child(html, body);
        
        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }
    
    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }
    
    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }
    
    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }
    
    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }
    
    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }
    
    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
