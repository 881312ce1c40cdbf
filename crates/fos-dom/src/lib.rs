//! fOS DOM - Document Object Model
//!
//! Arena DOM tree with native event listeners and capture/target/bubble
//! dispatch.

mod node;
mod tree;
mod document;
mod dom_events;
mod event_target;

pub use node::{Node, NodeData, ElementData};
pub use tree::{DomTree, Ancestors};
pub use document::Document;
pub use dom_events::{Event, EventDetail, EventPhase, Modifiers, MouseButton};
pub use event_target::NativeListener;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// "No node" sentinel used in arena links
    pub const NONE: NodeId = NodeId(u32::MAX);
    
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

/// Tree manipulation errors
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("No node with id {0:?}")]
    InvalidNode(NodeId),
    
    #[error("Cannot insert {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}
