//! mnml DOM - Document Object Model
//!
//! Arena-backed DOM tree that hosts mnml's element helpers, selector
//! queries and event delegation.

mod document;
mod events;
mod interner;
mod node;
mod tree;

pub use document::{Document, ReadyState};
pub use events::{Event, ListenerId, ListenerTable};
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Ancestors, Children, Descendants, DomTree};

use std::fmt;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert a sentinel into `None`
    #[inline]
    pub fn valid(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// Inserting a node into itself or its own descendant
    #[error("cannot insert {child} under {parent}: hierarchy request error")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Operation needs a different kind of node
    #[error("node {node} is not {expected}")]
    InvalidNodeType { node: NodeId, expected: &'static str },
}
