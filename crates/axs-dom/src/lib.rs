//! axs DOM - Document Object Model for the tweak engine
//!
//! Arena-based DOM tree that the tweak engine queries and mutates.
//!
//! Features:
//! - Arena nodes addressed by `NodeId`
//! - CSS selector matching (`query_selector_all`, `matches`)
//! - Mutation observers with attribute filters
//! - Virtual-clock timer queue standing in for the host event loop

mod node;
mod tree;
mod document;
pub mod selectors;
pub mod observer;
pub mod event_loop;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Descendants};
pub use document::Document;
pub use selectors::{SelectorList, SelectorError};
pub use observer::{MutationObserverInit, MutationRecord, MutationType, ObserverId};
pub use event_loop::{TimerQueue, TimerId, Task};

use std::fmt;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for absent links
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn some(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("node {0} does not exist")]
    NoSuchNode(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} has no parent")]
    Detached(NodeId),

    #[error("cannot insert {child} under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),

    #[error("invalid observer options: {0}")]
    InvalidObserverOptions(&'static str),

    #[error("unknown observer {0:?}")]
    UnknownObserver(ObserverId),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}
