//! `PlacementIntent`: the declarative request driving one insertion.
//!
//! An intent says *what* the caller wants (a node downstream of an anchor,
//! upstream of it, or disconnected) without saying *where* it goes; the
//! constraint generator and solver turn it into a concrete cell.

use crate::graph::node::NodeId;

/// The relation requested between the new node and its anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum IntentKind {
    /// Place the new node east of the anchor; creates `anchor -> new`.
    AdjacentDownstream,
    /// Place the new node west of the anchor; creates `new -> anchor`.
    AdjacentUpstream,
    /// Place the new node with no relation to any existing node.
    Disconnected,
}

/// One placement request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlacementIntent {
    /// Requested relation.
    pub kind: IntentKind,
    /// The existing node the placement is relative to; `None` for
    /// disconnected intents.
    pub anchor: Option<NodeId>,
    /// Id of the node being inserted.
    pub new_node: NodeId,
    /// Relative priority, reserved for callers that queue intents.
    pub priority: u8,
    /// Human-readable origin of the request, carried into the recorded
    /// spatial constraint.
    pub reason: String,
}

impl PlacementIntent {
    /// Request `new_node` downstream of `anchor`.
    pub fn downstream(new_node: NodeId, anchor: NodeId) -> Self {
        Self {
            kind: IntentKind::AdjacentDownstream,
            anchor: Some(anchor),
            new_node,
            priority: 0,
            reason: format!("downstream of {anchor}"),
        }
    }

    /// Request `new_node` upstream of `anchor`.
    pub fn upstream(new_node: NodeId, anchor: NodeId) -> Self {
        Self {
            kind: IntentKind::AdjacentUpstream,
            anchor: Some(anchor),
            new_node,
            priority: 0,
            reason: format!("upstream of {anchor}"),
        }
    }

    /// Request `new_node` with no anchor.
    pub fn disconnected(new_node: NodeId) -> Self {
        Self {
            kind: IntentKind::Disconnected,
            anchor: None,
            new_node,
            priority: 0,
            reason: "disconnected".to_owned(),
        }
    }

    /// Same intent with an explicit priority.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}
