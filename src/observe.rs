//! Mutation observation: structured events and per-operation deltas.
//!
//! The engine has no global logger or observable collection. Instead, every
//! public mutating operation returns a [`LayoutDelta`] describing exactly
//! what changed, and an optional injected [`LayoutObserver`] receives the
//! same information as it happens. Observation is fire-and-forget: observers
//! run after the data-model mutation completes and can never affect it.

use crate::graph::edge::Edge;
use crate::graph::node::NodeId;
use crate::grid::position::GridPosition;
use crate::grid::position_map::Displacement;
use crate::layout::solver::PlacementStrategy;

/// A structured event emitted by the engine.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LayoutEvent {
    /// A node was created at a cell.
    NodeAdded {
        /// The new node.
        node: NodeId,
        /// Where it landed.
        position: GridPosition,
        /// Which solver strategy chose the cell, if the insertion went
        /// through the intent pipeline.
        strategy: Option<PlacementStrategy>,
    },
    /// An existing node changed cells.
    NodeMoved {
        /// The node that moved.
        node: NodeId,
        /// Its previous cell.
        from: GridPosition,
        /// Its new cell.
        to: GridPosition,
    },
    /// An edge was created.
    EdgeAdded {
        /// The new edge.
        edge: Edge,
    },
    /// A layering move could not be applied; the node kept its cell.
    MoveSkipped {
        /// The node left in place.
        node: NodeId,
    },
    /// The whole graph was reset.
    Cleared,
}

/// Receives engine events. Implementations must be cheap and side-effect
/// only; they observe completed mutations and cannot veto them.
pub trait LayoutObserver {
    /// Called once per event, in mutation order.
    fn on_event(&mut self, event: &LayoutEvent);
}

impl<F: FnMut(&LayoutEvent)> LayoutObserver for F {
    fn on_event(&mut self, event: &LayoutEvent) {
        self(event)
    }
}

/// Everything one public operation changed, returned to the caller so a
/// presentation layer can react without watching engine internals.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayoutDelta {
    /// Nodes created by the operation.
    pub nodes_added: Vec<NodeId>,
    /// Cell changes, both solver displacements and layering moves.
    pub nodes_moved: Vec<Displacement>,
    /// Edges created by the operation.
    pub edges_added: Vec<Edge>,
    /// Layering moves that had to be skipped (target occupied).
    pub moves_skipped: Vec<NodeId>,
    /// The solver strategy used, when an intent was solved.
    pub strategy: Option<PlacementStrategy>,
}

impl LayoutDelta {
    /// Whether the operation changed anything at all.
    pub fn is_empty(&self) -> bool {
        self.nodes_added.is_empty()
            && self.nodes_moved.is_empty()
            && self.edges_added.is_empty()
            && self.moves_skipped.is_empty()
    }
}
