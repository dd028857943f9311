//! LayoutError: unified error type for flowgrid public APIs
//!
//! This error type is used throughout the flowgrid library to provide robust,
//! non-panicking error handling for all public operations.

use crate::graph::node::NodeId;
use crate::grid::position::GridPosition;
use thiserror::Error;

/// Unified error type for flowgrid operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Attempted to construct a NodeId with a zero value (invalid).
    #[error("NodeId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidNodeId,
    /// An upstream/downstream request referenced an anchor that does not exist.
    #[error("Placement error: anchor node `{0}` does not exist")]
    UnknownAnchor(NodeId),
    /// An operation referenced a node that does not exist.
    #[error("Graph error: node `{0}` does not exist")]
    UnknownNode(NodeId),
    /// A node with the same id is already present in the graph.
    #[error("Graph error: node `{0}` already exists")]
    DuplicateNode(NodeId),
    /// Direct insertion targeted a cell already held by another node.
    #[error("Position error: cell {position} is occupied by node `{occupant}`")]
    PositionOccupied {
        /// The contested grid cell.
        position: GridPosition,
        /// The node currently holding the cell.
        occupant: NodeId,
    },
    /// A displacement batch collided with a node outside the batch.
    #[error("Displacement error: moving node `{node}` to {target} collides with node `{occupant}`")]
    DisplacementConflict {
        /// The node the batch tried to move.
        node: NodeId,
        /// The cell it was headed for.
        target: GridPosition,
        /// The out-of-batch node already there.
        occupant: NodeId,
    },
    /// The graph contains a cycle; expected a DAG.
    #[error("Topology error: cycle detected in graph (expected DAG)")]
    CycleDetected,
    /// An edge's endpoints are not ordered west-to-east by column.
    #[error(
        "Topology error: edge `{from}` -> `{to}` is not west-to-east (columns {from_col} >= {to_col})"
    )]
    EdgeOrderViolation {
        /// Upstream endpoint.
        from: NodeId,
        /// Downstream endpoint.
        to: NodeId,
        /// Upstream column.
        from_col: i64,
        /// Downstream column.
        to_col: i64,
    },
    /// The position map and the node collection disagree about a node's cell.
    #[error(
        "Consistency error: node `{node}` reports cell {stored}, position map says {mapped:?}"
    )]
    InconsistentPositionMap {
        /// The node whose placement is disputed.
        node: NodeId,
        /// The cell recorded on the node itself.
        stored: GridPosition,
        /// The cell the position map attributes to the node, if any.
        mapped: Option<GridPosition>,
    },
}
