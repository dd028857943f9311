//! Topological layering: re-derive every node's column after a structural
//! change.
//!
//! The pass walks the cached topological order, computes each node's layer
//! (`0` for sources, else `1 + max(layer of predecessors)`), folds in the
//! node's recorded [`SpatialConstraint`], and applies the resulting columns
//! through the position map. Rows never change here.
//!
//! A cycle aborts the pass before any move: prior positions are retained and
//! [`LayoutError::CycleDetected`] is surfaced to the caller. A single move
//! that the position map rejects (the deterministic assignment itself would
//! collide) is skipped and reported, never applied to the store alone.

use crate::graph::node::NodeId;
use crate::graph::store::GraphStore;
use crate::grid::position_map::{Displacement, PositionMap};
use crate::layout::constraints::SpatialConstraint;
use std::collections::HashMap;

/// What a layering pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayeringOutcome {
    /// Column moves that were applied.
    pub moves: Vec<Displacement>,
    /// Nodes whose computed column could not be applied (target occupied);
    /// they keep their prior cell.
    pub skipped: Vec<NodeId>,
}

/// Recompute and apply columns for the whole graph.
///
/// Successors are layered against their predecessors' *resolved* layers (the
/// ideal assignment), not the possibly-skipped applied ones, so one skip does
/// not cascade into a different layout for the rest of the graph.
///
/// # Errors
/// [`LayoutError::CycleDetected`] if no topological order exists; no
/// position is touched in that case.
pub fn relayer(
    store: &mut GraphStore,
    positions: &mut PositionMap,
    spatial: &HashMap<NodeId, SpatialConstraint>,
) -> Result<LayeringOutcome, crate::layout_error::LayoutError> {
    let order = store.topology()?.order.clone();

    let mut resolved: HashMap<NodeId, i64> = HashMap::with_capacity(order.len());
    let mut outcome = LayeringOutcome::default();

    for id in order {
        let topological_layer = store
            .predecessors(id)
            .map(|pred| resolved.get(&pred).copied().unwrap_or(0))
            .max()
            .map_or(0, |m| m + 1);

        let layer = match spatial.get(&id) {
            Some(sc) => sc.resolve(topological_layer),
            None => topological_layer,
        };
        resolved.insert(id, layer);

        let Some(node) = store.node(id) else { continue };
        let from = node.position;
        if from.col == layer {
            continue;
        }
        let to = from.offset(layer - from.col, 0);
        if positions.move_to(id, from, to) {
            store.set_position(id, to);
            outcome.moves.push(Displacement { node: id, from, to });
        } else {
            log::warn!(
                "layering: cannot move node {id} from {from} to {to} (cell occupied); keeping prior cell"
            );
            outcome.skipped.push(id);
        }
    }

    Ok(outcome)
}
