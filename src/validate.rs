//! Layout validation helpers.
//!
//! Read-only diagnostics over the graph store and position map. The engine
//! calls the boolean forms after every public mutating operation; test
//! harnesses and the invariant machinery use the detailed `Result` forms.
//! Validation never repairs: an inconsistency is reported, not patched,
//! since a repair cannot know which side is authoritative.

use crate::graph::store::GraphStore;
use crate::grid::position_map::PositionMap;
use crate::layout_error::LayoutError;

/// Check that no two nodes share a cell and the position map is bijectively
/// consistent with the store.
///
/// # Errors
/// [`LayoutError::InconsistentPositionMap`] naming the first node whose
/// recorded cell and map entry disagree, or a map entry with no backing
/// node.
pub fn check_no_overlaps(store: &GraphStore, positions: &PositionMap) -> Result<(), LayoutError> {
    // Every node's cell must map back to the node. Two nodes sharing a cell
    // are caught here too: the map can hold only one of them.
    for node in store.nodes() {
        match positions.occupant(node.position) {
            Some(id) if id == node.id => {}
            _ => {
                return Err(LayoutError::InconsistentPositionMap {
                    node: node.id,
                    stored: node.position,
                    mapped: positions.position_of(node.id),
                });
            }
        }
    }
    // Every map entry must be backed by a node at that exact cell.
    for (position, id) in positions.iter() {
        match store.node(id) {
            Some(node) if node.position == position => {}
            _ => {
                return Err(LayoutError::InconsistentPositionMap {
                    node: id,
                    stored: store
                        .node(id)
                        .map_or(position, |node| node.position),
                    mapped: Some(position),
                });
            }
        }
    }
    Ok(())
}

/// Check that every edge runs strictly west-to-east and both endpoints
/// exist.
///
/// # Errors
/// [`LayoutError::UnknownNode`] for a dangling endpoint,
/// [`LayoutError::EdgeOrderViolation`] for a column-order violation.
pub fn check_topological_order(store: &GraphStore) -> Result<(), LayoutError> {
    for edge in store.edges() {
        let from = store
            .node(edge.from)
            .ok_or(LayoutError::UnknownNode(edge.from))?;
        let to = store
            .node(edge.to)
            .ok_or(LayoutError::UnknownNode(edge.to))?;
        if from.position.col >= to.position.col {
            return Err(LayoutError::EdgeOrderViolation {
                from: edge.from,
                to: edge.to,
                from_col: from.position.col,
                to_col: to.position.col,
            });
        }
    }
    Ok(())
}

/// Boolean form of [`check_no_overlaps`]; logs the finding at warn level.
pub fn validate_no_overlaps(store: &GraphStore, positions: &PositionMap) -> bool {
    match check_no_overlaps(store, positions) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("overlap validation failed: {e}");
            false
        }
    }
}

/// Boolean form of [`check_topological_order`]; logs the finding at warn
/// level.
pub fn validate_topological_order(store: &GraphStore) -> bool {
    match check_topological_order(store) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("topological-order validation failed: {e}");
            false
        }
    }
}
