//! `PositionMap`: the authoritative occupancy index from grid cell to node id.
//!
//! The map is the single source of truth for occupancy queries. Every
//! operation that changes a node's cell must go through here, and every
//! mutating operation leaves the map satisfying the bijection invariant even
//! on failure: failure is a no-op, never a partial update.

use crate::graph::node::NodeId;
use crate::grid::position::GridPosition;
use crate::layout_error::LayoutError;
use std::collections::HashMap;

/// One planned move inside a displacement batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Displacement {
    /// The node being moved.
    pub node: NodeId,
    /// Its current cell.
    pub from: GridPosition,
    /// The cell it is moving to.
    pub to: GridPosition,
}

/// Bijective index from occupied cell to occupying node.
#[derive(Clone, Debug, Default)]
pub struct PositionMap {
    cells: HashMap<GridPosition, NodeId>,
}

impl PositionMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `position` for `node`.
    ///
    /// Returns `false` (and leaves the map untouched) if the cell is held by
    /// a different node. Re-reserving a node's own cell succeeds.
    pub fn reserve(&mut self, node: NodeId, position: GridPosition) -> bool {
        match self.cells.get(&position) {
            Some(&occupant) if occupant != node => false,
            _ => {
                self.cells.insert(position, node);
                true
            }
        }
    }

    /// Release a cell, returning its former occupant if there was one.
    pub fn release(&mut self, position: GridPosition) -> Option<NodeId> {
        self.cells.remove(&position)
    }

    /// Move `node` from `from` to `to`.
    ///
    /// Returns `false` with no mutation if `to` is occupied by a different
    /// node, or if `from` does not currently map to `node`. A degenerate move
    /// (`from == to`) succeeds.
    pub fn move_to(&mut self, node: NodeId, from: GridPosition, to: GridPosition) -> bool {
        if self.cells.get(&from) != Some(&node) {
            return false;
        }
        if from == to {
            return true;
        }
        if let Some(&occupant) = self.cells.get(&to) {
            if occupant != node {
                return false;
            }
        }
        self.cells.remove(&from);
        self.cells.insert(to, node);
        true
    }

    /// Apply a batch of displacements atomically: either every move lands or
    /// the map is untouched.
    ///
    /// A target is legal if it is free, or currently held by a node that the
    /// same batch moves away.
    ///
    /// # Errors
    /// - [`LayoutError::InconsistentPositionMap`] if some `from` cell does
    ///   not map to the node the batch claims.
    /// - [`LayoutError::DisplacementConflict`] if a target cell is held by a
    ///   node outside the batch, or two batch entries share a target.
    pub fn move_batch(&mut self, moves: &[Displacement]) -> Result<(), LayoutError> {
        use std::collections::HashSet;

        let vacated: HashSet<GridPosition> = moves.iter().map(|m| m.from).collect();
        let mut targets = HashSet::with_capacity(moves.len());

        // Validate everything before touching the map.
        for m in moves {
            if self.cells.get(&m.from) != Some(&m.node) {
                return Err(LayoutError::InconsistentPositionMap {
                    node: m.node,
                    stored: m.from,
                    mapped: self.position_of(m.node),
                });
            }
            if !targets.insert(m.to) {
                return Err(LayoutError::DisplacementConflict {
                    node: m.node,
                    target: m.to,
                    occupant: m.node,
                });
            }
            if let Some(&occupant) = self.cells.get(&m.to) {
                if occupant != m.node && !vacated.contains(&m.to) {
                    return Err(LayoutError::DisplacementConflict {
                        node: m.node,
                        target: m.to,
                        occupant,
                    });
                }
            }
        }

        for m in moves {
            self.cells.remove(&m.from);
        }
        for m in moves {
            self.cells.insert(m.to, m.node);
        }
        Ok(())
    }

    /// Whether any node holds `position`.
    #[inline]
    pub fn is_occupied(&self, position: GridPosition) -> bool {
        self.cells.contains_key(&position)
    }

    /// The node holding `position`, if any.
    #[inline]
    pub fn occupant(&self, position: GridPosition) -> Option<NodeId> {
        self.cells.get(&position).copied()
    }

    /// Reverse lookup: the cell currently mapped to `node`, if any.
    ///
    /// Linear in the number of occupied cells; used by error reporting and
    /// the validator, never on the placement hot path.
    pub fn position_of(&self, node: NodeId) -> Option<GridPosition> {
        self.cells
            .iter()
            .find_map(|(&pos, &id)| (id == node).then_some(pos))
    }

    /// Number of occupied cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over `(cell, occupant)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, NodeId)> + '_ {
        self.cells.iter().map(|(&pos, &id)| (pos, id))
    }

    /// Remove every reservation.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
