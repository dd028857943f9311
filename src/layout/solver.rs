//! Multi-strategy placement solver.
//!
//! Given an intent and its generated constraints, the solver finds a concrete
//! free cell, trying increasingly disruptive strategies until one succeeds.
//! The order is significant and encodes "local solutions before distant
//! ones": the exact preferred cell, then near alternatives in the same row or
//! column, then a whole-branch shift, then an expanding radius search, and
//! finally a guaranteed-free distant cell. The first strategy to succeed
//! wins; later ones are not attempted.
//!
//! The solver never mutates state. Displacements it proposes are applied by
//! the engine in one transaction with the new node's insertion.

use crate::graph::node::NodeId;
use crate::graph::store::GraphStore;
use crate::grid::position::GridPosition;
use crate::grid::position_map::{Displacement, PositionMap};
use crate::layout::constraints::{HardConstraint, PlacementConstraints};
use crate::layout::intent::{IntentKind, PlacementIntent};
use itertools::iproduct;
use std::collections::HashSet;

/// Same-row / same-column probe offsets, nearest first.
const ADJACENT_OFFSETS: [i64; 6] = [1, -1, 2, -2, 3, -3];
/// Maximum Chebyshev radius for the fallback search.
const MAX_SEARCH_RADIUS: i64 = 10;
/// Column deltas the anchor-shift strategy will try.
const SHIFT_DELTAS: [i64; 2] = [1, 2];

/// Which strategy produced a placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlacementStrategy {
    /// The soft constraint's preferred cell was free.
    ExactPosition,
    /// A free cell in the same row, within three columns of the preference.
    AdjacentColumn,
    /// A free cell in the same column, within three rows of the preference.
    AdjacentRow,
    /// Single-node displacement. Reserved; currently never succeeds.
    MinimalDisplacement,
    /// The anchor's downstream branch was shifted east to free the cell.
    AnchorShift,
    /// Expanding Chebyshev-radius search around the preference.
    RadiusSearch,
    /// Guaranteed-free cell beyond the graph's bounding box.
    DistantFallback,
    /// Disconnected intent: column 0 of the first empty row below all nodes.
    FreshRow,
}

/// The solver's answer: where the new node goes, and which already-placed
/// nodes must move to make that legal.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlacementResult {
    /// Cell chosen for the new node.
    pub position: GridPosition,
    /// Secondary moves to apply atomically with the insertion.
    pub displacements: Vec<Displacement>,
    /// Which strategy succeeded.
    pub strategy: PlacementStrategy,
}

/// Reject any candidate cell that would put the new node on the wrong column
/// side of a hard-constrained neighbor. A constraint referencing a missing
/// node rejects the candidate outright.
pub fn satisfies_hard_constraints(
    position: GridPosition,
    new_node: NodeId,
    hard: &[HardConstraint],
    store: &GraphStore,
) -> bool {
    hard.iter().all(|hc| {
        if hc.after == new_node {
            store
                .node(hc.before)
                .is_some_and(|other| position.col > other.position.col)
        } else if hc.before == new_node {
            store
                .node(hc.after)
                .is_some_and(|other| position.col < other.position.col)
        } else {
            true
        }
    })
}

/// Find a cell for `intent.new_node`.
///
/// Always succeeds: the distant fallback is reachable from every state and
/// never collides. The caller applies the result (including displacements)
/// atomically.
pub fn solve(
    intent: &PlacementIntent,
    constraints: &PlacementConstraints,
    store: &GraphStore,
    positions: &PositionMap,
) -> PlacementResult {
    if intent.kind == IntentKind::Disconnected {
        return PlacementResult {
            position: fresh_row_cell(store),
            displacements: Vec::new(),
            strategy: PlacementStrategy::FreshRow,
        };
    }

    let preferred = match constraints.soft {
        Some(soft) => soft.preferred,
        // No soft constraint for an anchored intent means the anchor was
        // missing; the engine rejects that before solving. Go straight to
        // the distant fallback rather than guessing.
        None => {
            return PlacementResult {
                position: distant_cell(store),
                displacements: Vec::new(),
                strategy: PlacementStrategy::DistantFallback,
            };
        }
    };

    let free_and_legal = |cell: GridPosition| {
        !positions.is_occupied(cell)
            && satisfies_hard_constraints(cell, intent.new_node, &constraints.hard, store)
    };

    // 1. Exact position.
    if free_and_legal(preferred) {
        return PlacementResult {
            position: preferred,
            displacements: Vec::new(),
            strategy: PlacementStrategy::ExactPosition,
        };
    }

    // 2. Adjacent alternatives: same row, columns at offsets ±1..±3.
    for dc in ADJACENT_OFFSETS {
        let cell = preferred.offset(dc, 0);
        if free_and_legal(cell) {
            return PlacementResult {
                position: cell,
                displacements: Vec::new(),
                strategy: PlacementStrategy::AdjacentColumn,
            };
        }
    }

    // 3. Row alternatives: same column, rows at offsets ±1..±3.
    for dr in ADJACENT_OFFSETS {
        let cell = preferred.offset(0, dr);
        if free_and_legal(cell) {
            return PlacementResult {
                position: cell,
                displacements: Vec::new(),
                strategy: PlacementStrategy::AdjacentRow,
            };
        }
    }

    // 4. Minimal displacement: deliberately unimplemented. The slot stays in
    //    the strategy order so its fallthrough is explicit, not silent.
    log::debug!(
        "minimal displacement strategy is not implemented; falling through for node {}",
        intent.new_node
    );

    // 5. Strategic anchor shift (upstream intents only).
    if intent.kind == IntentKind::AdjacentUpstream {
        if let Some(result) = try_anchor_shift(intent, preferred, store, positions) {
            return result;
        }
    }

    // 6. Expanding radius search around the preferred cell.
    for r in 1..=MAX_SEARCH_RADIUS {
        for (dc, dr) in iproduct!(-r..=r, -r..=r) {
            if dc.abs().max(dr.abs()) != r {
                continue;
            }
            let cell = preferred.offset(dc, dr);
            if free_and_legal(cell) {
                return PlacementResult {
                    position: cell,
                    displacements: Vec::new(),
                    strategy: PlacementStrategy::RadiusSearch,
                };
            }
        }
    }

    // 7. Distant fallback: always free.
    log::debug!(
        "no cell within radius {MAX_SEARCH_RADIUS} of {preferred} for node {}; using distant fallback",
        intent.new_node
    );
    PlacementResult {
        position: distant_cell(store),
        displacements: Vec::new(),
        strategy: PlacementStrategy::DistantFallback,
    }
}

/// Shift the anchor's whole downstream branch east by 1 or 2 columns so a
/// cell directly west of the (moved) anchor becomes free for the new node.
///
/// With a shift of `delta` the new node lands at `preferred + delta`
/// columns, one west of the anchor's new cell. A shift is accepted only if
/// every displaced node's target is free or vacated by the same batch, and
/// the new-node cell ends up unoccupied after the batch.
fn try_anchor_shift(
    intent: &PlacementIntent,
    preferred: GridPosition,
    store: &GraphStore,
    positions: &PositionMap,
) -> Option<PlacementResult> {
    let anchor = intent.anchor?;
    let branch = store.downstream_branch(anchor);
    let branch_set: HashSet<NodeId> = branch.iter().copied().collect();

    'delta: for delta in SHIFT_DELTAS {
        let mut displacements = Vec::with_capacity(branch.len());
        let mut targets = HashSet::with_capacity(branch.len());
        for &id in &branch {
            let node = store.node(id)?;
            let to = node.position.offset(delta, 0);
            // Target must be free or held by another member of this batch.
            if let Some(occupant) = positions.occupant(to) {
                if !branch_set.contains(&occupant) {
                    continue 'delta;
                }
            }
            if !targets.insert(to) {
                continue 'delta;
            }
            displacements.push(Displacement {
                node: id,
                from: node.position,
                to,
            });
        }
        // After the shift the new node sits one west of the moved anchor.
        let landing = preferred.offset(delta, 0);
        if targets.contains(&landing) {
            continue;
        }
        if let Some(occupant) = positions.occupant(landing) {
            if !branch_set.contains(&occupant) {
                continue;
            }
        }
        return Some(PlacementResult {
            position: landing,
            displacements,
            strategy: PlacementStrategy::AnchorShift,
        });
    }
    None
}

/// Column 0 of the first row below every existing node; origin when empty.
fn fresh_row_cell(store: &GraphStore) -> GridPosition {
    store
        .nodes()
        .map(|n| n.position.row)
        .max()
        .map_or(GridPosition::ORIGIN, |bottom| {
            GridPosition::new(0, bottom + 1)
        })
}

/// One column east of the rightmost node and one row below the bottommost:
/// guaranteed unoccupied.
fn distant_cell(store: &GraphStore) -> GridPosition {
    let mut cols = store.nodes().map(|n| n.position.col);
    let mut rows = store.nodes().map(|n| n.position.row);
    match (cols.by_ref().max(), rows.by_ref().max()) {
        (Some(east), Some(south)) => GridPosition::new(east + 1, south + 1),
        _ => GridPosition::ORIGIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::Node;
    use crate::layout::constraints::generate_constraints;

    fn n(i: u64) -> NodeId {
        NodeId::new(i)
    }

    fn p(col: i64, row: i64) -> GridPosition {
        GridPosition::new(col, row)
    }

    struct Fixture {
        store: GraphStore,
        positions: PositionMap,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: GraphStore::new(),
                positions: PositionMap::new(),
            }
        }

        fn place(&mut self, id: u64, col: i64, row: i64) {
            assert!(self.positions.reserve(n(id), p(col, row)));
            self.store.insert_node(Node::at(n(id), col, row)).unwrap();
        }

        fn edge(&mut self, from: u64, to: u64) {
            self.store.add_edge(n(from), n(to)).unwrap();
        }

        fn solve(&self, intent: &PlacementIntent) -> PlacementResult {
            let constraints = generate_constraints(intent, &self.store);
            solve(intent, &constraints, &self.store, &self.positions)
        }
    }

    #[test]
    fn exact_position_when_free() {
        let mut f = Fixture::new();
        f.place(1, 1, 2);
        let r = f.solve(&PlacementIntent::downstream(n(2), n(1)));
        assert_eq!(r.position, p(2, 2));
        assert_eq!(r.strategy, PlacementStrategy::ExactPosition);
        assert!(r.displacements.is_empty());
    }

    #[test]
    fn adjacent_column_when_preferred_taken() {
        let mut f = Fixture::new();
        f.place(1, 1, 2);
        f.place(9, 2, 2); // sits on the preferred cell
        let r = f.solve(&PlacementIntent::downstream(n(2), n(1)));
        // Offset +1 from preferred (2,2) is (3,2): free and east of anchor.
        assert_eq!(r.position, p(3, 2));
        assert_eq!(r.strategy, PlacementStrategy::AdjacentColumn);
    }

    #[test]
    fn hard_constraint_rejects_wrong_side() {
        // Downstream of an anchor at col 1: candidate cells at col <= 1 are
        // never accepted even when free.
        let mut f = Fixture::new();
        f.place(1, 1, 0);
        f.place(9, 2, 0); // preferred taken
        let r = f.solve(&PlacementIntent::downstream(n(2), n(1)));
        assert!(r.position.col > 1, "got {:?}", r.position);
    }

    #[test]
    fn adjacent_row_when_column_band_exhausted() {
        let mut f = Fixture::new();
        f.place(1, 1, 0);
        // Occupy preferred (2,0) and all same-row column offsets that pass
        // the hard check: 3,4,5 (west offsets fail the hard check anyway).
        f.place(10, 2, 0);
        f.place(11, 3, 0);
        f.place(12, 4, 0);
        f.place(13, 5, 0);
        let r = f.solve(&PlacementIntent::downstream(n(2), n(1)));
        // Same column as preferred, one row off.
        assert_eq!(r.position, p(2, 1));
        assert_eq!(r.strategy, PlacementStrategy::AdjacentRow);
    }

    #[test]
    fn upstream_exact_west_cell() {
        let mut f = Fixture::new();
        f.place(1, 1, 1);
        let r = f.solve(&PlacementIntent::upstream(n(2), n(1)));
        assert_eq!(r.position, p(0, 1));
        assert_eq!(r.strategy, PlacementStrategy::ExactPosition);
    }

    #[test]
    fn anchor_shift_frees_west_cell() {
        // Column band 0..=5 on row 0 fully packed with the anchor's own
        // upstream wall, so near strategies fail west of the anchor; the
        // anchor's branch shifts east instead.
        let mut f = Fixture::new();
        // Wall of unrelated nodes west of and around the anchor.
        f.place(10, 0, 0);
        f.place(11, 1, 0);
        f.place(12, 2, 0);
        f.place(13, 3, 0);
        // Anchor with a downstream chain.
        f.place(1, 4, 0);
        f.place(2, 5, 0);
        f.edge(1, 2);
        // Row alternatives blocked too.
        for (id, dr) in [(20u64, 1i64), (21, -1), (22, 2), (23, -2), (24, 3), (25, -3)] {
            f.place(id, 3, dr);
        }
        let intent = PlacementIntent::upstream(n(30), n(1));
        let r = f.solve(&intent);
        assert_eq!(r.strategy, PlacementStrategy::AnchorShift);
        // Branch {1,2} shifts east by 1; the new node takes the anchor's
        // vacated cell, one west of the anchor's new column.
        assert_eq!(r.position, p(4, 0));
        let mut moved: Vec<_> = r.displacements.iter().map(|d| (d.node, d.to)).collect();
        moved.sort_by_key(|(id, _)| *id);
        assert_eq!(moved, vec![(n(1), p(5, 0)), (n(2), p(6, 0))]);
    }

    #[test]
    fn anchor_shift_not_tried_for_downstream() {
        let mut f = Fixture::new();
        f.place(1, 1, 0);
        f.place(9, 2, 0);
        let r = f.solve(&PlacementIntent::downstream(n(2), n(1)));
        assert_ne!(r.strategy, PlacementStrategy::AnchorShift);
    }

    #[test]
    fn radius_search_before_distant_fallback() {
        // Pack a 7x7 block of unrelated nodes around the preferred cell so
        // the near strategies fail but a radius-4 cell exists.
        let mut f = Fixture::new();
        f.place(1, 10, 10);
        let mut id = 100u64;
        for (dc, dr) in iproduct!(-3i64..=3, -3i64..=3) {
            let cell = p(11 + dc, 10 + dr);
            if cell == p(10, 10) {
                continue; // anchor's own cell
            }
            if !f.positions.is_occupied(cell) {
                f.place(id, cell.col, cell.row);
                id += 1;
            }
        }
        let r = f.solve(&PlacementIntent::downstream(n(2), n(1)));
        assert_eq!(r.strategy, PlacementStrategy::RadiusSearch);
        // Still local: within radius 10 of the preference, east of anchor.
        assert!(r.position.chebyshev_distance(p(11, 10)) <= 10);
        assert!(r.position.col > 10);
        assert!(!f.positions.is_occupied(r.position));
    }

    #[test]
    fn distant_fallback_when_nothing_local_is_legal() {
        // Downstream of an anchor at (0,0): every cell east of the anchor
        // within radius 10 of the preference is occupied, and cells at or
        // west of col 0 fail the hard check. Only the fallback remains.
        let mut f = Fixture::new();
        f.place(1, 0, 0);
        let mut id = 100u64;
        for (dc, dr) in iproduct!(-10i64..=10, -10i64..=10) {
            let cell = p(1 + dc, dr);
            if cell.col > 0 && !f.positions.is_occupied(cell) {
                f.place(id, cell.col, cell.row);
                id += 1;
            }
        }
        let r = f.solve(&PlacementIntent::downstream(n(2), n(1)));
        assert_eq!(r.strategy, PlacementStrategy::DistantFallback);
        assert!(!f.positions.is_occupied(r.position));
        // One past the bounding box on both axes.
        assert_eq!(r.position, p(12, 11));
    }

    #[test]
    fn lone_anchor_shift_hands_over_its_cell() {
        // A lone anchor boxed in on its west side steps east and gives the
        // newcomer its old cell.
        let mut f = Fixture::new();
        f.place(1, 0, 0);
        let wall = [
            (-1i64, 0i64),
            (-2, 0),
            (-3, 0),
            (-4, 0),
            (-1, 1),
            (-1, -1),
            (-1, 2),
            (-1, -2),
            (-1, 3),
            (-1, -3),
        ];
        for (i, (col, row)) in wall.into_iter().enumerate() {
            f.place(100 + i as u64, col, row);
        }
        let r = f.solve(&PlacementIntent::upstream(n(2), n(1)));
        assert_eq!(r.strategy, PlacementStrategy::AnchorShift);
        assert_eq!(r.position, p(0, 0));
        assert_eq!(
            r.displacements,
            vec![Displacement { node: n(1), from: p(0, 0), to: p(1, 0) }]
        );
    }

    #[test]
    fn disconnected_takes_fresh_row() {
        let mut f = Fixture::new();
        f.place(1, 3, 0);
        f.place(2, 1, 4);
        let r = f.solve(&PlacementIntent::disconnected(n(3)));
        assert_eq!(r.position, p(0, 5));
        assert_eq!(r.strategy, PlacementStrategy::FreshRow);
    }

    #[test]
    fn disconnected_into_empty_graph_is_origin() {
        let f = Fixture::new();
        let r = f.solve(&PlacementIntent::disconnected(n(1)));
        assert_eq!(r.position, GridPosition::ORIGIN);
    }

    #[test]
    fn satisfies_hard_constraints_both_directions() {
        let mut f = Fixture::new();
        f.place(1, 5, 0);
        let hard = [HardConstraint { before: n(1), after: n(2) }];
        assert!(satisfies_hard_constraints(p(6, 0), n(2), &hard, &f.store));
        assert!(!satisfies_hard_constraints(p(5, 0), n(2), &hard, &f.store));
        assert!(!satisfies_hard_constraints(p(4, 0), n(2), &hard, &f.store));
        let hard = [HardConstraint { before: n(2), after: n(1) }];
        assert!(satisfies_hard_constraints(p(4, 0), n(2), &hard, &f.store));
        assert!(!satisfies_hard_constraints(p(5, 0), n(2), &hard, &f.store));
    }
}
