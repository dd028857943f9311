//! Constraint generation: from a placement intent to hard/soft constraints,
//! and the persistent per-node spatial constraints the layering engine folds
//! into every recompute.

use crate::graph::node::NodeId;
use crate::graph::store::GraphStore;
use crate::grid::position::GridPosition;
use crate::layout::intent::{IntentKind, PlacementIntent};

/// A topological ordering requirement that must never be violated:
/// `before`'s column strictly west of `after`'s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HardConstraint {
    /// The upstream side.
    pub before: NodeId,
    /// The downstream side.
    pub after: NodeId,
}

/// A preferred cell honored when compatible with the hard constraints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SoftConstraint {
    /// The cell the caller would like.
    pub preferred: GridPosition,
    /// How far from `preferred` still counts as honoring the request.
    pub tolerance: u32,
}

/// Everything the solver needs for one insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlacementConstraints {
    /// Ordering pairs that must hold after the placement.
    pub hard: Vec<HardConstraint>,
    /// Preferred position, if the intent implies one.
    pub soft: Option<SoftConstraint>,
    /// Nodes that must not move during this operation.
    pub locks: Vec<NodeId>,
}

impl PlacementConstraints {
    /// A constraint set with no entries; the caller must treat an intent that
    /// generates this for an anchored kind as failed.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-node layer bounds recorded when a node is placed relative to an
/// anchor. Consulted by the layering engine on every subsequent recompute so
/// the node's relative ordering intent survives insertions elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpatialConstraint {
    /// Westmost admissible layer, if bounded.
    pub min_layer: Option<i64>,
    /// Eastmost admissible layer, if bounded.
    pub max_layer: Option<i64>,
    /// The layer the placement chose.
    pub preferred_layer: i64,
    /// Why the constraint exists (mirrors the intent's reason).
    pub reason: String,
}

impl SpatialConstraint {
    /// Resolve the node's final layer given its pure topological layer.
    ///
    /// The preferred layer wins when it respects `min_layer`/`max_layer` and
    /// does not undercut the topological layer (dependency order is never
    /// violated in favor of a preference). Otherwise the topological layer is
    /// clamped into the recorded bounds.
    pub fn resolve(&self, topological_layer: i64) -> i64 {
        let admissible = self.preferred_layer >= topological_layer
            && self.min_layer.is_none_or(|min| self.preferred_layer >= min)
            && self.max_layer.is_none_or(|max| self.preferred_layer <= max);
        if admissible {
            return self.preferred_layer;
        }
        let mut layer = topological_layer;
        if let Some(min) = self.min_layer {
            layer = layer.max(min);
        }
        if let Some(max) = self.max_layer {
            layer = layer.min(max);
        }
        layer
    }

    /// The same constraint shifted east by `delta` columns. Used when a
    /// displacement batch moves the node, so the recorded intent follows it.
    pub fn translated(&self, delta: i64) -> Self {
        Self {
            min_layer: self.min_layer.map(|l| l + delta),
            max_layer: self.max_layer.map(|l| l + delta),
            preferred_layer: self.preferred_layer + delta,
            reason: self.reason.clone(),
        }
    }
}

/// Translate an intent into solver constraints. Pure: reads the store, never
/// mutates it.
///
/// An anchored intent whose anchor is missing yields
/// [`PlacementConstraints::empty`]; the engine rejects such intents before
/// reaching the solver.
pub fn generate_constraints(
    intent: &PlacementIntent,
    store: &GraphStore,
) -> PlacementConstraints {
    let anchor = match intent.kind {
        IntentKind::Disconnected => return PlacementConstraints::empty(),
        IntentKind::AdjacentDownstream | IntentKind::AdjacentUpstream => {
            match intent.anchor.and_then(|id| store.node(id)) {
                Some(anchor) => anchor,
                None => return PlacementConstraints::empty(),
            }
        }
    };

    match intent.kind {
        IntentKind::AdjacentDownstream => PlacementConstraints {
            hard: vec![HardConstraint {
                before: anchor.id,
                after: intent.new_node,
            }],
            soft: Some(SoftConstraint {
                preferred: anchor.position.offset(1, 0),
                tolerance: 1,
            }),
            locks: vec![anchor.id],
        },
        IntentKind::AdjacentUpstream => PlacementConstraints {
            hard: vec![HardConstraint {
                before: intent.new_node,
                after: anchor.id,
            }],
            soft: Some(SoftConstraint {
                preferred: anchor.position.offset(-1, 0),
                tolerance: 1,
            }),
            locks: vec![anchor.id],
        },
        IntentKind::Disconnected => unreachable!("handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::Node;

    fn n(i: u64) -> NodeId {
        NodeId::new(i)
    }

    fn store_with_anchor() -> GraphStore {
        let mut s = GraphStore::new();
        s.insert_node(Node::at(n(1), 3, 2)).unwrap();
        s
    }

    #[test]
    fn downstream_prefers_east_neighbor() {
        let s = store_with_anchor();
        let c = generate_constraints(&PlacementIntent::downstream(n(2), n(1)), &s);
        assert_eq!(
            c.hard,
            vec![HardConstraint { before: n(1), after: n(2) }]
        );
        let soft = c.soft.unwrap();
        assert_eq!(soft.preferred, GridPosition::new(4, 2));
        assert_eq!(soft.tolerance, 1);
        assert_eq!(c.locks, vec![n(1)]);
    }

    #[test]
    fn upstream_prefers_west_neighbor() {
        let s = store_with_anchor();
        let c = generate_constraints(&PlacementIntent::upstream(n(2), n(1)), &s);
        assert_eq!(
            c.hard,
            vec![HardConstraint { before: n(2), after: n(1) }]
        );
        assert_eq!(c.soft.unwrap().preferred, GridPosition::new(2, 2));
        assert_eq!(c.locks, vec![n(1)]);
    }

    #[test]
    fn disconnected_is_unconstrained() {
        let s = store_with_anchor();
        let c = generate_constraints(&PlacementIntent::disconnected(n(2)), &s);
        assert_eq!(c, PlacementConstraints::empty());
    }

    #[test]
    fn missing_anchor_yields_empty_set() {
        let s = GraphStore::new();
        let c = generate_constraints(&PlacementIntent::downstream(n(2), n(1)), &s);
        assert_eq!(c, PlacementConstraints::empty());
    }

    #[test]
    fn resolve_prefers_recorded_layer() {
        let sc = SpatialConstraint {
            min_layer: Some(2),
            max_layer: None,
            preferred_layer: 2,
            reason: String::new(),
        };
        assert_eq!(sc.resolve(1), 2);
        // Preference below the topological layer is inadmissible.
        assert_eq!(sc.resolve(3), 3);
    }

    #[test]
    fn resolve_clamps_into_bounds() {
        let sc = SpatialConstraint {
            min_layer: None,
            max_layer: Some(0),
            preferred_layer: -1,
            reason: String::new(),
        };
        // Preferred -1 undercuts topological layer 0; clamp 0 into (-inf, 0].
        assert_eq!(sc.resolve(0), 0);
    }

    #[test]
    fn translated_shifts_all_layers() {
        let sc = SpatialConstraint {
            min_layer: Some(1),
            max_layer: Some(4),
            preferred_layer: 2,
            reason: "r".into(),
        };
        let t = sc.translated(2);
        assert_eq!(t.min_layer, Some(3));
        assert_eq!(t.max_layer, Some(6));
        assert_eq!(t.preferred_layer, 4);
    }
}
