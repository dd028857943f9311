//! `GridLayoutEngine`: the public mutation surface.
//!
//! The engine owns the graph store, the position map, and the recorded
//! per-node spatial constraints, and keeps the three in step: every mutating
//! operation either completes or leaves all of them untouched. Intent-driven
//! insertions run the whole pipeline (generate constraints, solve, apply
//! displacements, insert, connect, re-layer, validate); the low-level
//! primitives `add_node` / `add_edge` bypass it and never re-layer.
//!
//! Observation is injected: an optional [`LayoutObserver`] receives a
//! [`LayoutEvent`] per mutation, and every operation returns the
//! [`LayoutDelta`] describing what it changed.

use crate::graph::edge::Edge;
use crate::graph::node::{Node, NodeId};
use crate::graph::store::GraphStore;
use crate::grid::position::GridPosition;
use crate::grid::position_map::PositionMap;
use crate::layout::constraints::{SpatialConstraint, generate_constraints};
use crate::layout::intent::{IntentKind, PlacementIntent};
use crate::layout::layering::relayer;
use crate::layout::solver::solve;
use crate::layout_error::LayoutError;
use crate::observe::{LayoutDelta, LayoutEvent, LayoutObserver};
use crate::validate::{check_no_overlaps, validate_no_overlaps, validate_topological_order};
use crate::{DebugInvariants, debug_invariants};
use std::collections::HashMap;

/// Incremental DAG grid-layout engine.
///
/// Single-threaded by design: operations are serialized by `&mut self`.
#[derive(Default)]
pub struct GridLayoutEngine {
    store: GraphStore,
    positions: PositionMap,
    /// Recorded placement intent per node, folded into every layering pass.
    spatial: HashMap<NodeId, SpatialConstraint>,
    observer: Option<Box<dyn LayoutObserver>>,
}

impl GridLayoutEngine {
    /// Creates an empty engine with no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty engine that reports every mutation to `observer`.
    pub fn with_observer(observer: impl LayoutObserver + 'static) -> Self {
        Self {
            observer: Some(Box::new(observer)),
            ..Self::default()
        }
    }

    /// Install or replace the observer. Events are delivered from the next
    /// mutation on; there is no replay of past mutations.
    pub fn set_observer(&mut self, observer: impl LayoutObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    // ---- low-level primitives ------------------------------------------

    /// Insert a fully specified node at its recorded cell.
    ///
    /// Bypasses the placement pipeline: no constraints are generated, no
    /// re-layering runs, and the node keeps the given cell until an
    /// intent-driven insertion re-layers the graph.
    ///
    /// # Errors
    /// - [`LayoutError::DuplicateNode`] if the id already exists.
    /// - [`LayoutError::PositionOccupied`] if the cell is taken. Nothing is
    ///   mutated in either case.
    pub fn add_node(&mut self, node: Node) -> Result<LayoutDelta, LayoutError> {
        if self.store.contains(node.id) {
            return Err(LayoutError::DuplicateNode(node.id));
        }
        if let Some(occupant) = self.positions.occupant(node.position) {
            return Err(LayoutError::PositionOccupied {
                position: node.position,
                occupant,
            });
        }
        let id = node.id;
        let position = node.position;
        let reserved = self.positions.reserve(id, position);
        debug_assert!(reserved);
        self.store.insert_node(node)?;
        self.debug_assert_invariants();
        self.emit(&LayoutEvent::NodeAdded {
            node: id,
            position,
            strategy: None,
        });
        Ok(LayoutDelta {
            nodes_added: vec![id],
            ..Default::default()
        })
    }

    /// Create the edge `from -> to` between existing nodes.
    ///
    /// Bypasses the placement pipeline and performs no topological check;
    /// an edge that violates column ordering (or closes a cycle) leaves
    /// every position intact and is reported by
    /// [`validate_topological_order`](Self::validate_topological_order).
    /// Adding an existing edge is a no-op with an empty delta.
    ///
    /// # Errors
    /// [`LayoutError::UnknownNode`] if either endpoint is missing.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<LayoutDelta, LayoutError> {
        if !self.store.add_edge(from, to)? {
            return Ok(LayoutDelta::default());
        }
        let edge = Edge::new(from, to);
        self.emit(&LayoutEvent::EdgeAdded { edge });
        Ok(LayoutDelta {
            edges_added: vec![edge],
            ..Default::default()
        })
    }

    // ---- intent-driven insertions --------------------------------------

    /// Insert `id` downstream of `anchor` (east of it, with `anchor -> id`).
    ///
    /// Runs the full pipeline; on success the delta lists the new node, the
    /// new edge, every node the solver or the layering pass moved, and the
    /// strategy that chose the cell.
    ///
    /// # Errors
    /// - [`LayoutError::DuplicateNode`] / [`LayoutError::UnknownAnchor`]
    ///   abort with no mutation.
    /// - [`LayoutError::CycleDetected`] if the existing graph already
    ///   contains a cycle (from primitive edges); nothing is mutated.
    pub fn add_node_downstream(
        &mut self,
        id: NodeId,
        anchor: NodeId,
    ) -> Result<LayoutDelta, LayoutError> {
        self.guard_anchored(id, anchor)?;
        self.insert_with_intent(PlacementIntent::downstream(id, anchor))
    }

    /// Insert `id` upstream of `anchor` (west of it, with `id -> anchor`).
    ///
    /// Same pipeline and error contract as
    /// [`add_node_downstream`](Self::add_node_downstream).
    pub fn add_node_upstream(
        &mut self,
        id: NodeId,
        anchor: NodeId,
    ) -> Result<LayoutDelta, LayoutError> {
        self.guard_anchored(id, anchor)?;
        self.insert_with_intent(PlacementIntent::upstream(id, anchor))
    }

    /// Insert `id` with no relation to any existing node: column 0 of the
    /// first empty row below every placed node (origin if the graph is
    /// empty). Never displaces anything and never re-layers.
    ///
    /// # Errors
    /// [`LayoutError::DuplicateNode`] if the id already exists.
    pub fn add_disconnected_node(&mut self, id: NodeId) -> Result<LayoutDelta, LayoutError> {
        if self.store.contains(id) {
            return Err(LayoutError::DuplicateNode(id));
        }
        self.insert_with_intent(PlacementIntent::disconnected(id))
    }

    /// Reset to the empty graph. Infallible; recorded constraints are
    /// dropped with the nodes they described.
    pub fn clear(&mut self) {
        self.store.clear();
        self.positions.clear();
        self.spatial.clear();
        self.emit(&LayoutEvent::Cleared);
    }

    // ---- queries -------------------------------------------------------

    /// Look up a node by id.
    #[inline]
    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    /// Whether any node holds `position`.
    #[inline]
    pub fn is_position_occupied(&self, position: GridPosition) -> bool {
        self.positions.is_occupied(position)
    }

    /// Whether the edge `from -> to` exists.
    #[inline]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.store.has_edge(from, to)
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Iterate over all node records in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.store.nodes()
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.store.edges()
    }

    /// Whether no two nodes share a cell and the position map matches the
    /// store. Logs the first finding at warn level.
    pub fn validate_no_overlaps(&self) -> bool {
        validate_no_overlaps(&self.store, &self.positions)
    }

    /// Whether every edge runs strictly west-to-east. Logs the first
    /// finding at warn level.
    pub fn validate_topological_order(&self) -> bool {
        validate_topological_order(&self.store)
    }

    // ---- pipeline internals --------------------------------------------

    fn guard_anchored(&self, id: NodeId, anchor: NodeId) -> Result<(), LayoutError> {
        if self.store.contains(id) {
            return Err(LayoutError::DuplicateNode(id));
        }
        if !self.store.contains(anchor) {
            return Err(LayoutError::UnknownAnchor(anchor));
        }
        // A fresh node with one edge cannot close a cycle, so a cyclic graph
        // here means primitive edges already broke the DAG. Abort before
        // mutating rather than failing mid-pipeline.
        self.store.topology()?;
        Ok(())
    }

    /// One intent, end to end. For anchored intents this is the whole
    /// pipeline; disconnected intents stop after the insertion.
    fn insert_with_intent(&mut self, intent: PlacementIntent) -> Result<LayoutDelta, LayoutError> {
        let constraints = generate_constraints(&intent, &self.store);
        let result = solve(&intent, &constraints, &self.store, &self.positions);

        let mut delta = LayoutDelta {
            strategy: Some(result.strategy),
            ..Default::default()
        };
        let mut events = Vec::new();

        // Solver displacements first, atomically; the store and the
        // recorded constraints follow the map.
        if !result.displacements.is_empty() {
            self.positions.move_batch(&result.displacements)?;
            for d in &result.displacements {
                self.store.set_position(d.node, d.to);
                if let Some(sc) = self.spatial.remove(&d.node) {
                    self.spatial
                        .insert(d.node, sc.translated(d.to.col - d.from.col));
                }
                delta.nodes_moved.push(*d);
                events.push(LayoutEvent::NodeMoved {
                    node: d.node,
                    from: d.from,
                    to: d.to,
                });
            }
        }

        // Land the new node on the solved cell.
        let id = intent.new_node;
        if let Some(occupant) = self.positions.occupant(result.position) {
            // Unreachable when the solver holds its contract; surfacing the
            // conflict beats silently stacking nodes.
            return Err(LayoutError::PositionOccupied {
                position: result.position,
                occupant,
            });
        }
        let reserved = self.positions.reserve(id, result.position);
        debug_assert!(reserved);
        self.store.insert_node(Node::new(id, result.position))?;
        delta.nodes_added.push(id);
        events.push(LayoutEvent::NodeAdded {
            node: id,
            position: result.position,
            strategy: Some(result.strategy),
        });

        // Anchored intents connect, record their constraint, and re-layer.
        if let Some(anchor) = intent.anchor {
            let anchor_col = self
                .store
                .node(anchor)
                .ok_or(LayoutError::UnknownAnchor(anchor))?
                .position
                .col;
            let (edge, recorded) = match intent.kind {
                IntentKind::AdjacentDownstream => (
                    Edge::new(anchor, id),
                    SpatialConstraint {
                        min_layer: Some(anchor_col + 1),
                        max_layer: None,
                        preferred_layer: result.position.col,
                        reason: intent.reason.clone(),
                    },
                ),
                IntentKind::AdjacentUpstream => (
                    Edge::new(id, anchor),
                    SpatialConstraint {
                        min_layer: None,
                        max_layer: Some(anchor_col - 1),
                        preferred_layer: result.position.col,
                        reason: intent.reason.clone(),
                    },
                ),
                IntentKind::Disconnected => unreachable!("disconnected intents carry no anchor"),
            };
            self.store.add_edge(edge.from, edge.to)?;
            self.spatial.insert(id, recorded);
            delta.edges_added.push(edge);
            events.push(LayoutEvent::EdgeAdded { edge });

            let effective = self.effective_spatial();
            let outcome = relayer(&mut self.store, &mut self.positions, &effective)?;
            for m in &outcome.moves {
                events.push(LayoutEvent::NodeMoved {
                    node: m.node,
                    from: m.from,
                    to: m.to,
                });
            }
            for &skipped in &outcome.skipped {
                events.push(LayoutEvent::MoveSkipped { node: skipped });
            }
            delta.nodes_moved.extend(outcome.moves);
            delta.moves_skipped = outcome.skipped;
        }

        self.debug_assert_invariants();
        for event in &events {
            self.emit(event);
        }
        Ok(delta)
    }

    /// The constraint map a layering pass sees: recorded constraints, plus
    /// an implicit "hold your current column" preference for every node
    /// placed without one, so primitive-placed nodes are never dragged west
    /// by a recompute (they still move east when ordering demands it).
    fn effective_spatial(&self) -> HashMap<NodeId, SpatialConstraint> {
        let mut map = self.spatial.clone();
        for node in self.store.nodes() {
            map.entry(node.id).or_insert_with(|| SpatialConstraint {
                min_layer: None,
                max_layer: None,
                preferred_layer: node.position.col,
                reason: "hold current column".to_owned(),
            });
        }
        map
    }

    fn emit(&mut self, event: &LayoutEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(event);
        }
    }
}

impl DebugInvariants for GridLayoutEngine {
    fn debug_assert_invariants(&self) {
        debug_invariants!(self.validate_invariants(), "engine state");
    }

    fn validate_invariants(&self) -> Result<(), LayoutError> {
        check_no_overlaps(&self.store, &self.positions)
    }
}
