#![cfg_attr(docsrs, feature(doc_cfg))]
//! # flowgrid
//!
//! flowgrid is an incremental grid-layout engine for directed acyclic graphs:
//! nodes live on an infinite 2-D integer grid, a node's column tracks its
//! topological depth (upstream strictly west, downstream strictly east), and
//! every cell holds at most one node. The engine inserts nodes adjacent to an
//! anchor (or disconnected), resolves conflicts through a multi-strategy
//! placement solver, and re-derives topological layering for the whole graph
//! after every relative insertion.
//!
//! ## Features
//! - Graph store with mirrored forward/reverse adjacency and a cached,
//!   invalidate-on-mutation topology (order, layers, diameter)
//! - Position map holding the cell-to-node bijection, with transactional
//!   displacement batches that either fully apply or leave it untouched
//! - Declarative placement intents compiled to hard/soft constraints and
//!   solved by a fixed strategy ladder, local solutions before distant ones
//! - Kahn's-algorithm layering that folds recorded spatial constraints into
//!   each recompute
//! - Injected observers and per-operation deltas instead of global logging
//! - Overlap and ordering validators, plus opt-in invariant checking behind
//!   the `strict-invariants` / `check-invariants` features
//!
//! ## Determinism
//!
//! Every operation is deterministic: ties in the topological order are broken
//! by ascending node id, the solver probes candidate cells in a fixed order,
//! and nothing in the engine consults a clock or random source for layout
//! decisions.
//!
//! ## Usage
//! ```rust
//! use flowgrid::prelude::*;
//!
//! let mut engine = GridLayoutEngine::new();
//! engine.add_node(Node::at(NodeId::new(1), 1, 2))?;
//! let delta = engine.add_node_downstream(NodeId::new(2), NodeId::new(1))?;
//! assert_eq!(delta.nodes_added, vec![NodeId::new(2)]);
//! assert_eq!(
//!     engine.find_node(NodeId::new(2)).unwrap().position,
//!     GridPosition::new(2, 2),
//! );
//! assert!(engine.validate_no_overlaps());
//! assert!(engine.validate_topological_order());
//! # Ok::<(), flowgrid::LayoutError>(())
//! ```

pub mod debug_invariants;
pub mod engine;
pub mod graph;
pub mod grid;
pub mod layout;
pub mod layout_error;
pub mod observe;
pub mod validate;

pub use debug_invariants::DebugInvariants;
pub use layout_error::LayoutError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::engine::GridLayoutEngine;
    pub use crate::graph::edge::Edge;
    pub use crate::graph::node::{Node, NodeId};
    pub use crate::graph::store::{GraphStore, InvalidateCache};
    pub use crate::grid::position::GridPosition;
    pub use crate::grid::position_map::{Displacement, PositionMap};
    pub use crate::layout::constraints::{
        PlacementConstraints, SpatialConstraint, generate_constraints,
    };
    pub use crate::layout::intent::{IntentKind, PlacementIntent};
    pub use crate::layout::solver::{PlacementResult, PlacementStrategy, solve};
    pub use crate::layout_error::LayoutError;
    pub use crate::observe::{LayoutDelta, LayoutEvent, LayoutObserver};
}
