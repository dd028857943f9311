//! The placement pipeline: intent → constraints → solver → layering.
//!
//! This module provides the pieces the engine wires together for one
//! insertion:
//! - [`intent`]: the declarative placement request
//! - [`constraints`]: hard/soft constraint generation and the persistent
//!   per-node spatial constraints
//! - [`solver`]: the multi-strategy search for a concrete free cell
//! - [`layering`]: the whole-graph column recompute that runs after every
//!   structural change

pub mod constraints;
pub mod intent;
pub mod layering;
pub mod solver;

pub use constraints::{
    HardConstraint, PlacementConstraints, SoftConstraint, SpatialConstraint, generate_constraints,
};
pub use intent::{IntentKind, PlacementIntent};
pub use layering::{LayeringOutcome, relayer};
pub use solver::{PlacementResult, PlacementStrategy, satisfies_hard_constraints, solve};
