//! Authoritative graph state: node and edge records plus derived topology.
//!
//! This module provides:
//! - Strongly-typed node identity and the node/edge records
//! - The [`GraphStore`](store::GraphStore) with mirrored adjacency indexes
//! - Cached topological order and layer computation

pub mod edge;
pub mod node;
pub mod store;
pub mod topo;

pub use edge::Edge;
pub use node::{Node, NodeId};
pub use store::{GraphStore, InvalidateCache};
pub use topo::{TopologyCache, compute_topology};
