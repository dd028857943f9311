//! `GraphStore`: the authoritative node and edge collections.
//!
//! The store owns every node record (keyed by id for O(1) lookup), the edge
//! set, and mirrored forward/reverse adjacency indexes kept in lockstep with
//! the edges: every edge appears in exactly one forward entry and one reverse
//! entry. Topology derived from the adjacency (topological order, layers) is
//! cached in a `OnceCell` and invalidated on every mutation.
//!
//! The store knows nothing about grid occupancy; the engine pairs it with a
//! [`PositionMap`](crate::grid::position_map::PositionMap) and keeps the two
//! in the same transaction.

use crate::graph::edge::Edge;
use crate::graph::node::{Node, NodeId};
use crate::graph::topo::{TopologyCache, compute_topology};
use crate::grid::position::GridPosition;
use crate::layout_error::LayoutError;
use once_cell::sync::OnceCell;
use std::collections::HashMap;

/// Anything that caches derived topology should implement this.
pub trait InvalidateCache {
    /// Invalidate *all* internal caches so future queries recompute correctly.
    fn invalidate_cache(&mut self);
}

// Blanket impl for Box<T>
impl<T: InvalidateCache + ?Sized> InvalidateCache for Box<T> {
    #[inline]
    fn invalidate_cache(&mut self) {
        (**self).invalidate_cache();
    }
}

/// In-memory node/edge store with mirrored adjacency.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    adjacency_out: HashMap<NodeId, Vec<NodeId>>,
    adjacency_in: HashMap<NodeId, Vec<NodeId>>,
    topo: OnceCell<TopologyCache>,
}

impl GraphStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node record.
    ///
    /// The caller is responsible for having reserved the node's cell in the
    /// position map first; the store only guards id uniqueness.
    ///
    /// # Errors
    /// [`LayoutError::DuplicateNode`] if the id is already present.
    pub fn insert_node(&mut self, node: Node) -> Result<(), LayoutError> {
        if self.nodes.contains_key(&node.id) {
            return Err(LayoutError::DuplicateNode(node.id));
        }
        let id = node.id;
        self.nodes.insert(id, node);
        self.adjacency_out.entry(id).or_default();
        self.adjacency_in.entry(id).or_default();
        self.invalidate_cache();
        #[cfg(debug_assertions)]
        self.debug_assert_consistent();
        Ok(())
    }

    /// Add a directed edge `from -> to`, mirroring it into both adjacency
    /// indexes. Adding an existing edge is a no-op (no parallel edges).
    ///
    /// The store does not check topological validity here; that is the
    /// validator's job, invoked by the caller after a placement completes.
    ///
    /// # Errors
    /// [`LayoutError::UnknownNode`] if either endpoint does not exist.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool, LayoutError> {
        if !self.nodes.contains_key(&from) {
            return Err(LayoutError::UnknownNode(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(LayoutError::UnknownNode(to));
        }
        let outs = self.adjacency_out.entry(from).or_default();
        if outs.contains(&to) {
            return Ok(false);
        }
        outs.push(to);
        self.adjacency_in.entry(to).or_default().push(from);
        self.edges.push(Edge::new(from, to));
        self.invalidate_cache();
        #[cfg(debug_assertions)]
        self.debug_assert_consistent();
        Ok(true)
    }

    /// Look up a node by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Whether a node with this id exists.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Whether the edge `from -> to` exists.
    #[inline]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.adjacency_out
            .get(&from)
            .is_some_and(|v| v.contains(&to))
    }

    /// Overwrite a node's recorded cell. Internal to the engine, which keeps
    /// the position map in the same transaction.
    pub(crate) fn set_position(&mut self, id: NodeId, position: GridPosition) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
        }
    }

    /// Successor ids of `id` (forward adjacency).
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency_out
            .get(&id)
            .map(|v| v.iter().copied())
            .unwrap_or_else(|| [].iter().copied())
    }

    /// Predecessor ids of `id` (reverse adjacency).
    pub fn predecessors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency_in
            .get(&id)
            .map(|v| v.iter().copied())
            .unwrap_or_else(|| [].iter().copied())
    }

    /// The branch of `root`: every node reachable via forward adjacency,
    /// including `root` itself, in deterministic (id-sorted) order.
    pub fn downstream_branch(&self, root: NodeId) -> Vec<NodeId> {
        use std::collections::HashSet;
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                stack.extend(self.successors(id));
            }
        }
        let mut branch: Vec<NodeId> = seen.into_iter().collect();
        branch.sort_unstable();
        branch
    }

    /// Iterate over all node records in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over all node ids in arbitrary order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Cached topological order and layers, recomputed on demand after any
    /// mutation.
    ///
    /// # Errors
    /// [`LayoutError::CycleDetected`] if the graph is not a DAG.
    #[inline]
    pub fn topology(&self) -> Result<&TopologyCache, LayoutError> {
        self.topo.get_or_try_init(|| compute_topology(self))
    }

    /// Reset to the empty graph. No failure mode.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.adjacency_out.clear();
        self.adjacency_in.clear();
        self.invalidate_cache();
    }

    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_consistent(&self) {
        for (src, outs) in &self.adjacency_out {
            for dst in outs {
                let ok = self
                    .adjacency_in
                    .get(dst)
                    .is_some_and(|ins| ins.contains(src));
                debug_assert!(
                    ok,
                    "Missing mirror in[{dst:?}] for out edge ({src:?} -> {dst:?})"
                );
            }
        }
        for (dst, ins) in &self.adjacency_in {
            for src in ins {
                let ok = self
                    .adjacency_out
                    .get(src)
                    .is_some_and(|outs| outs.contains(dst));
                debug_assert!(
                    ok,
                    "Missing mirror out[{src:?}] for in edge ({src:?} -> {dst:?})"
                );
            }
        }
        debug_assert_eq!(
            self.edges.len(),
            self.adjacency_out.values().map(Vec::len).sum::<usize>(),
            "edge list out of sync with forward adjacency"
        );
    }
}

impl InvalidateCache for GraphStore {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.topo.take();
    }
}
