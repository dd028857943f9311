//! Topology computation: topological order and depth layers for the DAG.
//!
//! This module provides [`TopologyCache`], the precomputed topological order
//! and per-node depth layers, and [`compute_topology`], the Kahn's-algorithm
//! pass that builds it from a [`GraphStore`]'s adjacency.
//!
//! # Errors
//! * [`LayoutError::CycleDetected`]: the graph contains a cycle, so no
//!   topological order exists.

use crate::graph::node::NodeId;
use crate::graph::store::GraphStore;
use crate::layout_error::LayoutError;
use std::collections::HashMap;

/// Precomputed topological information for the graph.
///
/// - `order` is a full topological order of the node set, deterministic for a
///   given graph (ties broken by node id).
/// - `layer[n]` = 0 for sources, else `1 + max(layer of predecessors)`.
/// - `diameter` = the maximum layer observed.
#[derive(Clone, Debug, Default)]
pub struct TopologyCache {
    /// Nodes in topological order.
    pub order: Vec<NodeId>,
    /// Map from node to its pure topological layer.
    pub layer: HashMap<NodeId, u32>,
    /// Maximum layer over all nodes.
    pub diameter: u32,
}

/// Build the topological order and layers for every node in the store.
///
/// ## Complexity
/// O(|V| log |V| + |E|): Kahn's sort with an id-sorted ready set for
/// deterministic output, plus one forward pass for layers.
///
/// # Errors
/// [`LayoutError::CycleDetected`] if the sort cannot order every node; the
/// caller must leave positions unchanged in that case.
pub fn compute_topology(store: &GraphStore) -> Result<TopologyCache, LayoutError> {
    // 1) Seed in-degrees from the authoritative node set.
    let mut in_deg: HashMap<NodeId, u32> = store.node_ids().map(|id| (id, 0)).collect();
    for id in store.node_ids() {
        for succ in store.successors(id) {
            if let Some(d) = in_deg.get_mut(&succ) {
                *d += 1;
            }
        }
    }

    // 2) Kahn's topological sort. The ready set is kept sorted descending so
    //    popping yields ascending ids, making the order deterministic.
    let mut ready: Vec<NodeId> = in_deg
        .iter()
        .filter_map(|(&id, &d)| (d == 0).then_some(id))
        .collect();
    ready.sort_unstable_by(|a, b| b.cmp(a));

    let mut order = Vec::with_capacity(in_deg.len());
    while let Some(id) = ready.pop() {
        order.push(id);
        for succ in store.successors(id) {
            if let Some(d) = in_deg.get_mut(&succ) {
                *d -= 1;
                if *d == 0 {
                    let at = ready
                        .binary_search_by(|probe| succ.cmp(probe))
                        .unwrap_or_else(|e| e);
                    ready.insert(at, succ);
                }
            }
        }
    }

    if order.len() != in_deg.len() {
        return Err(LayoutError::CycleDetected);
    }

    // 3) layer[n] = 1 + max(layer of predecessors), 0 for sources.
    let mut layer = HashMap::with_capacity(order.len());
    for &id in &order {
        let l = store
            .predecessors(id)
            .map(|pred| layer.get(&pred).copied().unwrap_or(0))
            .max()
            .map_or(0, |m| m + 1);
        layer.insert(id, l);
    }
    let diameter = layer.values().copied().max().unwrap_or(0);

    Ok(TopologyCache {
        order,
        layer,
        diameter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::Node;

    fn n(i: u64) -> NodeId {
        NodeId::new(i)
    }

    fn store_with_chain() -> GraphStore {
        // 1 -> 2 -> 3 -> 4
        let mut s = GraphStore::new();
        for (i, col) in [(1u64, 0), (2, 1), (3, 2), (4, 3)] {
            s.insert_node(Node::at(n(i), col, 0)).unwrap();
        }
        s.add_edge(n(1), n(2)).unwrap();
        s.add_edge(n(2), n(3)).unwrap();
        s.add_edge(n(3), n(4)).unwrap();
        s
    }

    #[test]
    fn chain_layers_and_diameter() {
        let s = store_with_chain();
        let t = compute_topology(&s).unwrap();
        assert_eq!(t.layer[&n(1)], 0);
        assert_eq!(t.layer[&n(2)], 1);
        assert_eq!(t.layer[&n(3)], 2);
        assert_eq!(t.layer[&n(4)], 3);
        assert_eq!(t.diameter, 3);
        assert_eq!(t.order, vec![n(1), n(2), n(3), n(4)]);
    }

    #[test]
    fn diamond_takes_longest_path() {
        // 1 -> 2 -> 4, 1 -> 3 -> 4, plus 2 -> 3
        let mut s = GraphStore::new();
        for i in 1..=4u64 {
            s.insert_node(Node::at(n(i), i as i64, 0)).unwrap();
        }
        s.add_edge(n(1), n(2)).unwrap();
        s.add_edge(n(1), n(3)).unwrap();
        s.add_edge(n(2), n(3)).unwrap();
        s.add_edge(n(2), n(4)).unwrap();
        s.add_edge(n(3), n(4)).unwrap();
        let t = compute_topology(&s).unwrap();
        assert_eq!(t.layer[&n(1)], 0);
        assert_eq!(t.layer[&n(2)], 1);
        assert_eq!(t.layer[&n(3)], 2);
        assert_eq!(t.layer[&n(4)], 3);
    }

    #[test]
    fn isolated_nodes_are_sources() {
        let mut s = GraphStore::new();
        s.insert_node(Node::at(n(42), 5, 5)).unwrap();
        let t = compute_topology(&s).unwrap();
        assert_eq!(t.layer[&n(42)], 0);
        assert_eq!(t.diameter, 0);
    }

    #[test]
    fn cycle_is_detected() {
        let mut s = store_with_chain();
        s.add_edge(n(4), n(1)).unwrap();
        assert!(matches!(
            compute_topology(&s),
            Err(LayoutError::CycleDetected)
        ));
    }

    #[test]
    fn order_is_deterministic_across_runs() {
        // Fan-out where several nodes become ready at once.
        let mut s = GraphStore::new();
        for i in 1..=5u64 {
            s.insert_node(Node::at(n(i), 0, i as i64)).unwrap();
        }
        s.add_edge(n(1), n(3)).unwrap();
        s.add_edge(n(1), n(2)).unwrap();
        s.add_edge(n(1), n(5)).unwrap();
        s.add_edge(n(1), n(4)).unwrap();
        let a = compute_topology(&s).unwrap().order;
        let b = compute_topology(&s).unwrap().order;
        assert_eq!(a, b);
        assert_eq!(a, vec![n(1), n(2), n(3), n(4), n(5)]);
    }

    #[test]
    fn empty_store() {
        let s = GraphStore::new();
        let t = compute_topology(&s).unwrap();
        assert!(t.order.is_empty());
        assert_eq!(t.diameter, 0);
    }
}
