//! `Edge`: a directed dependency between two placed nodes.
//!
//! An edge `(from, to)` states that `from` is upstream of `to`: after every
//! completed operation, `from`'s column is strictly west of `to`'s. Edges are
//! immutable once created and carry no payload; equality is purely on the
//! endpoint pair.

use crate::graph::node::NodeId;

/// A directed connection from `from` (upstream) to `to` (downstream).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    /// Upstream endpoint.
    pub from: NodeId,
    /// Downstream endpoint.
    pub to: NodeId,
}

impl Edge {
    /// Construct a new edge `from -> to`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flowgrid::graph::edge::Edge;
    /// use flowgrid::graph::node::NodeId;
    /// let e = Edge::new(NodeId::new(1), NodeId::new(2));
    /// assert_eq!(e.from.get(), 1);
    /// assert_eq!(e.to.get(), 2);
    /// ```
    #[inline]
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Edge { from, to }
    }

    /// Returns the `(from, to)` endpoints.
    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.from, self.to)
    }
}
