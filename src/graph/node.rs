//! `NodeId`: a strong, zero-cost handle for graph nodes, plus the `Node` record.
//!
//! Every node in the layout graph is identified by a unique, opaque id.
//! `NodeId` wraps a nonzero `u64` to enforce at compile- and runtime that 0
//! is reserved as an invalid or sentinel value.
//!
//! This module provides:
//! - A transparent `NodeId` newtype around `NonZeroU64` for cheap copying and
//!   memory layout guarantees.
//! - Fallible and panicking constructors with safety checks.
//! - The `Node` record: id, grid position, and a creation timestamp that is
//!   metadata only (equality ignores it).

use crate::grid::position::GridPosition;
use crate::layout_error::LayoutError;
use std::time::SystemTime;
use std::{fmt, num::NonZeroU64};

/// Stable identity of a node for its whole lifetime.
///
/// # Memory layout
/// This type is `repr(transparent)`: it has the same ABI and alignment as its
/// single field (`NonZeroU64`) and can be stored and hashed exactly like a
/// `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns [`LayoutError::InvalidNodeId`] if `raw == 0`; 0 is reserved as
    /// an invalid or sentinel value.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use flowgrid::graph::node::NodeId;
    /// let n = NodeId::try_new(1).unwrap();
    /// assert_eq!(n.get(), 1);
    /// assert!(NodeId::try_new(0).is_err());
    /// ```
    #[inline]
    pub fn try_new(raw: u64) -> Result<Self, LayoutError> {
        NonZeroU64::new(raw)
            .map(NodeId)
            .ok_or(LayoutError::InvalidNodeId)
    }

    /// Creates a new `NodeId`, panicking on zero. Intended for literals in
    /// tests and examples; library code uses [`NodeId::try_new`].
    ///
    /// # Panics
    /// Panics if `raw == 0`.
    #[inline]
    pub fn new(raw: u64) -> Self {
        NodeId(NonZeroU64::new(raw).expect("NodeId must be non-zero"))
    }

    /// Returns the inner `u64` value of this `NodeId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Custom `Debug` implementation to display as `NodeId(raw_value)`.
impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.get()).finish()
    }
}

/// Prints the numeric id without any wrapper text.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// A placed node: identity, current grid cell, and creation time.
///
/// The position is mutated in place by the layering engine and the placement
/// solver; a node is never duplicated under the same id. `created_at` is
/// metadata only and excluded from equality.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Unique, stable identity.
    pub id: NodeId,
    /// Current grid cell; `position.col` is the topological layer.
    pub position: GridPosition,
    /// When the node was created. Metadata only.
    pub created_at: SystemTime,
}

impl Node {
    /// Construct a node at the given cell, timestamped now.
    pub fn new(id: NodeId, position: GridPosition) -> Self {
        Self {
            id,
            position,
            created_at: SystemTime::now(),
        }
    }

    /// Convenience constructor from raw coordinates.
    pub fn at(id: NodeId, col: i64, row: i64) -> Self {
        Self::new(id, GridPosition::new(col, row))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        // created_at is metadata, not identity
        self.id == other.id && self.position == other.position
    }
}

impl Eq for Node {}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_zero_errs() {
        assert_eq!(NodeId::try_new(0), Err(LayoutError::InvalidNodeId));
    }

    #[test]
    fn new_and_get() {
        let n = NodeId::new(42);
        assert_eq!(n.get(), 42);
    }

    #[test]
    fn new_zero_panics() {
        assert!(std::panic::catch_unwind(|| NodeId::new(0)).is_err());
    }

    #[test]
    fn debug_and_display() {
        let n = NodeId::new(7);
        assert_eq!(format!("{:?}", n), "NodeId(7)");
        assert_eq!(format!("{}", n), "7");
    }

    #[test]
    fn ordering_and_hash() {
        let a = NodeId::new(1);
        let b = NodeId::new(2);
        assert!(a < b);
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn max_value() {
        let n = NodeId::new(u64::MAX);
        assert_eq!(n.get(), u64::MAX);
    }

    #[test]
    fn node_equality_ignores_created_at() {
        let a = Node::at(NodeId::new(1), 2, 3);
        let mut b = a.clone();
        b.created_at = SystemTime::UNIX_EPOCH;
        assert_eq!(a, b);
    }

    #[test]
    fn node_equality_observes_position() {
        let a = Node::at(NodeId::new(1), 2, 3);
        let b = Node::at(NodeId::new(1), 2, 4);
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let n = NodeId::new(123);
        let s = serde_json::to_string(&n).unwrap();
        let n2: NodeId = serde_json::from_str(&s).unwrap();
        assert_eq!(n2, n);
    }

    #[test]
    fn bincode_roundtrip() {
        let n = NodeId::new(456);
        let bytes = bincode::serialize(&n).unwrap();
        let n2: NodeId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(n2, n);
    }
}
