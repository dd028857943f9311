//! `GridPosition`: a value-typed cell key on the infinite integer grid.
//!
//! Columns grow eastwards with topological depth; rows are free-form lanes.
//! Two live nodes must never share a `GridPosition` (the core uniqueness
//! invariant, enforced by the position map).

use std::fmt;

/// A `(col, row)` integer pair used as a lookup key.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct GridPosition {
    /// Horizontal coordinate; encodes topological layer.
    pub col: i64,
    /// Vertical coordinate; a free lane index.
    pub row: i64,
}

impl GridPosition {
    /// Construct a position from raw coordinates.
    #[inline]
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// The origin cell `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// This position translated by `(dc, dr)`.
    #[inline]
    pub const fn offset(self, dc: i64, dr: i64) -> Self {
        Self::new(self.col + dc, self.row + dr)
    }

    /// Chebyshev (chessboard) distance to `other`.
    #[inline]
    pub fn chebyshev_distance(self, other: Self) -> i64 {
        (self.col - other.col)
            .abs()
            .max((self.row - other.row).abs())
    }
}

impl fmt::Debug for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl From<(i64, i64)> for GridPosition {
    fn from((col, row): (i64, i64)) -> Self {
        Self::new(col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_translates_both_axes() {
        let p = GridPosition::new(2, -1);
        assert_eq!(p.offset(1, 0), GridPosition::new(3, -1));
        assert_eq!(p.offset(-3, 4), GridPosition::new(-1, 3));
    }

    #[test]
    fn chebyshev_distance_is_max_axis() {
        let a = GridPosition::new(0, 0);
        assert_eq!(a.chebyshev_distance(GridPosition::new(3, 1)), 3);
        assert_eq!(a.chebyshev_distance(GridPosition::new(-2, -5)), 5);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn display_and_debug() {
        let p = GridPosition::new(1, 2);
        assert_eq!(format!("{p}"), "(1, 2)");
        assert_eq!(format!("{p:?}"), "(1, 2)");
    }

    #[test]
    fn usable_as_map_key() {
        use std::collections::HashMap;
        let mut m = HashMap::new();
        m.insert(GridPosition::new(1, 2), "a");
        m.insert(GridPosition::new(2, 1), "b");
        assert_eq!(m.len(), 2);
        assert_eq!(m[&GridPosition::new(1, 2)], "a");
    }

    #[test]
    fn serde_roundtrip() {
        let p = GridPosition::new(-7, 9);
        let s = serde_json::to_string(&p).unwrap();
        let p2: GridPosition = serde_json::from_str(&s).unwrap();
        assert_eq!(p, p2);
    }
}
