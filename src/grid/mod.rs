//! Grid occupancy: cell keys and the authoritative position index.

pub mod position;
pub mod position_map;

pub use position::GridPosition;
pub use position_map::{Displacement, PositionMap};
