//! Opt-in invariant checking for the engine's paired state.
//!
//! Debug builds, and release builds with the `strict-invariants` or
//! `check-invariants` feature, re-validate the store/position-map pairing
//! after every public mutation. Release builds without those features pay
//! nothing.

use crate::layout_error::LayoutError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), LayoutError>;
}

/// Run a fallible check and panic on error when invariant checking is
/// enabled; compiles to nothing otherwise.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
