//! # Certus
//!
//! Robust geometric predicates built from floating-point sign filters.
//!
//! A predicate is a formula over `f64` arguments whose sign must be
//! reported correctly even when rounding would flip a naive evaluation.
//! Certus compiles the formula into a signs-only filter, which answers most
//! queries from a handful of floating-point operations, and falls back to
//! exact rational arithmetic only when the filter is uncertain.
//!
//! ## Features
//!
//! - **Hash-consed formulas**: shared sub-expressions are built once
//! - **Signs-only filter**: sign-exact sub-expressions plus sign deduction
//! - **Staged evaluation**: cheap stages first, exact stage last
//! - **Ready-made predicates**: `orient2d` and `incircle`
//!
//! ## Quick Start
//!
//! ```rust
//! use certus::prelude::*;
//!
//! let left = orient2d((0.0, 0.0), (1.0, 0.0), (0.0, 1.0)).unwrap();
//! assert_eq!(left, Sign::Positive);
//!
//! let mut arena = ExprArena::new();
//! let a = arena.argument(1).unwrap();
//! let b = arena.argument(2).unwrap();
//! let root = arena.difference(a, b);
//! let filter = SignsOnlyFilter::new(&arena, root).unwrap();
//! assert_eq!(filter.evaluate_sign(&[3.0, 2.0]).unwrap(), Sign::Positive);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use certus_core as core;
#[cfg(feature = "exact")]
pub use certus_exact as exact;
pub use certus_filter as filter;

pub mod predicates;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::predicates::{incircle, orient2d, Point, Predicate};
    pub use certus_core::{ExprArena, ExprHandle, ExprNode, ShapeError};
    #[cfg(feature = "exact")]
    pub use certus_exact::RationalStage;
    pub use certus_filter::{FilterError, Sign, SignStage, SignsOnlyFilter, StagedPredicate};
}
