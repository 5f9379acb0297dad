//! # certus-exact
//!
//! Exact rational evaluation for Certus predicates.
//!
//! This crate wraps `dashu` rationals to provide:
//! - Exact conversion of `f64` inputs (`exact_from_f64`)
//! - [`RationalStage`], a stage that is never uncertain, used as the last
//!   link of a staged predicate and as the reference for soundness testing
//!
//! ## Performance Notes
//!
//! Every call allocates one rational per sub-expression. Run it behind a
//! [`SignsOnlyFilter`](certus_filter::SignsOnlyFilter) so it only sees the
//! inputs the filter could not settle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod rational;
pub mod stage;

#[cfg(test)]
mod proptests;

pub use rational::exact_from_f64;
pub use stage::{exact_sign, RationalStage};
