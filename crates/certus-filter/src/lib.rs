//! # certus-filter
//!
//! Floating-point sign filters for robust predicates.
//!
//! This crate provides:
//! - [`Sign`], the four-valued answer of every stage
//! - [`SignsOnlyFilter`], which certifies signs from floating-point
//!   approximations of sign-exact sub-expressions plus sign-combination rules
//! - [`SignStage`] and [`StagedPredicate`] for chaining a filter with more
//!   precise fallback stages
//!
//! ## Soundness
//!
//! A filter may answer [`Sign::Uncertain`] whenever rounding could affect the
//! result. A definite answer is always the true mathematical sign.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod approximate;
pub mod deduce;
pub mod error;
pub mod filter;
mod plan;
pub mod sign;
pub mod stage;

pub use error::FilterError;
pub use filter::{check_inputs, SignsOnlyFilter};
pub use sign::Sign;
pub use stage::{SignStage, StagedPredicate};
