//! # certus-core
//!
//! Expression representation for the Certus robust-predicate engine.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Type-safe 32-bit expression handles
//! - Static node properties (leaf, sign-exact, non-negative) derived once per shape
//! - Deduplicated post-order traversal with anchor predicates
//!
//! ## Design Principles
//!
//! - **Shapes, not values**: every property stored here depends only on the
//!   formula, never on the inputs it is later evaluated with
//! - **Hash-Consing**: structurally identical sub-expressions share one handle,
//!   so "the same sub-expression" is plain handle equality
//! - **Immutable after construction**: compiled consumers copy what they need
//!   and can be shared across threads without locking

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod error;
pub mod expr;
pub mod handle;
pub mod props;
pub mod traversal;

pub use arena::ExprArena;
pub use error::ShapeError;
pub use expr::{Arity, BinaryOp, ExprNode, OpKind};
pub use handle::ExprHandle;
pub use props::NodeProps;
pub use traversal::{is_leaf, is_sign_exact, post_order};
