//! Construction-time errors.

use thiserror::Error;

use crate::handle::ExprHandle;

/// A formula shape that cannot be compiled.
///
/// All of these are detected before any input is evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// Arguments are numbered from 1.
    #[error("argument indices start at 1")]
    ZeroArgumentIndex,

    /// Constants must be finite.
    #[error("constant {value} is not finite")]
    NonFiniteConstant {
        /// The rejected value.
        value: f64,
    },

    /// The handle does not belong to the arena it was used with.
    #[error("handle {handle} is not part of this arena")]
    UnknownHandle {
        /// The offending handle.
        handle: ExprHandle,
    },

    /// The formula reads an argument the declared arity does not provide.
    #[error("argument {index} exceeds declared arity {arity}")]
    ArgumentOutOfRange {
        /// Largest argument index referenced by the formula.
        index: u32,
        /// Declared number of inputs.
        arity: usize,
    },

    /// A node is marked sign-exact but one of its operands is not.
    #[error("operand {handle} of a sign-exact node is not sign-exact")]
    InconsistentProps {
        /// The operand that resolved to a deduced sign.
        handle: ExprHandle,
    },
}
