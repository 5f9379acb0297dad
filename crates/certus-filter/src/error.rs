//! Evaluation-time errors.

use certus_core::ShapeError;
use thiserror::Error;

/// Errors returned when a stage is built or called with unusable inputs.
///
/// An uncertain sign is not an error; see [`Sign::Uncertain`](crate::Sign::Uncertain).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The input slice does not match the stage's arity.
    #[error("expected {expected} inputs, got {found}")]
    InputCount {
        /// Arity of the stage.
        expected: usize,
        /// Length of the supplied slice.
        found: usize,
    },

    /// Inputs must be finite real numbers.
    #[error("input {index} is not finite")]
    NonFiniteInput {
        /// 0-based position in the input slice.
        index: usize,
    },

    /// Stages chained into one predicate must agree on their input count.
    #[error("stage expects {found} inputs, predicate takes {expected}")]
    StageArity {
        /// Arity of the predicate.
        expected: usize,
        /// Arity of the rejected stage.
        found: usize,
    },

    /// The stage could not be built.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
