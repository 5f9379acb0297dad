//! Staged predicates.
//!
//! A robust predicate is a chain of stages of increasing cost: cheap filters
//! first, an exact evaluator last. Each stage either certifies a sign or
//! answers [`Sign::Uncertain`], in which case the next stage runs on the same
//! inputs.

use std::fmt;

use log::trace;

use crate::error::FilterError;
use crate::sign::Sign;

/// One stage of a robust predicate.
pub trait SignStage {
    /// Number of inputs the stage expects.
    fn arg_count(&self) -> usize;

    /// Returns the certified sign at `inputs`, or [`Sign::Uncertain`].
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] if `inputs` does not fit the stage.
    fn sign(&self, inputs: &[f64]) -> Result<Sign, FilterError>;

    /// True if the stage keeps state between calls. Stateful stages cannot be
    /// shared between concurrent callers.
    fn is_stateful(&self) -> bool {
        false
    }
}

/// A chain of stages sharing one arity, tried in order.
///
/// # Example
/// ```
/// use certus_core::ExprArena;
/// use certus_filter::{Sign, SignStage, SignsOnlyFilter, StagedPredicate};
///
/// let mut arena = ExprArena::new();
/// let a = arena.argument(1)?;
/// let b = arena.argument(2)?;
/// let d = arena.difference(a, b);
/// let root = arena.product(d, a);
///
/// let predicate = StagedPredicate::new(SignsOnlyFilter::new(&arena, root)?);
/// assert_eq!(predicate.sign(&[3.0, 1.0])?, Sign::Positive);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StagedPredicate {
    arg_count: usize,
    stages: Vec<Box<dyn SignStage + Send + Sync>>,
}

impl StagedPredicate {
    /// Starts a chain with its first stage.
    pub fn new<S>(first: S) -> Self
    where
        S: SignStage + Send + Sync + 'static,
    {
        Self {
            arg_count: first.arg_count(),
            stages: vec![Box::new(first)],
        }
    }

    /// Appends a stage that runs when every earlier stage was uncertain.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::StageArity`] if the stage's arity differs from
    /// the chain's.
    pub fn then<S>(mut self, next: S) -> Result<Self, FilterError>
    where
        S: SignStage + Send + Sync + 'static,
    {
        if next.arg_count() != self.arg_count {
            return Err(FilterError::StageArity {
                expected: self.arg_count,
                found: next.arg_count(),
            });
        }
        self.stages.push(Box::new(next));
        Ok(self)
    }

    /// Number of stages in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false: a chain has at least one stage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl SignStage for StagedPredicate {
    fn arg_count(&self) -> usize {
        self.arg_count
    }

    fn sign(&self, inputs: &[f64]) -> Result<Sign, FilterError> {
        for (index, stage) in self.stages.iter().enumerate() {
            let sign = stage.sign(inputs)?;
            if sign.is_certain() {
                return Ok(sign);
            }
            trace!("stage {index} uncertain, escalating");
        }
        Ok(Sign::Uncertain)
    }

    fn is_stateful(&self) -> bool {
        self.stages.iter().any(|s| s.is_stateful())
    }
}

impl fmt::Debug for StagedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedPredicate")
            .field("arg_count", &self.arg_count)
            .field("stages", &self.stages.len())
            .finish()
    }
}
