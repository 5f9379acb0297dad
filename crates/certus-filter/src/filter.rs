//! The signs-only filter.
//!
//! The filter tries to settle the sign of an expression from the signs of its
//! sub-expressions alone, e.g. `e1 - e2 > 0` whenever `e1 > 0` and `e2 <= 0`.
//! Sub-expressions whose floating-point value is guaranteed to carry the
//! right sign (a sum or difference of two inputs, products/min/max/abs of
//! such values) are approximated numerically; everything above them is
//! deduced with the rules in [`crate::deduce`].

use certus_core::{is_leaf, is_sign_exact, post_order, ExprArena, ExprHandle, ShapeError};
use log::debug;

use crate::approximate::{approximate, ApproxValues};
use crate::deduce::{deduce, DeducedSigns};
use crate::error::FilterError;
use crate::plan::{leaf_operand, ApproxStep, DeduceArg, DeduceStep, Exact, Operand, Resolved, Step};
use crate::sign::Sign;
use crate::stage::SignStage;

/// A formula shape compiled for fast sign evaluation.
///
/// Compilation happens once; the filter is immutable afterwards and can be
/// shared between threads. Every call to [`evaluate_sign`](Self::evaluate_sign)
/// works on its own call-local arrays.
///
/// # Example
/// ```
/// use certus_core::ExprArena;
/// use certus_filter::{Sign, SignsOnlyFilter};
///
/// let mut arena = ExprArena::new();
/// let a = arena.argument(1)?;
/// let b = arena.argument(2)?;
/// let root = arena.sum(a, b);
///
/// let filter = SignsOnlyFilter::new(&arena, root)?;
/// assert_eq!(filter.evaluate_sign(&[2.0, 3.0])?, Sign::Positive);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SignsOnlyFilter {
    arg_count: usize,
    approx_steps: Vec<ApproxStep>,
    deduce_steps: Vec<DeduceStep>,
    root: Operand,
}

impl SignsOnlyFilter {
    /// Compiles the formula rooted at `root`. The filter takes as many inputs
    /// as the largest argument index the formula reads.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if `root` is not part of `arena` or the
    /// formula contains a malformed leaf.
    pub fn new(arena: &ExprArena, root: ExprHandle) -> Result<Self, ShapeError> {
        arena.check(root)?;
        let arity = arena.max_argument(root) as usize;
        Self::compile(arena, root, arity)
    }

    /// Compiles the formula for a declared number of inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::ArgumentOutOfRange`] if the formula reads an
    /// argument beyond `arity`, and the errors of [`new`](Self::new).
    pub fn with_arity(arena: &ExprArena, root: ExprHandle, arity: usize) -> Result<Self, ShapeError> {
        arena.check(root)?;
        let index = arena.max_argument(root);
        if index as usize > arity {
            return Err(ShapeError::ArgumentOutOfRange { index, arity });
        }
        Self::compile(arena, root, arity)
    }

    fn compile(arena: &ExprArena, root: ExprHandle, arity: usize) -> Result<Self, ShapeError> {
        let mut resolved = Resolved::default();

        // Pass 1: leaves and sign-exact nodes, in full evaluation order.
        let mut approx_steps = Vec::new();
        for handle in post_order(arena, root, is_leaf) {
            let node = arena.get(handle);
            let exact = if let Some(leaf) = leaf_operand(node)? {
                leaf
            } else if arena.props(handle).sign_exact {
                let Some(step) = Step::of(node, |child| resolved.exact(child))? else {
                    continue;
                };
                approx_steps.push(step);
                Exact::Approx(approx_steps.len() - 1)
            } else {
                continue;
            };
            resolved.insert(handle, Operand::Exact(exact));
        }

        // Pass 2: everything above the sign-exact frontier.
        let mut deduce_steps = Vec::new();
        for handle in post_order(arena, root, is_sign_exact) {
            if arena.props(handle).sign_exact {
                continue;
            }
            let arg = |child: ExprHandle| -> Result<DeduceArg, ShapeError> {
                Ok(DeduceArg {
                    operand: resolved.operand(child)?,
                    non_negative: arena.props(child).non_negative,
                })
            };
            let Some(step) = Step::of(arena.get(handle), arg)? else {
                continue;
            };
            deduce_steps.push(step);
            resolved.insert(handle, Operand::Deduced(deduce_steps.len() - 1));
        }

        let root = resolved.operand(root)?;
        debug!(
            "compiled signs-only filter: {} inputs, {} approximations, {} deductions",
            arity,
            approx_steps.len(),
            deduce_steps.len()
        );

        Ok(Self {
            arg_count: arity,
            approx_steps,
            deduce_steps,
            root,
        })
    }

    /// Number of inputs [`evaluate_sign`](Self::evaluate_sign) expects.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Number of sign-exact inner nodes approximated per call.
    #[must_use]
    pub fn approximation_count(&self) -> usize {
        self.approx_steps.len()
    }

    /// Number of nodes whose sign is deduced per call.
    #[must_use]
    pub fn deduction_count(&self) -> usize {
        self.deduce_steps.len()
    }

    /// Returns the sign of the formula at `inputs`, or [`Sign::Uncertain`] if
    /// floating point plus sign rules cannot certify it.
    ///
    /// A definite result is always the true mathematical sign.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InputCount`] if `inputs.len()` differs from
    /// [`arg_count`](Self::arg_count) and [`FilterError::NonFiniteInput`] for
    /// NaN or infinite inputs.
    pub fn evaluate_sign(&self, inputs: &[f64]) -> Result<Sign, FilterError> {
        check_inputs(self.arg_count, inputs)?;

        let mut approx = ApproxValues::with_capacity(self.approx_steps.len());
        approximate(&self.approx_steps, inputs, &mut approx);

        let mut signs = DeducedSigns::with_capacity(self.deduce_steps.len());
        deduce(&self.deduce_steps, inputs, &approx, &mut signs);

        Ok(match self.root {
            Operand::Exact(exact) => Sign::of(exact.value(inputs, &approx)),
            Operand::Deduced(slot) => signs[slot],
        })
    }
}

impl SignStage for SignsOnlyFilter {
    fn arg_count(&self) -> usize {
        self.arg_count
    }

    fn sign(&self, inputs: &[f64]) -> Result<Sign, FilterError> {
        self.evaluate_sign(inputs)
    }
}

/// Validates an input slice against a stage's arity.
///
/// # Errors
///
/// See [`SignsOnlyFilter::evaluate_sign`].
pub fn check_inputs(arg_count: usize, inputs: &[f64]) -> Result<(), FilterError> {
    if inputs.len() != arg_count {
        return Err(FilterError::InputCount {
            expected: arg_count,
            found: inputs.len(),
        });
    }
    if let Some(index) = inputs.iter().position(|x| !x.is_finite()) {
        return Err(FilterError::NonFiniteInput { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(arena: &mut ExprArena, n: u32) -> Vec<ExprHandle> {
        (1..=n).map(|i| arena.argument(i).unwrap()).collect()
    }

    #[test]
    fn test_sum_of_positive_inputs() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 2);
        let root = arena.sum(x[0], x[1]);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        assert_eq!(filter.evaluate_sign(&[2.0, 3.0]).unwrap(), Sign::Positive);
    }

    #[test]
    fn test_self_difference_is_zero() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 1);
        let root = arena.difference(x[0], x[0]);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        assert_eq!(filter.evaluate_sign(&[5.0]).unwrap(), Sign::Zero);
    }

    #[test]
    fn test_cancelling_huge_sum_is_not_wrong() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 2);
        let root = arena.sum(x[0], x[1]);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        let sign = filter.evaluate_sign(&[1e308, -1e308]).unwrap();
        assert!(matches!(sign, Sign::Zero | Sign::Uncertain));
    }

    #[test]
    fn test_square_of_negative_is_positive() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 1);
        let root = arena.product(x[0], x[0]);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        assert_eq!(filter.evaluate_sign(&[-3.0]).unwrap(), Sign::Positive);
    }

    #[test]
    fn test_abs_of_equal_difference_is_zero() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 2);
        let d = arena.difference(x[0], x[1]);
        let root = arena.abs(d);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        assert_eq!(filter.evaluate_sign(&[4.0, 4.0]).unwrap(), Sign::Zero);
    }

    /// (x1 - x5) * (x4 - x6) - (x2 - x6) * (x3 - x5)
    fn orientation(arena: &mut ExprArena) -> ExprHandle {
        let x = args(arena, 6);
        let adx = arena.difference(x[0], x[4]);
        let bdy = arena.difference(x[3], x[5]);
        let ady = arena.difference(x[1], x[5]);
        let bdx = arena.difference(x[2], x[4]);
        let l = arena.product(adx, bdy);
        let r = arena.product(ady, bdx);
        arena.difference(l, r)
    }

    #[test]
    fn test_orientation_tables() {
        let mut arena = ExprArena::new();
        let root = orientation(&mut arena);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();

        assert_eq!(filter.arg_count(), 6);
        assert_eq!(filter.approximation_count(), 6);
        assert_eq!(filter.deduction_count(), 1);

        // l > 0, r == 0
        let ccw = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        assert_eq!(filter.evaluate_sign(&ccw).unwrap(), Sign::Positive);

        // l > 0, r > 0: genuine cancellation, cannot be settled by signs
        let close = [1.0, 1.0, 2.0, 2.0 + 1e-12, 0.0, 0.0];
        assert_eq!(filter.evaluate_sign(&close).unwrap(), Sign::Uncertain);

        // both products zero
        let degenerate = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(filter.evaluate_sign(&degenerate).unwrap(), Sign::Zero);
    }

    #[test]
    fn test_leaf_and_constant_roots() {
        let mut arena = ExprArena::new();
        let a = arena.argument(2).unwrap();
        let k = arena.constant(-4.0).unwrap();

        let filter = SignsOnlyFilter::new(&arena, a).unwrap();
        assert_eq!(filter.arg_count(), 2);
        assert_eq!(filter.evaluate_sign(&[9.0, -1.0]).unwrap(), Sign::Negative);

        let filter = SignsOnlyFilter::new(&arena, k).unwrap();
        assert_eq!(filter.arg_count(), 0);
        assert_eq!(filter.evaluate_sign(&[]).unwrap(), Sign::Negative);
    }

    #[test]
    fn test_sum_of_squares_is_deduced() {
        // x1*x1 + x2*x2 - 0 is settled through two exact products
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 2);
        let a = arena.product(x[0], x[0]);
        let b = arena.product(x[1], x[1]);
        let root = arena.sum(a, b);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();

        assert_eq!(filter.evaluate_sign(&[0.0, -2.0]).unwrap(), Sign::Positive);
        assert_eq!(filter.evaluate_sign(&[0.0, 0.0]).unwrap(), Sign::Zero);
    }

    #[test]
    fn test_max_and_min_over_deduced_nodes() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 4);
        let p = arena.product(x[0], x[1]);
        let q = arena.product(x[2], x[3]);
        let d = arena.difference(p, q);
        let root_max = arena.max(d, x[0]);
        let root_min = arena.min(d, x[0]);

        let fmax = SignsOnlyFilter::new(&arena, root_max).unwrap();
        let fmin = SignsOnlyFilter::new(&arena, root_min).unwrap();

        // d uncertain (cancellation), x1 positive
        let inputs = [1.0, 1.0, 1.0, 1.0];
        assert_eq!(fmax.evaluate_sign(&inputs).unwrap(), Sign::Positive);
        assert_eq!(fmin.evaluate_sign(&inputs).unwrap(), Sign::Uncertain);

        // d negative for sure
        let inputs = [-1.0, 2.0, 1.0, 1.0];
        assert_eq!(fmax.evaluate_sign(&inputs).unwrap(), Sign::Negative);
        assert_eq!(fmin.evaluate_sign(&inputs).unwrap(), Sign::Negative);
    }

    #[test]
    fn test_underflowing_product_is_uncertain() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 3);
        let p = arena.product(x[0], x[1]);
        let root = arena.product(p, x[2]);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        assert_eq!(
            filter.evaluate_sign(&[1e-200, 1e-200, 1.0]).unwrap(),
            Sign::Uncertain
        );
        assert_eq!(filter.evaluate_sign(&[1e-20, -1e-20, 1.0]).unwrap(), Sign::Negative);
    }

    #[test]
    fn test_input_validation() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 2);
        let root = arena.sum(x[0], x[1]);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();

        assert_eq!(
            filter.evaluate_sign(&[1.0]),
            Err(FilterError::InputCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            filter.evaluate_sign(&[1.0, f64::NAN]),
            Err(FilterError::NonFiniteInput { index: 1 })
        );
    }

    #[test]
    fn test_declared_arity() {
        let mut arena = ExprArena::new();
        let x = args(&mut arena, 3);
        let root = arena.sum(x[0], x[2]);

        let filter = SignsOnlyFilter::with_arity(&arena, root, 4).unwrap();
        assert_eq!(filter.arg_count(), 4);
        assert_eq!(
            filter.evaluate_sign(&[1.0, f64::MAX, 1.0, 0.0]).unwrap(),
            Sign::Positive
        );

        assert_eq!(
            SignsOnlyFilter::with_arity(&arena, root, 2).unwrap_err(),
            ShapeError::ArgumentOutOfRange { index: 3, arity: 2 }
        );
    }

    #[test]
    fn test_foreign_root_rejected() {
        let arena = ExprArena::new();
        let stray = ExprHandle::new(0);
        assert!(matches!(
            SignsOnlyFilter::new(&arena, stray),
            Err(ShapeError::UnknownHandle { .. })
        ));
    }

    #[test]
    fn test_malformed_interned_leaf_rejected() {
        let mut arena = ExprArena::new();
        let bad = arena.intern(certus_core::ExprNode::Argument(0));
        assert_eq!(
            SignsOnlyFilter::new(&arena, bad).unwrap_err(),
            ShapeError::ZeroArgumentIndex
        );
    }

    #[test]
    fn test_repeated_calls_agree() {
        let mut arena = ExprArena::new();
        let root = orientation(&mut arena);
        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        let inputs = [0.5, 0.25, 3.0, -1.0, 2.0, 7.5];
        let first = filter.evaluate_sign(&inputs).unwrap();
        for _ in 0..8 {
            assert_eq!(filter.evaluate_sign(&inputs).unwrap(), first);
        }
    }
}
