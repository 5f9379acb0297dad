//! Floating-point approximation of sign-exact nodes.
//!
//! Values are only trusted for their sign. Two IEEE corner cases escape the
//! static classification: a product of non-zero values that underflows to
//! zero, and `inf * 0` after an overflowing sub-product. Both are recorded as
//! NaN, which reads back as [`Sign::Uncertain`](crate::Sign::Uncertain) and
//! propagates through every later step.

use certus_core::BinaryOp;
use log::trace;
use smallvec::SmallVec;

use crate::plan::{ApproxStep, Step};

/// Per-call array of approximated values.
pub(crate) type ApproxValues = SmallVec<[f64; 16]>;

/// Evaluates `steps` in order, appending one value per step.
pub(crate) fn approximate(steps: &[ApproxStep], inputs: &[f64], values: &mut ApproxValues) {
    for step in steps {
        let value = match *step {
            Step::Abs(child) => child.value(inputs, values).abs(),
            Step::Binary { op, left, right } => binary(
                op,
                left.value(inputs, values),
                right.value(inputs, values),
                values.len(),
            ),
        };

        if value.is_nan() {
            trace!("approximation slot {} has no reliable sign", values.len());
        }
        values.push(value);
    }
}

fn binary(op: BinaryOp, l: f64, r: f64, slot: usize) -> f64 {
    if l.is_nan() || r.is_nan() {
        // f64::min/max would silently drop the NaN
        return f64::NAN;
    }
    match op {
        BinaryOp::Sum => l + r,
        BinaryOp::Difference => l - r,
        BinaryOp::Product => {
            let p = l * r;
            if p == 0.0 && l != 0.0 && r != 0.0 {
                trace!("product underflow in approximation slot {slot}");
                f64::NAN
            } else {
                p
            }
        }
        BinaryOp::Min => l.min(r),
        BinaryOp::Max => l.max(r),
    }
}
