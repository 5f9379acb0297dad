//! Sign deduction for nodes that are not sign-exact.
//!
//! Each operand is classified independently: a sign-exact operand contributes
//! the sign of its approximated value, any other operand contributes the sign
//! deduced for it earlier (its magnitude is never trusted). The combination
//! rules below only use those signs plus the static `non_negative` property,
//! and return [`Sign::Uncertain`] whenever rounding could move the result
//! across zero.
//!
//! Rule summary:
//!
//! | op    | certain result when                                             |
//! |-------|-----------------------------------------------------------------|
//! | `+`   | both `0`; or one side `+`/`-` and the other known `>= 0`/`<= 0` |
//! | `-`   | `+` rule on `l` and `-r`                                        |
//! | `*`   | either side `0`; else both certain                              |
//! | `max` | either side `+`; both certain; `0` against known `<= 0`         |
//! | `min` | either side `-`; both certain; `0` against known `>= 0`         |
//! | `abs` | child certain                                                   |

use certus_core::BinaryOp;
use smallvec::SmallVec;

use crate::approximate::ApproxValues;
use crate::plan::{DeduceArg, DeduceStep, Operand, Step};
use crate::sign::Sign;

/// Per-call array of deduced signs.
pub(crate) type DeducedSigns = SmallVec<[Sign; 16]>;

/// What is known about one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Term {
    pub sign: Sign,
    /// Value is `>= 0`, certified or by shape.
    pub at_least_zero: bool,
    /// Value is `<= 0`.
    pub at_most_zero: bool,
}

impl Term {
    pub(crate) fn new(sign: Sign, non_negative: bool) -> Self {
        Self {
            sign,
            at_least_zero: sign.is_non_negative() || non_negative,
            at_most_zero: sign.is_non_positive(),
        }
    }

    fn negate(self) -> Self {
        Self {
            sign: -self.sign,
            at_least_zero: self.at_most_zero,
            at_most_zero: self.at_least_zero,
        }
    }
}

/// Runs every step once, appending one sign per step.
pub(crate) fn deduce(
    steps: &[DeduceStep],
    inputs: &[f64],
    approx: &ApproxValues,
    signs: &mut DeducedSigns,
) {
    for step in steps {
        let sign = match *step {
            Step::Abs(child) => abs(term(child, inputs, approx, signs)),
            Step::Binary { op, left, right } => combine(
                op,
                term(left, inputs, approx, signs),
                term(right, inputs, approx, signs),
            ),
        };
        signs.push(sign);
    }
}

fn term(arg: DeduceArg, inputs: &[f64], approx: &[f64], signs: &[Sign]) -> Term {
    let sign = match arg.operand {
        Operand::Exact(exact) => Sign::of(exact.value(inputs, approx)),
        Operand::Deduced(slot) => signs[slot],
    };
    Term::new(sign, arg.non_negative)
}

/// Combines the terms of a binary node under `op`.
pub(crate) fn combine(op: BinaryOp, left: Term, right: Term) -> Sign {
    match op {
        BinaryOp::Sum => sum(left, right),
        BinaryOp::Difference => sum(left, right.negate()),
        BinaryOp::Product => product(left, right),
        BinaryOp::Max => max(left, right),
        BinaryOp::Min => min(left, right),
    }
}

fn sum(l: Term, r: Term) -> Sign {
    if l.sign == Sign::Zero && r.sign == Sign::Zero {
        Sign::Zero
    } else if (l.sign == Sign::Positive && r.at_least_zero)
        || (l.at_least_zero && r.sign == Sign::Positive)
    {
        Sign::Positive
    } else if (l.sign == Sign::Negative && r.at_most_zero)
        || (l.at_most_zero && r.sign == Sign::Negative)
    {
        Sign::Negative
    } else {
        Sign::Uncertain
    }
}

fn product(l: Term, r: Term) -> Sign {
    if l.sign == Sign::Zero || r.sign == Sign::Zero {
        Sign::Zero
    } else {
        l.sign * r.sign
    }
}

fn max(l: Term, r: Term) -> Sign {
    if l.sign == Sign::Positive || r.sign == Sign::Positive {
        Sign::Positive
    } else if let (Some(a), Some(b)) = (l.sign.to_i8(), r.sign.to_i8()) {
        if a >= b {
            l.sign
        } else {
            r.sign
        }
    } else if (l.sign == Sign::Zero && r.at_most_zero) || (r.sign == Sign::Zero && l.at_most_zero)
    {
        Sign::Zero
    } else {
        Sign::Uncertain
    }
}

fn min(l: Term, r: Term) -> Sign {
    if l.sign == Sign::Negative || r.sign == Sign::Negative {
        Sign::Negative
    } else if let (Some(a), Some(b)) = (l.sign.to_i8(), r.sign.to_i8()) {
        if a <= b {
            l.sign
        } else {
            r.sign
        }
    } else if (l.sign == Sign::Zero && r.at_least_zero) || (r.sign == Sign::Zero && l.at_least_zero)
    {
        Sign::Zero
    } else {
        Sign::Uncertain
    }
}

fn abs(child: Term) -> Sign {
    match child.sign {
        Sign::Zero => Sign::Zero,
        Sign::Uncertain => Sign::Uncertain,
        Sign::Negative | Sign::Positive => Sign::Positive,
    }
}
