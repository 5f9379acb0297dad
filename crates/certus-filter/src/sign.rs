//! The four-valued sign returned by every stage.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, Neg};

/// Sign of an expression value, or [`Sign::Uncertain`] when a stage could not
/// certify it.
///
/// `Uncertain` is an outcome, not an error: the caller escalates to a more
/// precise stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Strictly negative.
    Negative,
    /// Exactly zero.
    Zero,
    /// Strictly positive.
    Positive,
    /// Not certified by this stage.
    Uncertain,
}

impl Sign {
    /// Sign of a floating-point value compared against zero. NaN is `Uncertain`.
    #[inline]
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else if value == 0.0 {
            Sign::Zero
        } else {
            Sign::Uncertain
        }
    }

    /// Returns `-1`, `0` or `1`, or `None` if uncertain.
    #[must_use]
    pub const fn to_i8(self) -> Option<i8> {
        match self {
            Sign::Negative => Some(-1),
            Sign::Zero => Some(0),
            Sign::Positive => Some(1),
            Sign::Uncertain => None,
        }
    }

    /// Returns true for every value but [`Sign::Uncertain`].
    #[must_use]
    pub const fn is_certain(self) -> bool {
        !matches!(self, Sign::Uncertain)
    }

    /// Returns true if certified `Zero` or `Positive`.
    #[must_use]
    pub const fn is_non_negative(self) -> bool {
        matches!(self, Sign::Zero | Sign::Positive)
    }

    /// Returns true if certified `Zero` or `Negative`.
    #[must_use]
    pub const fn is_non_positive(self) -> bool {
        matches!(self, Sign::Zero | Sign::Negative)
    }
}

impl Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Positive => Sign::Negative,
            other => other,
        }
    }
}

/// Multiplication of certified signs; `Uncertain` absorbs.
impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        match (self, rhs) {
            (Sign::Uncertain, _) | (_, Sign::Uncertain) => Sign::Uncertain,
            (Sign::Zero, _) | (_, Sign::Zero) => Sign::Zero,
            (l, r) if l == r => Sign::Positive,
            _ => Sign::Negative,
        }
    }
}

impl From<Ordering> for Sign {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Sign::Negative,
            Ordering::Equal => Sign::Zero,
            Ordering::Greater => Sign::Positive,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Negative => write!(f, "-"),
            Sign::Zero => write!(f, "0"),
            Sign::Positive => write!(f, "+"),
            Sign::Uncertain => write!(f, "?"),
        }
    }
}
