//! Exact conversion of `f64` values to rationals.

use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

const MANTISSA_BITS: u32 = 52;
const EXPONENT_MASK: u64 = 0x7ff;
/// Exponent bias plus mantissa width: a normal value is `m * 2^(e - 1075)`.
const EXPONENT_OFFSET: i64 = 1075;
/// Scale of subnormal values: `m * 2^-1074`.
const SUBNORMAL_EXPONENT: i64 = -1074;

/// Converts a finite `f64` to the rational it represents, exactly.
///
/// Returns `None` for NaN and infinities.
#[must_use]
pub fn exact_from_f64(value: f64) -> Option<RBig> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some(RBig::ZERO);
    }

    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> MANTISSA_BITS) & EXPONENT_MASK) as i64;
    let fraction = bits & ((1u64 << MANTISSA_BITS) - 1);

    let (mantissa, exponent) = if biased == 0 {
        (fraction, SUBNORMAL_EXPONENT)
    } else {
        (fraction | (1u64 << MANTISSA_BITS), biased - EXPONENT_OFFSET)
    };

    let mut numerator = IBig::from(mantissa);
    if negative {
        numerator = -numerator;
    }

    let shift = exponent.unsigned_abs() as usize;
    Some(if exponent >= 0 {
        RBig::from(numerator << shift)
    } else {
        RBig::from_parts(numerator, UBig::ONE << shift)
    })
}
