//! Exact rational arithmetic for note lengths and seconds
//!
//! Durations are measured in whole notes (a crotchet is `1/4`), so measure
//! totals compare against a metre without any floating-point tolerance.
//! Numerators and denominators are unbounded: long runs of duration marks
//! and nested ratios stay exact instead of overflowing.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};

/// Exact fraction used for note lengths, measure totals and seconds
pub type Rational = BigRational;

/// Helper to create a Rational from n/d
#[inline]
pub fn rational(n: i64, d: i64) -> Rational {
    Rational::new(BigInt::from(n), BigInt::from(d))
}

/// Create a Rational from an integer
#[inline]
pub fn whole(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

/// `2^k` as an exact value
#[inline]
pub fn pow2(k: u32) -> Rational {
    Rational::from_integer(BigInt::one() << k)
}

/// Convert rational to f64 for display.
/// Values beyond the range of `f64` saturate to infinity or zero.
pub fn to_f64(r: &Rational) -> f64 {
    r.to_f64().unwrap_or(f64::NAN)
}
