//! # Enumeration of hard conversion cases
//!
//! The searches in this module frame "a rounding boundary falls extremely close to a short
//! decimal" as membership of a narrow rational interval. The boundary of interest divided by the
//! power of ten under consideration is a ratio of two large integers; a floating point value is
//! hard exactly when a fraction with a mantissa-sized denominator approximates that ratio to the
//! requested precision. Walking the Farey sequence through the interval visits every such
//! fraction once, and each fraction passing the parity and width filters reconstructs one float.
use num::BigUint;

use crate::data::rational::Rat;

mod half_decimal;
mod midpoint;

pub use half_decimal::almost_half_decimal;
pub use midpoint::almost_decimal_midpoint;

/// Decimal logarithm of two.
///
/// The exact value of this constant decides which power of ten pairs up with a binary exponent,
/// so it must not be changed: reproducing the same test values everywhere requires cutting the
/// exponent grid identically.
const LOG10_2: f64 = 0.30102999566398114;

/// The half open interval of bounded-denominator fractions on one side of `num / den`.
///
/// # Arguments
///
/// * `num`, `den`: The target ratio.
/// * `precision`: Relative width of the interval, in bits.
/// * `direction`: `+1` for the interval reaching from `1 - 2^-precision` times the ratio up to
///   the ratio itself (inclusive), `-1` for the interval reaching from the ratio (exclusive)
///   up to `1 + 2^-precision` times the ratio.
/// * `max_bits`: Denominator bound for the fractions.
///
/// # Return value
///
/// Pair `(start, end)`; the caller visits `start` and advances while strictly below `end`.
fn interval(
    num: &BigUint,
    den: &BigUint,
    precision: u32,
    direction: i8,
    max_bits: u32,
) -> (Rat, Rat) {
    debug_assert!(direction == 1 || direction == -1);

    if direction == -1 {
        let start = Rat::new_from_big(num, den, max_bits).1;
        let end = slightly_off(num, den, precision, 1, max_bits);
        (start, end)
    } else {
        let start = slightly_off(num, den, precision, -1, max_bits);
        let mut end = Rat::new_from_big(num, den, max_bits).0;
        // The lower approximation itself belongs to the interval; the end is exclusive.
        end.advance();
        (start, end)
    }
}

/// Bounded approximation of `num / den` scaled by `1 + 2^-precision` (`direction = 1`, upper
/// approximation) or `1 - 2^-precision` (`direction = -1`, lower approximation).
///
/// The scaled endpoints are exact: `num * (2^precision ± 1)` over `den * 2^precision`.
fn slightly_off(
    num: &BigUint,
    den: &BigUint,
    precision: u32,
    direction: i8,
    max_bits: u32,
) -> Rat {
    let scaled_num = num << precision;
    let scaled_den = den << precision;
    if direction == 1 {
        Rat::new_from_big(&(scaled_num + num), &scaled_den, max_bits).1
    } else {
        Rat::new_from_big(&(scaled_num - num), &scaled_den, max_bits).0
    }
}

/// Exact product `mant * 2^exp`.
///
/// Splitting the exponent keeps both power-of-two factors representable; every value the
/// enumeration emits is representable by construction, so the multiplications are exact.
fn ldexp(mant: u64, exp: i32) -> f64 {
    let half = exp / 2;
    mant as f64 * pow2(half) * pow2(exp - half)
}

fn pow2(exp: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&exp));
    f64::from_bits(((exp + 1023) as u64) << 52)
}
