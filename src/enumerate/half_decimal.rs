//! # Floats nearly hitting a half decimal
//!
//! A fixed precision formatter rounds a float against boundaries `(n + 1/2) * 10^k`. Floats
//! sitting almost exactly on such a half decimal force the formatter to resolve the tie with far
//! more working precision than the mantissa suggests, and the difference between rounding up and
//! down is a visible digit.
use log::debug;
use num::{BigUint, One};

use crate::data::rational::bit_length;
use crate::enumerate::{interval, ldexp, LOG10_2};

/// Emit every float `mant * 2^e2` lying within a relative distance of `2^-precision` of a half
/// decimal `(n + 1/2) * 10^k` with `n` of at most `digits` digits.
///
/// The sink also receives `n` and `k` of the half decimal that was approached, from which the
/// shortest decimal string distinguishing the two rounding directions can be built.
///
/// # Arguments
///
/// * `e2`: Binary exponent of the floats to consider, may be negative.
/// * `digits`: Length of the decimal numbers the values are compared against.
/// * `mantbits`: Mantissa width of the floating point format, including the leading bit.
/// * `precision`: Closeness requirement, in bits.
/// * `direction`: `+1` emits floats slightly above their half decimal, `-1` slightly below.
/// * `denormal`: Relax the mantissa width filter, admitting values below the normal range.
/// * `sink`: Invoked with each qualifying value and its half decimal, in ascending order.
pub fn almost_half_decimal(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    denormal: bool,
    sink: impl FnMut(f64, u64, i32),
) {
    if e2 >= 0 {
        positive_exponent(e2, digits, mantbits, precision, direction, sink);
    } else {
        negative_exponent(-e2, digits, mantbits, precision, direction, denormal, sink);
    }
}

/// A value `mant * 2^e2` close to `(2n + 1) * 10^k / 2` corresponds to a fraction
/// `(2n + 1) / mant` close to `2^(e2 + 1) / 10^k`.
fn positive_exponent(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    mut sink: impl FnMut(f64, u64, i32),
) {
    let e10 = ((f64::from(e2) + f64::from(mantbits)) * LOG10_2).ceil() as i32 - digits;
    assert!(e10 >= 0, "no decimal exponent fits this combination");
    debug!(
        "half decimals for {} bit mantissas at 2^{} against {} digits times 10^{}",
        mantbits, e2, digits, e10,
    );

    let num = BigUint::one() << (e2 + 1) as usize;
    let den = BigUint::from(10u8).pow(e10 as u32);
    let (mut r, end) = interval(&num, &den, precision, direction, mantbits);
    while r < end {
        let (num, den) = r.fraction();
        if num % 2 == 1 && bit_length(den) == mantbits {
            sink(ldexp(den, e2), num / 2, e10);
        }
        r.advance();
    }
}

/// The negative exponent counterpart, with the exponent by magnitude: `(2n + 1) / mant` close to
/// `10^k / 2^(e2 - 1)`.
fn negative_exponent(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    denormal: bool,
    mut sink: impl FnMut(f64, u64, i32),
) {
    assert!(e2 >= 1, "exponent too small for the negative branch");
    let e10 = ((f64::from(e2) - f64::from(mantbits)) * LOG10_2).floor() as i32 + digits;
    assert!(e10 >= 0, "no decimal exponent fits this combination");
    debug!(
        "half decimals for {} bit mantissas at 2^-{} against {} digits times 10^-{}",
        mantbits, e2, digits, e10,
    );

    let num = BigUint::from(10u8).pow(e10 as u32);
    let den = BigUint::one() << (e2 - 1) as usize;
    let (mut r, end) = interval(&num, &den, precision, direction, mantbits);
    while r < end {
        let (num, den) = r.fraction();
        if num % 2 == 1 && (denormal || bit_length(den) == mantbits) {
            sink(ldexp(den, -e2), num / 2, -e10);
        }
        r.advance();
    }
}
