//! # Floats whose midpoint nearly hits a short decimal
//!
//! The midpoint `(mant + 1/2) * 2^e2` between two adjacent floating point values is the rounding
//! boundary a correctly rounded parser has to place incoming decimals against. When the midpoint
//! is almost, but not exactly, a short decimal `n * 10^k`, deciding the side of the boundary
//! requires resolving a difference many bits beyond the mantissa.
use log::debug;
use num::{BigUint, One};

use crate::data::rational::bit_length;
use crate::enumerate::{interval, ldexp, LOG10_2};

/// Emit every float `mant * 2^e2` whose midpoint `(mant + 1/2) * 2^e2` lies within a relative
/// distance of `2^-precision` of some decimal `n * 10^k` with `n` of at most `digits` digits.
///
/// # Arguments
///
/// * `e2`: Binary exponent of the floats to consider, may be negative.
/// * `digits`: Length of the decimal numbers the midpoints are compared against.
/// * `mantbits`: Mantissa width of the floating point format, including the leading bit.
/// * `precision`: Closeness requirement on the midpoint, in bits.
/// * `direction`: `+1` emits floats whose midpoint lies slightly above the decimal, `-1`
///   slightly below.
/// * `denormal`: Relax the mantissa width filter, admitting values below the normal range.
/// * `sink`: Invoked with each qualifying value, in ascending order.
pub fn almost_decimal_midpoint(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    denormal: bool,
    sink: impl FnMut(f64),
) {
    if e2 >= 0 {
        positive_exponent(e2, digits, mantbits, precision, direction, sink);
    } else {
        negative_exponent(-e2, digits, mantbits, precision, direction, denormal, sink);
    }
}

/// Midpoints with a nonnegative exponent are `(2 mant + 1) * 2^(e2 - 1)`; one close to
/// `n * 10^k` corresponds to a fraction `n / (2 mant + 1)` close to `2^(e2 - 1) / 10^k`.
fn positive_exponent(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    mut sink: impl FnMut(f64),
) {
    assert!(e2 >= 1, "exponent too small for the positive branch");
    // Choose k with 10^(k + digits) about 2^(e2 + mantbits), so that the digit counts work out.
    let e10 = ((f64::from(e2) + f64::from(mantbits)) * LOG10_2).ceil() as i32 - digits;
    assert!(e10 >= 0, "no decimal exponent fits this combination");
    debug!(
        "midpoints of {} bit mantissas at 2^{} against {} digits times 10^{}",
        mantbits, e2, digits, e10,
    );

    let num = BigUint::one() << (e2 - 1) as usize;
    let den = BigUint::from(10u8).pow(e10 as u32);
    let (mut r, end) = interval(&num, &den, precision, direction, mantbits + 1);
    while r < end {
        let (_, den) = r.fraction();
        if den % 2 == 1 && bit_length(den) == mantbits + 1 {
            sink(ldexp(den / 2, e2));
        }
        r.advance();
    }
}

/// Midpoints with a negative exponent, taken here by magnitude, are `(2 mant + 1) / 2^(e2 + 1)`;
/// one close to `n / 10^k` corresponds to a fraction `n / (2 mant + 1)` close to
/// `10^k / 2^(e2 + 1)`.
fn negative_exponent(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    denormal: bool,
    mut sink: impl FnMut(f64),
) {
    let e10 = ((f64::from(e2) - f64::from(mantbits)) * LOG10_2).floor() as i32 + digits;
    assert!(e10 >= 0, "no decimal exponent fits this combination");
    debug!(
        "midpoints of {} bit mantissas at 2^-{} against {} digits times 10^-{}",
        mantbits, e2, digits, e10,
    );

    let num = BigUint::from(10u8).pow(e10 as u32);
    let den = BigUint::one() << (e2 + 1) as usize;
    let (mut r, end) = interval(&num, &den, precision, direction, mantbits + 1);
    while r < end {
        let (_, den) = r.fraction();
        if den % 2 == 1 && (denormal || bit_length(den) == mantbits + 1) {
            sink(ldexp(den / 2, -e2));
        }
        r.advance();
    }
}
