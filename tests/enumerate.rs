//! # Exact verification of enumerated torture values
//!
//! Every value the enumeration emits comes with a claim: its rounding boundary sits within a
//! relative distance of `2^-precision` of a short decimal. These tests recompute that distance
//! with exact rational arithmetic for every emitted value. Counts and edge values for a few
//! configurations are pinned to catch silent changes in the interval framing.
use num::{BigInt, BigRational, One, Signed};

use fptorture::enumerate::{almost_decimal_midpoint, almost_half_decimal};

/// The value `0.30102999566398114`, fixed by the enumeration to pick decimal exponents.
const LOG10_2: f64 = 0.30102999566398114;

fn pow2(exponent: i32) -> BigRational {
    if exponent >= 0 {
        BigRational::from_integer(BigInt::one() << exponent as usize)
    } else {
        BigRational::new(One::one(), BigInt::one() << (-exponent) as usize)
    }
}

fn pow10(exponent: i32) -> BigRational {
    let power = BigInt::from(10).pow(exponent.unsigned_abs());
    if exponent >= 0 {
        BigRational::from_integer(power)
    } else {
        BigRational::new(One::one(), power)
    }
}

/// The integer `m` with `x == m * 2^e2`, recovered from the float representation.
fn mantissa_at(x: f64, e2: i32) -> u64 {
    assert!(x.is_finite() && x > 0.0);
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased - 1075)
    };
    if exponent >= e2 {
        mantissa << (exponent - e2) as u32
    } else {
        let shift = (e2 - exponent) as u32;
        assert_eq!(mantissa & ((1 << shift) - 1), 0, "{} is no multiple of 2^{}", x, e2);
        mantissa >> shift
    }
}

fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// Run the midpoint enumeration and verify each emitted value exactly.
///
/// Returns the recovered mantissas, in emission order.
fn checked_midpoints(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    denormal: bool,
) -> Vec<u64> {
    let mut hits = Vec::new();
    almost_decimal_midpoint(e2, digits, mantbits, precision, direction, denormal, |x| {
        hits.push(x)
    });

    // The decimal exponent the enumeration paired with e2.
    let e10 = if e2 >= 0 {
        ((f64::from(e2) + f64::from(mantbits)) * LOG10_2).ceil() as i32 - digits
    } else {
        -(((f64::from(-e2) - f64::from(mantbits)) * LOG10_2).floor() as i32 + digits)
    };
    let tolerance = BigRational::new(One::one(), BigInt::one() << precision as usize);
    let decimal_limit = BigInt::from(10).pow(digits as u32);

    let mut mantissas = Vec::new();
    for (index, &x) in hits.iter().enumerate() {
        let m = mantissa_at(x, e2);
        if denormal {
            assert!(bit_length(m) <= mantbits);
        } else {
            assert_eq!(bit_length(m), mantbits);
        }

        let midpoint = BigRational::new(BigInt::from(2 * m + 1), BigInt::from(2)) * pow2(e2);
        let scaled = midpoint / pow10(e10);
        let decimal = scaled.round().to_integer();
        assert!(decimal.is_positive() && decimal < decimal_limit);
        let offset = &scaled - BigRational::from_integer(decimal);
        if direction == 1 {
            assert!(!offset.is_negative(), "midpoint of {} below its decimal", x);
        } else {
            assert!(!offset.is_positive(), "midpoint of {} above its decimal", x);
        }
        // The walk starts on the bounded approximation just outside the requested band, so the
        // first value may overshoot the tolerance; everything after is strictly inside.
        if !(direction == 1 && index == 0) {
            let relative = offset.abs() / scaled;

            assert!(relative < tolerance, "{} misses by {}", x, relative);
        }
        mantissas.push(m);
    }
    mantissas
}

/// Run the half decimal enumeration and verify each emitted triple exactly.
fn checked_half_decimals(
    e2: i32,
    digits: i32,
    mantbits: u32,
    precision: u32,
    direction: i8,
    denormal: bool,
) -> Vec<(u64, u64, i32)> {
    let mut hits = Vec::new();
    almost_half_decimal(e2, digits, mantbits, precision, direction, denormal, |x, n, k| {
        hits.push((x, n, k))
    });

    let tolerance = BigRational::new(One::one(), BigInt::one() << precision as usize);
    let decimal_limit = BigInt::from(10).pow(digits as u32);

    let mut triples = Vec::new();
    for (index, &(x, n, k)) in hits.iter().enumerate() {
        let m = mantissa_at(x, e2);
        if denormal {
            assert!(bit_length(m) <= mantbits);
        } else {
            assert_eq!(bit_length(m), mantbits);
        }
        assert!(BigInt::from(n) < decimal_limit);

        let value = BigRational::from_integer(m.into()) * pow2(e2);
        let half_decimal =
            BigRational::new(BigInt::from(2 * n + 1), BigInt::from(2)) * pow10(k);
        let offset = value - &half_decimal;
        if direction == 1 {
            assert!(!offset.is_negative(), "{} below its half decimal", x);
        } else {
            assert!(!offset.is_positive(), "{} above its half decimal", x);
        }
        if !(direction == 1 && index == 0) {
            let relative = offset.abs() / half_decimal;
            assert!(relative < tolerance, "{} misses by {}", x, relative);
        }
        triples.push((m, n, k));
    }
    triples
}

#[test]
fn midpoint_positive_exponent() {
    let mantissas = checked_midpoints(100, 16, 53, 96, 1, false);
    assert_eq!(mantissas.len(), 39);
    assert_eq!(mantissas[0], 6_994_723_802_251_920);
    assert_eq!(*mantissas.last().unwrap(), 6_972_100_373_512_505);

    let mantissas = checked_midpoints(100, 16, 53, 96, -1, false);
    assert_eq!(mantissas.len(), 38);
    assert_eq!(mantissas[0], 8_938_300_178_493_732);
    assert_eq!(*mantissas.last().unwrap(), 5_435_282_420_182_918);
}

#[test]
fn midpoint_single_hit() {
    // At 2^61 only one 16 digit decimal comes within 2^-96 of a midpoint from above, and none
    // from below.
    let mantissas = checked_midpoints(61, 16, 53, 96, 1, false);
    assert_eq!(mantissas, [9_001_188_056_514_306]);
    assert!(checked_midpoints(61, 16, 53, 96, -1, false).is_empty());
}

#[test]
fn midpoint_negative_exponent() {
    let mantissas = checked_midpoints(-80, 16, 53, 96, 1, false);
    assert_eq!(mantissas.len(), 261);
    assert_eq!(mantissas[0], 7_915_118_525_001_269);
    assert_eq!(*mantissas.last().unwrap(), 6_026_241_735_727_920);

    let mantissas = checked_midpoints(-80, 16, 53, 96, -1, false);
    assert_eq!(mantissas.len(), 254);
    assert_eq!(mantissas[0], 5_768_934_944_920_810);
    assert_eq!(*mantissas.last().unwrap(), 7_049_611_038_289_439);
}

#[test]
fn midpoint_denormals() {
    // The bottom of the denormal range; mantissas of any width are admitted.
    let mantissas = checked_midpoints(-1074, 16, 52, 96, 1, true);
    assert_eq!(mantissas.len(), 49);
    assert_eq!(mantissas[0], 4_404_740_796_366_365);
    assert_eq!(*mantissas.last().unwrap(), 172_309_255_278_596);
}

#[test]
fn half_decimal_positive_exponent() {
    let triples = checked_half_decimals(100, 16, 53, 96, 1, false);
    assert_eq!(triples.len(), 37);
    assert_eq!(triples[0], (6_859_122_218_134_604, 869_497_039_685_711, 31));
    assert_eq!(
        *triples.last().unwrap(),
        (7_017_300_901_551_611, 889_548_569_983_399, 31),
    );

    let triples = checked_half_decimals(100, 16, 53, 96, -1, false);
    assert_eq!(triples.len(), 41);
    assert_eq!(triples[0], (4_960_700_040_492_173, 628_843_438_388_210, 31));

    // A single sharp hit right at the bottom of the double exponent grid.
    let triples = checked_half_decimals(60, 16, 53, 96, 1, false);
    assert_eq!(triples, [(8_991_651_313_350_244, 1_036_666_816_108_789, 19)]);
}

#[test]
fn half_decimal_negative_exponent() {
    let triples = checked_half_decimals(-80, 16, 53, 96, 1, false);
    assert_eq!(triples.len(), 246);
    assert_eq!(triples[0], (8_491_135_651_332_983, 7_023_702_789_340_468, -24));
    assert_eq!(
        *triples.last().unwrap(),
        (8_918_019_979_323_624, 7_376_813_229_257_054, -24),
    );

    let triples = checked_half_decimals(-80, 16, 53, 96, -1, false);
    assert_eq!(triples.len(), 268);
    assert_eq!(triples[0], (8_836_148_586_366_966, 7_309_090_800_280_596, -24));
}

#[test]
fn half_decimal_denormals() {
    let triples = checked_half_decimals(-1074, 16, 52, 96, 1, true);
    assert_eq!(triples.len(), 50);
    assert_eq!(triples[0], (1_703_382_017_738_109, 841_582_536_708_144, -323));

    let triples = checked_half_decimals(-1074, 16, 52, 96, -1, true);
    assert_eq!(triples.len(), 53);
    assert_eq!(
        *triples.last().unwrap(),
        (4_435_078_229_357_063, 2_191_219_789_743_749, -323),
    );
}
