//! # 128-bit division
//!
//! Quotient and remainder of unsigned 128-bit values, computed with 64-bit word operations. The
//! continued fraction constructors divide repeatedly while extending an expansion, usually by a
//! divisor that still has its high word set; this routine keeps that loop off the generic
//! 128-by-128 library division.

/// Compute quotient and remainder of two 128-bit unsigned values.
///
/// # Arguments
///
/// * `a`: Dividend.
/// * `b`: Divisor, nonzero.
///
/// # Return value
///
/// Pair `(q, r)` with `a == q * b + r` and `r < b`.
pub fn divmod_u128(a: u128, b: u128) -> (u128, u128) {
    assert_ne!(b, 0, "division by zero");

    let (mut a_hi, mut a_lo) = split(a);
    let (b_hi, b_lo) = split(b);

    if b_hi == 0 {
        // Single word divisor: reduce the high word first, then one narrowing division.
        let q_hi = a_hi / b_lo;
        let (q_lo, r) = div_wide(a_hi % b_lo, a_lo, b_lo);
        return (join(q_hi, q_lo), u128::from(r));
    }
    if a_hi < b_hi {
        return (0, a);
    }
    if b_hi == u64::MAX {
        // The divisor occupies the top word entirely, so the quotient is zero or one.
        return if a >= b { (1, a - b) } else { (0, a) };
    }

    // General case. Let l be the bit length of b_hi + 1; then
    // btop = (b_hi << (64 - l)) | (b_lo >> l) approximates b / 2^l from below.
    let l = u64::BITS - (b_hi + 1).leading_zeros();
    let mut btop = b_hi << (64 - l);
    btop |= b_lo.checked_shr(l).unwrap_or(0);

    let mut quotient: u64 = 0;
    // Pre-reduce so the high word of the dividend does not exceed btop. One round almost always
    // suffices; a second is possible when the divisor barely exceeds a word.
    while a_hi > btop {
        // Subtract b << (64 - l), which equals btop << 64 | b_lo << (64 - l).
        a_hi -= btop;
        let low = b_lo << (64 - l);
        if a_lo < low {
            a_hi -= 1;
        }
        a_lo = a_lo.wrapping_sub(low);
        quotient += 1 << (64 - l);
    }

    // Trial division by btop + 1. Rounding the divisor up makes the estimate an underestimate
    // of the true quotient once shifted back down by l.
    let (trial, _) = div_wide(a_hi, a_lo, btop + 1);
    let q_estimate = trial.checked_shr(l).unwrap_or(0);
    quotient += q_estimate;

    // Subtract q_estimate * b from the dividend.
    a_hi = a_hi.wrapping_sub(q_estimate.wrapping_mul(b_hi));
    let (z_hi, z_lo) = split(u128::from(q_estimate) * u128::from(b_lo));
    a_hi = a_hi.wrapping_sub(z_hi);
    if a_lo < z_lo {
        a_hi = a_hi.wrapping_sub(1);
    }
    a_lo = a_lo.wrapping_sub(z_lo);

    // Consume the remaining slack; the estimate is off by a small constant at most.
    while a_hi > b_hi || (a_hi == b_hi && a_lo >= b_lo) {
        quotient += 1;
        a_hi -= b_hi;
        if a_lo < b_lo {
            a_hi -= 1;
        }
        a_lo = a_lo.wrapping_sub(b_lo);
    }

    (u128::from(quotient), join(a_hi, a_lo))
}

/// Split into 64-bit words, most significant first.
fn split(value: u128) -> (u64, u64) {
    ((value >> 64) as u64, value as u64)
}

fn join(hi: u64, lo: u64) -> u128 {
    (u128::from(hi) << 64) | u128::from(lo)
}

/// Divide a two word dividend by a single word divisor.
///
/// The high word of the dividend must be below the divisor, such that the quotient fits a word.
fn div_wide(hi: u64, lo: u64, divisor: u64) -> (u64, u64) {
    debug_assert!(hi < divisor);

    let dividend = join(hi, lo);
    let divisor = u128::from(divisor);
    ((dividend / divisor) as u64, (dividend % divisor) as u64)
}
