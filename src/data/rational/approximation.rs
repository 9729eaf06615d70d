//! # Best bounded approximations
//!
//! Construction of a [`Rat`] pair from an arbitrary ratio. When the reduced ratio itself
//! satisfies the denominator bound, both elements of the pair are the ratio; otherwise they are
//! the two neighbouring elements of the Farey sequence enclosing it.
//!
//! The constructors run the Euclidean algorithm on the ratio, extending the continued fraction
//! one quotient at a time. Extension stops when the next quotient would push the denominator past
//! the bound, or would not fit a word at all. The convergent collected up to that point is the
//! best approximation on its side of the ratio; the best on the other side is the same expansion
//! extended with the largest coefficient the bound still admits. Any fraction strictly between
//! those two would be a better approximation on one of the sides, so the pair is consecutive in
//! the Farey sequence.
use num::BigUint;
use num::Integer;
use num::ToPrimitive;
use num::Zero;

use crate::data::rational::{bit_length, Rat};
use crate::data::uint128::divmod_u128;

impl Rat {
    /// The pair of closest bounded-denominator approximations of `num / den`.
    ///
    /// # Arguments
    ///
    /// * `num`: Numerator of the target ratio.
    /// * `den`: Denominator of the target ratio, nonzero.
    /// * `max_bits`: Bound on the denominator bit length, between 1 and 64.
    ///
    /// # Return value
    ///
    /// Pair `(lower, upper)` with `lower <= num / den <= upper`. If the reduced target satisfies
    /// the bound, both are equal to it; otherwise they are consecutive in the Farey sequence, so
    /// no bounded fraction separates them.
    pub fn new(num: u64, den: u64, max_bits: u32) -> (Rat, Rat) {
        Self::new_from_u128(u128::from(num), u128::from(den), max_bits)
    }

    /// The pair of closest bounded-denominator approximations of a 128-bit ratio.
    ///
    /// See [`Self::new`] for the contract.
    pub fn new_from_u128(mut num: u128, mut den: u128, max_bits: u32) -> (Rat, Rat) {
        assert_ne!(den, 0, "zero denominator");
        debug_assert!((1..=64).contains(&max_bits));

        let mut r = Rat::start(max_bits);
        while den != 0 {
            let (quotient, remainder) = divmod_u128(num, den);
            let extended = quotient
                .to_u64()
                .map_or(false, |q| r.try_extend(q));
            if !extended {
                return r.straddling_pair();
            }
            num = den;
            den = remainder;
        }
        r.exact_pair()
    }

    /// The pair of closest bounded-denominator approximations of an arbitrary precision ratio.
    ///
    /// See [`Self::new`] for the contract.
    pub fn new_from_big(num: &BigUint, den: &BigUint, max_bits: u32) -> (Rat, Rat) {
        assert!(!den.is_zero(), "zero denominator");
        debug_assert!((1..=64).contains(&max_bits));

        let mut num = num.clone();
        let mut den = den.clone();
        let mut r = Rat::start(max_bits);
        while !den.is_zero() {
            let (quotient, remainder) = num.div_rem(&den);
            let extended = quotient
                .to_u64()
                .map_or(false, |q| r.try_extend(q));
            if !extended {
                return r.straddling_pair();
            }
            num = den;
            den = remainder;
        }
        r.exact_pair()
    }

    /// Extend the expansion with the next Euclidean quotient, unless doing so would violate the
    /// denominator bound. Returns whether the coefficient was incorporated.
    fn try_extend(&mut self, q: u64) -> bool {
        let new_c = q.wrapping_mul(self.c).wrapping_add(self.d);
        let overflowed = self.c > 1 && new_c / self.c != q;
        if bit_length(new_c) > self.max_bits || overflowed {
            return false;
        }
        self.push_coefficient(q);
        true
    }

    /// The result pair when the Euclidean algorithm terminated with remainder zero.
    fn exact_pair(mut self) -> (Rat, Rat) {
        self.normalize();
        (self.clone(), self)
    }

    /// The result pair when extension was cut short by the denominator bound.
    ///
    /// The expansion held at that point is a convergent of the target, the best bounded
    /// approximation on its side; its length decides which side that is. For the other side the
    /// expansion is extended with the largest coefficient that keeps the denominator within
    /// bounds. When not even a coefficient of one fits, the two most recent convergents already
    /// enclose the target with nothing bounded in between, since any fraction strictly between
    /// them has a denominator of at least the sum of theirs.
    fn straddling_pair(mut self) -> (Rat, Rat) {
        assert!(
            self.c > 0,
            "the integer part of the ratio exceeds the denominator bound",
        );

        let bound = u64::MAX >> (64 - self.max_bits);
        let largest = (bound - self.d) / self.c;
        let other = if largest == 0 {
            self.pop_coefficient()
        } else {
            let mut semiconvergent = self.clone();
            semiconvergent.push_coefficient(largest);
            semiconvergent
        };

        let (mut lower, mut upper) = if self.cf.len() % 2 == 1 {
            // Expansions of odd length undershoot the target.
            (self, other)
        } else {
            (other, self)
        };
        lower.normalize();
        upper.normalize();
        (lower, upper)
    }

    /// The previous convergent, undoing the last coefficient.
    fn pop_coefficient(&self) -> Rat {
        debug_assert!(self.cf.len() > 1);

        let mut previous = self.clone();
        let n = previous.cf.pop().unwrap();
        previous.a = self.b;
        previous.b = self.a - n * self.b;
        previous.c = self.d;
        previous.d = self.c - n * self.d;
        previous
    }
}
