// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reduced rational numbers and overflow-guarded composition of scale factors.

use core::fmt;

use crate::error::MapModeError;

/// Largest numerator or denominator a composed fraction may carry.
const REPRESENTABLE_MAX: u128 = i32::MAX as u128;

/// Significant bits kept by [`combine`] after composition.
pub const COMBINE_SIGNIFICANT_BITS: u32 = 32;

/// A rational number in lowest terms.
///
/// The denominator is always positive; the sign is carried by the numerator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// The fraction `1/1`.
    pub const ONE: Self = Self::from_integer(1);

    /// The fraction `0/1`.
    pub const ZERO: Self = Self::from_integer(0);

    /// Creates a normalized fraction `numerator / denominator`.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero. Use [`Rational::try_new`] for
    /// untrusted input.
    #[must_use]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        match Self::try_new(numerator, denominator) {
            Ok(r) => r,
            Err(_) => panic!("Rational denominator must be non-zero"),
        }
    }

    /// Creates a normalized fraction, rejecting a zero denominator.
    ///
    /// The result is reduced by the greatest common divisor and has a
    /// positive denominator. The single unrepresentable case,
    /// `i64::MIN / -1`, saturates to `i64::MAX`.
    pub fn try_new(numerator: i64, denominator: i64) -> Result<Self, MapModeError> {
        if denominator == 0 {
            return Err(MapModeError::ZeroDenominator);
        }
        let negative = (numerator < 0) != (denominator < 0);
        Ok(Self::from_magnitudes(
            negative,
            u128::from(numerator.unsigned_abs()),
            u128::from(denominator.unsigned_abs()),
        ))
    }

    /// Creates the fraction `value / 1`.
    #[inline]
    pub const fn from_integer(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    /// Returns the numerator (carries the sign).
    #[inline]
    pub const fn numerator(self) -> i64 {
        self.numerator
    }

    /// Returns the denominator (always positive).
    #[inline]
    pub const fn denominator(self) -> i64 {
        self.denominator
    }

    /// Returns `true` if the fraction equals zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.numerator == 0
    }

    /// Returns the value as a float.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Multiplies two fractions through [`combine`].
    #[inline]
    #[must_use]
    pub fn combine_with(self, other: Self) -> Self {
        combine(
            self.numerator,
            other.numerator,
            self.denominator,
            other.denominator,
        )
    }

    /// Drops low-order bits so that neither part exceeds `significant_bits` bits.
    ///
    /// The same number of bits is removed from numerator and denominator (the
    /// smaller of the two excesses), which keeps the ratio approximately
    /// intact. If the reduction would zero either part, the fraction is
    /// returned unchanged.
    #[must_use]
    pub fn reduce_inaccurate(self, significant_bits: u32) -> Self {
        if self.numerator == 0 {
            return self;
        }
        let num = self.numerator.unsigned_abs();
        let den = self.denominator.unsigned_abs();
        let num_excess = bit_length(num).saturating_sub(significant_bits);
        let den_excess = bit_length(den).saturating_sub(significant_bits);
        let lose = num_excess.min(den_excess);
        if lose == 0 {
            return self;
        }
        let (num, den) = (num >> lose, den >> lose);
        if num == 0 || den == 0 {
            return self;
        }
        Self::from_magnitudes(self.numerator < 0, u128::from(num), u128::from(den))
    }

    fn from_magnitudes(negative: bool, num: u128, den: u128) -> Self {
        let g = gcd(num, den).max(1);
        let num = i64::try_from(num / g).unwrap_or(i64::MAX);
        let den = i64::try_from(den / g).unwrap_or(i64::MAX);
        Self {
            numerator: if negative { -num } else { num },
            denominator: den,
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Returns `(n1 / d1) * (n2 / d2)` as a reduced, bounded fraction.
///
/// Degenerate input (either denominator zero) is tolerated: a warning is
/// logged and the identity fraction `1/1` is returned. Use [`try_combine`]
/// to treat it as an error instead.
pub fn combine(n1: i64, n2: i64, d1: i64, d2: i64) -> Rational {
    match try_combine(n1, n2, d1, d2) {
        Ok(r) => r,
        Err(err) => {
            tracing::warn!(n1, n2, d1, d2, %err, "degenerate fraction composition, using 1/1");
            Rational::ONE
        }
    }
}

/// Strict form of [`combine`] that reports zero denominators.
///
/// The product is formed in 128-bit arithmetic and reduced. If the reduced
/// numerator or denominator does not fit a signed 32-bit integer, the larger
/// numerator operand and the larger denominator operand are halved (rounding
/// up) and the product is retried. Each halving moves an operand toward 1, so
/// the loop ends after at most the operands' bit width of rounds. The result
/// is finally passed through
/// [`Rational::reduce_inaccurate`]`(`[`COMBINE_SIGNIFICANT_BITS`]`)`.
pub fn try_combine(n1: i64, n2: i64, d1: i64, d2: i64) -> Result<Rational, MapModeError> {
    if d1 == 0 || d2 == 0 {
        return Err(MapModeError::ZeroDenominator);
    }
    let negative = (n1 < 0) ^ (n2 < 0) ^ (d1 < 0) ^ (d2 < 0);
    let (mut n1, mut n2) = (n1.unsigned_abs(), n2.unsigned_abs());
    let (mut d1, mut d2) = (d1.unsigned_abs(), d2.unsigned_abs());

    let (num, den) = loop {
        if let Some(product) = representable_product(n1, n2, d1, d2) {
            break product;
        }
        if n1 > n2 {
            n1 = n1.div_ceil(2);
        } else {
            n2 = n2.div_ceil(2);
        }
        if d1 > d2 {
            d1 = d1.div_ceil(2);
        } else {
            d2 = d2.div_ceil(2);
        }
    };

    let num = i64::from(num);
    let reduced = Rational {
        numerator: if negative { -num } else { num },
        denominator: i64::from(den),
    };
    Ok(reduced.reduce_inaccurate(COMBINE_SIGNIFICANT_BITS))
}

fn representable_product(n1: u64, n2: u64, d1: u64, d2: u64) -> Option<(u32, u32)> {
    let num = u128::from(n1) * u128::from(n2);
    let den = u128::from(d1) * u128::from(d2);
    let g = gcd(num, den).max(1);
    let (num, den) = (num / g, den / g);
    if num > REPRESENTABLE_MAX || den > REPRESENTABLE_MAX {
        return None;
    }
    Some((u32::try_from(num).ok()?, u32::try_from(den).ok()?))
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}
