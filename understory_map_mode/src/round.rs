// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Divides `numerator` by `denominator`, rounding to nearest with ties away from zero.
///
/// Magnitudes are rounded and the sign is applied afterwards, so the rounding
/// is symmetric: `round_div(3, 2) == 2` and `round_div(-3, 2) == -2`.
///
/// `denominator` must be non-zero.
pub(crate) fn round_div(numerator: i128, denominator: i128) -> i128 {
    let negative = (numerator < 0) != (denominator < 0);
    let n = numerator.unsigned_abs();
    let d = denominator.unsigned_abs();
    let (q, r) = (n / d, n % d);
    let q = if r >= d - r { q + 1 } else { q };
    let q = i128::try_from(q).unwrap_or(i128::MAX);
    if negative { -q } else { q }
}

/// Narrows a wide intermediate back to `i64`, saturating at the range bounds.
pub(crate) fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
