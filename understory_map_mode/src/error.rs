// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors produced when building rationals and map modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum MapModeError {
    /// A fraction was given a zero denominator.
    #[error("fraction has a zero denominator")]
    ZeroDenominator,
    /// A relative map mode was given a scale with a zero numerator.
    ///
    /// Relative offsets are divided by the scale numerator, so it must be non-zero.
    #[error("relative map mode requires non-zero scale numerators")]
    ZeroRelativeScale,
    /// A raw unit value does not name any [`crate::MapUnit`].
    #[error("unknown map unit {0}")]
    UnknownUnit(u16),
}
