// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::error::MapModeError;
use crate::fraction::Rational;
use crate::geometry::IntPoint;
use crate::unit::MapUnit;

/// A logical unit system: unit, logical origin and per-axis scale.
///
/// `MapMode` is a small immutable value. Switching units means building a new
/// value; nothing mutates a map mode in place.
///
/// For [`MapUnit::Relative`] both scale numerators are guaranteed non-zero,
/// since relative offsets are divided by them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapMode {
    unit: MapUnit,
    origin: IntPoint,
    scale_x: Rational,
    scale_y: Rational,
}

impl Default for MapMode {
    /// The default mode: pixels, zero origin, unit scale.
    fn default() -> Self {
        Self::new(MapUnit::Pixel)
    }
}

impl MapMode {
    /// Creates a map mode for `unit` with a zero origin and unit scale.
    #[inline]
    pub const fn new(unit: MapUnit) -> Self {
        Self {
            unit,
            origin: IntPoint::ZERO,
            scale_x: Rational::ONE,
            scale_y: Rational::ONE,
        }
    }

    /// Creates a fully specified map mode.
    ///
    /// Fails with [`MapModeError::ZeroRelativeScale`] for a relative unit with
    /// a zero scale numerator.
    pub fn try_new(
        unit: MapUnit,
        origin: IntPoint,
        scale_x: Rational,
        scale_y: Rational,
    ) -> Result<Self, MapModeError> {
        if unit.is_relative() && (scale_x.is_zero() || scale_y.is_zero()) {
            return Err(MapModeError::ZeroRelativeScale);
        }
        Ok(Self {
            unit,
            origin,
            scale_x,
            scale_y,
        })
    }

    /// Creates a relative map mode.
    ///
    /// Shorthand for [`MapMode::try_new`] with [`MapUnit::Relative`].
    pub fn relative(
        origin: IntPoint,
        scale_x: Rational,
        scale_y: Rational,
    ) -> Result<Self, MapModeError> {
        Self::try_new(MapUnit::Relative, origin, scale_x, scale_y)
    }

    /// Returns a copy with a different logical origin.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, origin: IntPoint) -> Self {
        Self { origin, ..self }
    }

    /// Returns a copy with different scale factors.
    pub fn with_scale(self, scale_x: Rational, scale_y: Rational) -> Result<Self, MapModeError> {
        Self::try_new(self.unit, self.origin, scale_x, scale_y)
    }

    /// Returns the unit.
    #[inline]
    pub const fn unit(&self) -> MapUnit {
        self.unit
    }

    /// Returns the logical origin.
    #[inline]
    pub const fn origin(&self) -> IntPoint {
        self.origin
    }

    /// Returns the horizontal scale factor.
    #[inline]
    pub const fn scale_x(&self) -> Rational {
        self.scale_x
    }

    /// Returns the vertical scale factor.
    #[inline]
    pub const fn scale_y(&self) -> Rational {
        self.scale_y
    }

    /// Folds a relative mode into this one.
    ///
    /// The result keeps this mode's unit, multiplies the scale factors through
    /// [`crate::combine`] and takes `origin` as its logical origin; callers
    /// pass the offset resolved by [`crate::MappingMetrics::compute_relative`].
    #[must_use]
    pub fn compose_relative(&self, relative: &Self, origin: IntPoint) -> Self {
        Self {
            unit: self.unit,
            origin,
            scale_x: self.scale_x.combine_with(relative.scale_x),
            scale_y: self.scale_y.combine_with(relative.scale_y),
        }
    }

    /// Returns `true` for the default mode (pixels, zero origin, unit scale).
    ///
    /// A surface in the default mode performs no logical mapping at all.
    #[inline]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for MapMode {
    /// Renders `MapMode(unit,(sx,sy)@(ox,oy))`, for logging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MapMode({},({},{})@({},{}))",
            self.unit, self.scale_x, self.scale_y, self.origin.x, self.origin.y
        )
    }
}
