// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer points, sizes and rectangles used for logical and device coordinates.

/// A point with integer coordinates.
///
/// Used both for logical coordinates (in the units of the active map mode)
/// and for device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
}

impl IntPoint {
    /// The origin, `(0, 0)`.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new point.
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`, saturating at the `i64` range.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Converts to kurbo's floating-point point type.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x as f64, self.y as f64)
    }
}

impl From<(i64, i64)> for IntPoint {
    #[inline]
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair with integer extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    /// Horizontal extent.
    pub width: i64,
    /// Vertical extent.
    pub height: i64,
}

impl IntSize {
    /// A zero-sized extent.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new size.
    #[inline]
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either extent is zero or negative.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned rectangle with integer coordinates.
///
/// The rectangle is half-open: it covers `[x0, x1) × [y0, y1)`. A rectangle
/// whose maximum does not exceed its minimum on either axis is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Minimum X coordinate (inclusive).
    pub x0: i64,
    /// Minimum Y coordinate (inclusive).
    pub y0: i64,
    /// Maximum X coordinate (exclusive).
    pub x1: i64,
    /// Maximum Y coordinate (exclusive).
    pub y1: i64,
}

impl IntRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Creates a rectangle from its minimum corner and its size.
    #[inline]
    pub const fn from_origin_size(origin: IntPoint, size: IntSize) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(size.width),
            origin.y.saturating_add(size.height),
        )
    }

    /// Returns the minimum corner.
    #[inline]
    pub const fn origin(&self) -> IntPoint {
        IntPoint::new(self.x0, self.y0)
    }

    /// Returns the width, `x1 - x0`.
    #[inline]
    pub const fn width(&self) -> i64 {
        self.x1.saturating_sub(self.x0)
    }

    /// Returns the height, `y1 - y0`.
    #[inline]
    pub const fn height(&self) -> i64 {
        self.y1.saturating_sub(self.y0)
    }

    /// Returns the size of the rectangle.
    #[inline]
    pub const fn size(&self) -> IntSize {
        IntSize::new(self.width(), self.height())
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Returns the area covered by the rectangle, or zero when empty.
    #[inline]
    pub fn area(&self) -> i128 {
        if self.is_empty() {
            0
        } else {
            i128::from(self.width()) * i128::from(self.height())
        }
    }

    /// Returns `true` if `pt` lies inside the half-open rectangle.
    #[inline]
    pub const fn contains(&self, pt: IntPoint) -> bool {
        pt.x >= self.x0 && pt.x < self.x1 && pt.y >= self.y0 && pt.y < self.y1
    }

    /// Returns `true` if `other` lies entirely inside this rectangle.
    ///
    /// An empty `other` is contained in every rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.is_empty()
            || (other.x0 >= self.x0
                && other.x1 <= self.x1
                && other.y0 >= self.y0
                && other.y1 <= self.y1)
    }

    /// Returns the intersection of two rectangles.
    ///
    /// The result may be empty; check with [`IntRect::is_empty`].
    #[inline]
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }

    /// Returns the smallest rectangle containing both rectangles.
    ///
    /// Empty rectangles do not contribute to the result.
    #[inline]
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Returns this rectangle moved by `(dx, dy)`, saturating at the `i64` range.
    #[inline]
    #[must_use]
    pub const fn translate(&self, dx: i64, dy: i64) -> Self {
        Self::new(
            self.x0.saturating_add(dx),
            self.y0.saturating_add(dy),
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
        )
    }

    /// Returns a copy with min/max swapped where needed so that `x0 <= x1` and `y0 <= y1`.
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(
            self.x0.min(self.x1),
            self.y0.min(self.y1),
            self.x0.max(self.x1),
            self.y0.max(self.y1),
        )
    }

    /// Converts to kurbo's floating-point rectangle type.
    #[inline]
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.x0 as f64,
            self.y0 as f64,
            self.x1 as f64,
            self.y1 as f64,
        )
    }
}
