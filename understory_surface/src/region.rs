// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer regions built from disjoint rectangles.

use smallvec::SmallVec;
use understory_map_mode::{IntPoint, IntRect};

/// Inline capacity for region rectangles; most clips are one to four rects.
const INLINE_RECTS: usize = 4;

type Rects = SmallVec<[IntRect; INLINE_RECTS]>;

/// A set of pixels described by disjoint, non-empty, half-open rectangles.
///
/// Rectangles are kept in insertion order and never overlap, so the area of
/// a region is the sum of its rectangles' areas. Two regions covering the
/// same pixels may still be split into rectangles differently; equality
/// compares the rectangle lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    rects: Rects,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a region covering `rect`.
    ///
    /// An empty rectangle yields an empty region.
    #[must_use]
    pub fn from_rect(rect: IntRect) -> Self {
        let mut region = Self::new();
        region.union_rect(rect);
        region
    }

    /// Returns `true` if the region covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Returns the disjoint rectangles making up the region.
    #[inline]
    pub fn rects(&self) -> &[IntRect] {
        &self.rects
    }

    /// Returns the smallest rectangle containing the whole region.
    ///
    /// An empty region has the bounds [`IntRect::ZERO`].
    pub fn bounds(&self) -> IntRect {
        self.rects
            .iter()
            .fold(IntRect::ZERO, |acc, rect| acc.union(rect))
    }

    /// Returns the number of pixels covered.
    pub fn area(&self) -> i128 {
        self.rects.iter().map(IntRect::area).sum()
    }

    /// Returns `true` if `pt` is covered by the region.
    pub fn contains(&self, pt: IntPoint) -> bool {
        self.rects.iter().any(|rect| rect.contains(pt))
    }

    /// Adds `rect` to the region.
    ///
    /// Only the parts of `rect` not already covered are stored, which keeps
    /// the rectangles disjoint.
    pub fn union_rect(&mut self, rect: IntRect) {
        if rect.is_empty() {
            return;
        }
        let mut pieces: Rects = SmallVec::new();
        pieces.push(rect);
        for existing in &self.rects {
            let mut remaining = Rects::new();
            for piece in pieces {
                subtract(piece, existing, &mut remaining);
            }
            pieces = remaining;
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    /// Adds every pixel of `other` to the region.
    pub fn union(&mut self, other: &Self) {
        for rect in &other.rects {
            self.union_rect(*rect);
        }
    }

    /// Restricts the region to `rect`.
    pub fn intersect_rect(&mut self, rect: &IntRect) {
        self.rects.retain(|r| {
            *r = r.intersect(rect);
            !r.is_empty()
        });
    }

    /// Restricts the region to the pixels also covered by `other`.
    pub fn intersect(&mut self, other: &Self) {
        let mut out = Rects::new();
        for a in &self.rects {
            for b in &other.rects {
                let r = a.intersect(b);
                if !r.is_empty() {
                    out.push(r);
                }
            }
        }
        self.rects = out;
    }

    /// Moves the region by `(dx, dy)`.
    pub fn translate(&mut self, dx: i64, dy: i64) {
        if dx == 0 && dy == 0 {
            return;
        }
        for rect in &mut self.rects {
            *rect = rect.translate(dx, dy);
        }
    }

    /// Builds a new region by mapping every rectangle through `f`.
    ///
    /// Mapped rectangles are normalized and re-unioned, so `f` may flip or
    /// round edges without breaking the disjointness of the result.
    #[must_use]
    pub fn map_rects(&self, mut f: impl FnMut(&IntRect) -> IntRect) -> Self {
        self.rects.iter().map(|rect| f(rect).normalized()).collect()
    }
}

impl From<IntRect> for Region {
    fn from(rect: IntRect) -> Self {
        Self::from_rect(rect)
    }
}

impl FromIterator<IntRect> for Region {
    fn from_iter<I: IntoIterator<Item = IntRect>>(iter: I) -> Self {
        let mut region = Self::new();
        for rect in iter {
            region.union_rect(rect);
        }
        region
    }
}

/// Pushes the parts of `piece` outside `cut` onto `out`, as up to four bands.
fn subtract(piece: IntRect, cut: &IntRect, out: &mut Rects) {
    let overlap = piece.intersect(cut);
    if overlap.is_empty() {
        out.push(piece);
        return;
    }
    if piece.y0 < overlap.y0 {
        out.push(IntRect::new(piece.x0, piece.y0, piece.x1, overlap.y0));
    }
    if overlap.y1 < piece.y1 {
        out.push(IntRect::new(piece.x0, overlap.y1, piece.x1, piece.y1));
    }
    if piece.x0 < overlap.x0 {
        out.push(IntRect::new(piece.x0, overlap.y0, overlap.x0, overlap.y1));
    }
    if overlap.x1 < piece.x1 {
        out.push(IntRect::new(overlap.x1, overlap.y0, piece.x1, overlap.y1));
    }
}
