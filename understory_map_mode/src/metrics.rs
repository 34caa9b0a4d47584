// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved mapping state and integer logical/pixel conversion.

use crate::app_font::AppFont;
use crate::fraction::{Rational, combine};
use crate::geometry::{IntPoint, IntRect, IntSize};
use crate::map_mode::MapMode;
use crate::round::{round_div, saturate};

/// Scale and offset resolved from a [`MapMode`] at a given DPI.
///
/// A logical coordinate `n` maps to the pixel coordinate
/// `(n + offset) * num * dpi / denom`, rounded to nearest with ties away
/// from zero. The scale excludes the DPI; see
/// [`MappingMetrics::device_scale_x`] for pixels per logical unit.
///
/// Metrics are a pure function of their inputs (plus, for relative modes, the
/// previous metrics) and are cached by their owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MappingMetrics {
    offset: IntPoint,
    scale_x: Rational,
    scale_y: Rational,
}

impl Default for MappingMetrics {
    fn default() -> Self {
        Self {
            offset: IntPoint::ZERO,
            scale_x: Rational::ONE,
            scale_y: Rational::ONE,
        }
    }
}

impl MappingMetrics {
    /// The plain pixel mapping at `dpi`: zero offset, scale `1/dpi`.
    ///
    /// This is the base a relative map mode composes onto when no mapping
    /// was active before it.
    pub fn pixel_base(dpi_x: i32, dpi_y: i32) -> Self {
        Self {
            offset: IntPoint::ZERO,
            scale_x: combine(1, 1, i64::from(dpi_x), 1),
            scale_y: combine(1, 1, i64::from(dpi_y), 1),
        }
    }

    /// Resolves `mode` at the given DPI.
    ///
    /// `app_font` is called only for font-relative units. A relative `mode`
    /// is composed onto [`MappingMetrics::pixel_base`].
    pub fn compute(
        mode: &MapMode,
        dpi_x: i32,
        dpi_y: i32,
        app_font: impl FnOnce() -> AppFont,
    ) -> Self {
        Self::pixel_base(dpi_x, dpi_y).compute_relative(mode, dpi_x, dpi_y, app_font)
    }

    /// Resolves `mode`, using `self` as the previous mapping.
    ///
    /// For absolute units `self` is ignored and the result equals
    /// [`MappingMetrics::compute`]. For [`crate::MapUnit::Relative`]:
    /// - the new offset is `round(previous_offset * scale.denom / scale.num) + origin`,
    ///   evaluated in 128-bit arithmetic;
    /// - the new scale is the previous scale multiplied by the relative scale.
    pub fn compute_relative(
        &self,
        mode: &MapMode,
        dpi_x: i32,
        dpi_y: i32,
        app_font: impl FnOnce() -> AppFont,
    ) -> Self {
        let origin = mode.origin();
        let (sx, sy) = (mode.scale_x(), mode.scale_y());
        let (base_x, base_y, offset) = match mode.unit().scale(dpi_x, dpi_y, app_font) {
            Some(unit) => (
                (unit.num_x, unit.denom_x),
                (unit.num_y, unit.denom_y),
                origin,
            ),
            None => (
                (self.scale_x.numerator(), self.scale_x.denominator()),
                (self.scale_y.numerator(), self.scale_y.denominator()),
                IntPoint::new(
                    relative_offset(self.offset.x, sx, origin.x),
                    relative_offset(self.offset.y, sy, origin.y),
                ),
            ),
        };
        Self {
            offset,
            scale_x: combine(base_x.0, sx.numerator(), base_x.1, sx.denominator()),
            scale_y: combine(base_y.0, sy.numerator(), base_y.1, sy.denominator()),
        }
    }

    /// Returns a copy with the logical offset replaced and the scale kept.
    ///
    /// Switching between map modes that differ only in their origin resolves
    /// to exactly this.
    #[inline]
    #[must_use]
    pub const fn with_offset(self, offset: IntPoint) -> Self {
        Self { offset, ..self }
    }

    /// Returns the logical offset added before scaling.
    #[inline]
    pub const fn offset(&self) -> IntPoint {
        self.offset
    }

    /// Returns the horizontal scale, excluding DPI.
    #[inline]
    pub const fn scale_x(&self) -> Rational {
        self.scale_x
    }

    /// Returns the vertical scale, excluding DPI.
    #[inline]
    pub const fn scale_y(&self) -> Rational {
        self.scale_y
    }

    /// Returns the number of horizontal pixels per logical unit at `dpi_x`.
    pub fn device_scale_x(&self, dpi_x: i32) -> Rational {
        combine(
            self.scale_x.numerator(),
            i64::from(dpi_x),
            self.scale_x.denominator(),
            1,
        )
    }

    /// Returns the number of vertical pixels per logical unit at `dpi_y`.
    pub fn device_scale_y(&self, dpi_y: i32) -> Rational {
        combine(
            self.scale_y.numerator(),
            i64::from(dpi_y),
            self.scale_y.denominator(),
            1,
        )
    }

    /// Converts a logical X coordinate to pixels.
    #[inline]
    pub fn logic_to_pixel_x(&self, x: i64, dpi_x: i32) -> i64 {
        logic_to_pixel(
            i128::from(x) + i128::from(self.offset.x),
            dpi_x,
            self.scale_x,
        )
    }

    /// Converts a logical Y coordinate to pixels.
    #[inline]
    pub fn logic_to_pixel_y(&self, y: i64, dpi_y: i32) -> i64 {
        logic_to_pixel(
            i128::from(y) + i128::from(self.offset.y),
            dpi_y,
            self.scale_y,
        )
    }

    /// Converts a pixel X coordinate to logical units.
    #[inline]
    pub fn pixel_to_logic_x(&self, x: i64, dpi_x: i32) -> i64 {
        saturate(pixel_to_logic(x, dpi_x, self.scale_x) - i128::from(self.offset.x))
    }

    /// Converts a pixel Y coordinate to logical units.
    #[inline]
    pub fn pixel_to_logic_y(&self, y: i64, dpi_y: i32) -> i64 {
        saturate(pixel_to_logic(y, dpi_y, self.scale_y) - i128::from(self.offset.y))
    }

    /// Converts a logical width (no offset applied) to pixels.
    #[inline]
    pub fn logic_width_to_pixel(&self, width: i64, dpi_x: i32) -> i64 {
        logic_to_pixel(i128::from(width), dpi_x, self.scale_x)
    }

    /// Converts a logical height (no offset applied) to pixels.
    #[inline]
    pub fn logic_height_to_pixel(&self, height: i64, dpi_y: i32) -> i64 {
        logic_to_pixel(i128::from(height), dpi_y, self.scale_y)
    }

    /// Converts a pixel width (no offset applied) to logical units.
    #[inline]
    pub fn pixel_width_to_logic(&self, width: i64, dpi_x: i32) -> i64 {
        saturate(pixel_to_logic(width, dpi_x, self.scale_x))
    }

    /// Converts a pixel height (no offset applied) to logical units.
    #[inline]
    pub fn pixel_height_to_logic(&self, height: i64, dpi_y: i32) -> i64 {
        saturate(pixel_to_logic(height, dpi_y, self.scale_y))
    }

    /// Converts a logical point to pixels.
    pub fn logic_to_pixel(&self, pt: IntPoint, dpi_x: i32, dpi_y: i32) -> IntPoint {
        IntPoint::new(
            self.logic_to_pixel_x(pt.x, dpi_x),
            self.logic_to_pixel_y(pt.y, dpi_y),
        )
    }

    /// Converts a pixel point to logical units.
    pub fn pixel_to_logic(&self, pt: IntPoint, dpi_x: i32, dpi_y: i32) -> IntPoint {
        IntPoint::new(
            self.pixel_to_logic_x(pt.x, dpi_x),
            self.pixel_to_logic_y(pt.y, dpi_y),
        )
    }

    /// Converts a logical rectangle to pixels by mapping both corners.
    pub fn logic_rect_to_pixel(&self, rect: &IntRect, dpi_x: i32, dpi_y: i32) -> IntRect {
        IntRect::new(
            self.logic_to_pixel_x(rect.x0, dpi_x),
            self.logic_to_pixel_y(rect.y0, dpi_y),
            self.logic_to_pixel_x(rect.x1, dpi_x),
            self.logic_to_pixel_y(rect.y1, dpi_y),
        )
        .normalized()
    }

    /// Converts a pixel rectangle to logical units by mapping both corners.
    pub fn pixel_rect_to_logic(&self, rect: &IntRect, dpi_x: i32, dpi_y: i32) -> IntRect {
        IntRect::new(
            self.pixel_to_logic_x(rect.x0, dpi_x),
            self.pixel_to_logic_y(rect.y0, dpi_y),
            self.pixel_to_logic_x(rect.x1, dpi_x),
            self.pixel_to_logic_y(rect.y1, dpi_y),
        )
        .normalized()
    }

    /// Converts a logical size to pixels.
    pub fn logic_size_to_pixel(&self, size: IntSize, dpi_x: i32, dpi_y: i32) -> IntSize {
        IntSize::new(
            self.logic_width_to_pixel(size.width, dpi_x),
            self.logic_height_to_pixel(size.height, dpi_y),
        )
    }

    /// Converts a pixel size to logical units.
    pub fn pixel_size_to_logic(&self, size: IntSize, dpi_x: i32, dpi_y: i32) -> IntSize {
        IntSize::new(
            self.pixel_width_to_logic(size.width, dpi_x),
            self.pixel_height_to_logic(size.height, dpi_y),
        )
    }
}

/// Converts a logical point between two resolved mappings.
///
/// Both metrics must have been resolved at the same DPI; the DPI cancels out
/// and does not appear in the computation.
pub fn convert_logic(pt: IntPoint, source: &MappingMetrics, dest: &MappingMetrics) -> IntPoint {
    IntPoint::new(
        convert_axis(
            pt.x,
            source.offset.x,
            source.scale_x,
            dest.offset.x,
            dest.scale_x,
        ),
        convert_axis(
            pt.y,
            source.offset.y,
            source.scale_y,
            dest.offset.y,
            dest.scale_y,
        ),
    )
}

fn convert_axis(n: i64, src_offset: i64, src: Rational, dst_offset: i64, dst: Rational) -> i64 {
    let numerator = (i128::from(n) + i128::from(src_offset))
        * i128::from(src.numerator())
        * i128::from(dst.denominator());
    let divisor = i128::from(src.denominator()) * i128::from(dst.numerator());
    let value = if divisor == 0 {
        0
    } else {
        round_div(numerator, divisor)
    };
    saturate(value - i128::from(dst_offset))
}

fn relative_offset(previous: i64, scale: Rational, origin: i64) -> i64 {
    let shifted = round_div(
        i128::from(previous) * i128::from(scale.denominator()),
        i128::from(scale.numerator()),
    );
    saturate(shifted + i128::from(origin))
}

fn logic_to_pixel(n: i128, dpi: i32, scale: Rational) -> i64 {
    let n = n * i128::from(scale.numerator()) * i128::from(dpi);
    if scale.denominator() == 1 {
        saturate(n)
    } else {
        saturate(round_div(n, i128::from(scale.denominator())))
    }
}

fn pixel_to_logic(n: i64, dpi: i32, scale: Rational) -> i128 {
    let divisor = i128::from(dpi) * i128::from(scale.numerator());
    if divisor == 0 {
        return 0;
    }
    let n = i128::from(n) * i128::from(scale.denominator());
    if divisor == 1 {
        n
    } else {
        round_div(n, divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::{MappingMetrics, convert_logic};
    use crate::app_font::AppFont;
    use crate::fraction::Rational;
    use crate::geometry::{IntPoint, IntRect};
    use crate::map_mode::MapMode;
    use crate::unit::MapUnit;

    struct Lcg(u64);

    impl Lcg {
        fn next_u32(&mut self) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 32) as u32
        }

        fn range(&mut self, lo: i64, hi: i64) -> i64 {
            let span = (hi - lo + 1) as u64;
            lo + (u64::from(self.next_u32()) % span) as i64
        }
    }

    /// Exact reference: nearest integer to `a / b`, ties away from zero,
    /// evaluated with floor division instead of magnitude rounding.
    fn reference_round(a: i128, b: i128) -> i128 {
        let (a, b) = if b < 0 { (-a, -b) } else { (a, b) };
        let q = a.div_euclid(b);
        let r = a.rem_euclid(b);
        // a / b = q + r / b with 0 <= r < b.
        match (2 * r).cmp(&b) {
            core::cmp::Ordering::Less => q,
            core::cmp::Ordering::Greater => q + 1,
            // Exactly halfway between q and q + 1.
            core::cmp::Ordering::Equal => {
                if q >= 0 {
                    q + 1
                } else {
                    q
                }
            }
        }
    }

    fn metrics(mode: MapMode, dpi: i32) -> MappingMetrics {
        MappingMetrics::compute(&mode, dpi, dpi, AppFont::default)
    }

    #[test]
    fn point_at_96_dpi_is_four_thirds() {
        let m = metrics(MapMode::new(MapUnit::Point), 96);
        assert_eq!(m.scale_x(), Rational::new(1, 72));
        assert_eq!(m.device_scale_x(96), Rational::new(4, 3));
        assert_eq!(m.device_scale_y(96), Rational::new(4, 3));
        assert_eq!(m.logic_to_pixel(IntPoint::new(72, 72), 96, 96), IntPoint::new(96, 96));
    }

    #[test]
    fn absolute_offset_is_the_origin() {
        let mode = MapMode::new(MapUnit::Mm).with_origin(IntPoint::new(10, -20));
        let m = metrics(mode, 254);
        assert_eq!(m.offset(), IntPoint::new(10, -20));
        // 254 dpi: one millimeter is exactly 10 pixels.
        assert_eq!(m.logic_to_pixel_x(0, 254), 100);
        assert_eq!(m.logic_to_pixel_y(20, 254), 0);
        assert_eq!(m.pixel_to_logic_x(100, 254), 0);
    }

    #[test]
    fn explicit_scale_multiplies_unit_scale() {
        let mode = MapMode::new(MapUnit::Inch)
            .with_scale(Rational::new(1, 2), Rational::new(3, 1))
            .unwrap();
        let m = metrics(mode, 100);
        assert_eq!(m.scale_x(), Rational::new(1, 2));
        assert_eq!(m.scale_y(), Rational::new(3, 1));
        assert_eq!(m.logic_to_pixel(IntPoint::new(2, 2), 100, 100), IntPoint::new(100, 600));
    }

    #[test]
    fn pixel_unit_is_identity_at_any_dpi() {
        let m = metrics(MapMode::new(MapUnit::Pixel), 120);
        assert_eq!(m.device_scale_x(120), Rational::ONE);
        assert_eq!(m.logic_to_pixel_x(-37, 120), -37);
        assert_eq!(m.pixel_to_logic_y(55, 120), 55);
    }

    #[test]
    fn zero_dpi_degrades_to_identity_scale() {
        let m = metrics(MapMode::new(MapUnit::Pixel), 0);
        assert_eq!(m.scale_x(), Rational::ONE);
    }

    #[test]
    fn app_font_unit_consults_probe_once() {
        let mut calls = 0;
        let m = MappingMetrics::compute(&MapMode::new(MapUnit::AppFont), 96, 96, || {
            calls += 1;
            AppFont { x: 80, y: 160 }
        });
        assert_eq!(calls, 1);
        // 40 app-font units horizontally are one widened character cell: 80 / 96 inch.
        assert_eq!(m.logic_width_to_pixel(40, 96), 80);
        assert_eq!(m.logic_height_to_pixel(80, 96), 160);
    }

    #[test]
    fn relative_mode_composes_scale_and_offset() {
        let base = metrics(
            MapMode::new(MapUnit::Point).with_origin(IntPoint::new(100, -100)),
            72,
        );
        let rel = MapMode::relative(IntPoint::new(3, 4), Rational::new(1, 2), Rational::new(1, 2))
            .unwrap();
        let m = base.compute_relative(&rel, 72, 72, AppFont::default);
        // 100 old units are 200 new units, plus the relative origin.
        assert_eq!(m.offset(), IntPoint::new(203, -196));
        assert_eq!(m.scale_x(), Rational::new(1, 144));

        // The same logical point lands on the same pixel when expressed in
        // either mapping.
        let old_px = base.logic_to_pixel(IntPoint::new(10, 10), 72, 72);
        let new_px = m.logic_to_pixel(IntPoint::new(20 - 3, 20 - 4), 72, 72);
        assert_eq!(old_px, new_px);
    }

    #[test]
    fn relative_without_previous_uses_pixel_base() {
        let rel = MapMode::relative(IntPoint::new(5, 5), Rational::new(2, 1), Rational::new(2, 1))
            .unwrap();
        let m = metrics(rel, 96);
        assert_eq!(m.offset(), IntPoint::new(5, 5));
        assert_eq!(m.device_scale_x(96), Rational::new(2, 1));
    }

    #[test]
    fn chained_relative_offsets_match_exact_reference() {
        let mut rng = Lcg(0xdecafbad);
        for _ in 0..64 {
            let start = rng.range(-5_000_000_000, 5_000_000_000);
            let base = metrics(
                MapMode::new(MapUnit::TenthMm).with_origin(IntPoint::new(start, -start)),
                96,
            );

            let mut chain = base;
            let mut expected = i128::from(start);
            for _ in 0..2 {
                let mut num = rng.range(-40, 40);
                if num == 0 {
                    num = 1;
                }
                let den = rng.range(1, 40);
                let origin = rng.range(-1_000, 1_000);
                let scale = Rational::new(num, den);
                let rel = MapMode::relative(IntPoint::new(origin, origin), scale, scale).unwrap();
                chain = chain.compute_relative(&rel, 96, 96, AppFont::default);
                expected = reference_round(
                    expected * i128::from(scale.denominator()),
                    i128::from(scale.numerator()),
                ) + i128::from(origin);
                assert_eq!(i128::from(chain.offset().x), expected);
            }
        }
    }

    #[test]
    fn relative_offset_survives_wide_intermediates() {
        // previous_offset * denominator overflows i64 but not the result.
        let base = metrics(
            MapMode::new(MapUnit::Twip).with_origin(IntPoint::new(i64::MAX / 4, i64::MIN / 4)),
            96,
        );
        let scale = Rational::new(1_000_000_007, 1_000_000_009);
        let rel = MapMode::relative(IntPoint::ZERO, scale, scale).unwrap();
        let m = base.compute_relative(&rel, 96, 96, AppFont::default);
        let expected = (i128::from(i64::MAX / 4) * 1_000_000_009) / 1_000_000_007;
        assert!((i128::from(m.offset().x) - expected).abs() <= 1);
        assert!(m.offset().y < 0);
    }

    #[test]
    fn round_trip_within_one_step_for_absolute_units() {
        let mut rng = Lcg(7);
        for unit in MapUnit::ALL {
            if unit.is_relative() {
                continue;
            }
            let mode = MapMode::new(unit).with_origin(IntPoint::new(13, -29));
            let m = MappingMetrics::compute(&mode, 96, 72, || AppFont { x: 70, y: 60 });
            let coarse_x = {
                let s = m.device_scale_x(96);
                s.numerator() >= s.denominator()
            };
            let coarse_y = {
                let s = m.device_scale_y(72);
                s.numerator() >= s.denominator()
            };
            for _ in 0..50 {
                let v = rng.range(-100_000, 100_000);
                // Round-trip through the coarser grid of the two.
                let dx = if coarse_x {
                    m.pixel_to_logic_x(m.logic_to_pixel_x(v, 96), 96) - v
                } else {
                    m.logic_to_pixel_x(m.pixel_to_logic_x(v, 96), 96) - v
                };
                let dy = if coarse_y {
                    m.pixel_to_logic_y(m.logic_to_pixel_y(v, 72), 72) - v
                } else {
                    m.logic_to_pixel_y(m.pixel_to_logic_y(v, 72), 72) - v
                };
                assert!(dx.abs() <= 1, "{unit}: x {v} drifted by {dx}");
                assert!(dy.abs() <= 1, "{unit}: y {v} drifted by {dy}");
            }
        }
    }

    #[test]
    fn rects_and_sizes_convert_per_edge() {
        let m = metrics(MapMode::new(MapUnit::Point), 144);
        let rect = m.logic_rect_to_pixel(&IntRect::new(0, 0, 36, 72), 144, 144);
        assert_eq!(rect, IntRect::new(0, 0, 72, 144));
        let back = m.pixel_rect_to_logic(&rect, 144, 144);
        assert_eq!(back, IntRect::new(0, 0, 36, 72));
    }

    #[test]
    fn logic_to_logic_between_units() {
        let mm = metrics(MapMode::new(MapUnit::Mm), 96);
        let hmm = metrics(MapMode::new(MapUnit::HundredthMm), 96);
        let inch = metrics(MapMode::new(MapUnit::Inch), 96);
        assert_eq!(convert_logic(IntPoint::new(25, -3), &mm, &hmm), IntPoint::new(2500, -300));
        assert_eq!(convert_logic(IntPoint::new(254, 0), &mm, &inch), IntPoint::new(10, 0));

        let shifted = metrics(MapMode::new(MapUnit::Mm).with_origin(IntPoint::new(5, 0)), 96);
        assert_eq!(convert_logic(IntPoint::new(0, 0), &shifted, &mm), IntPoint::new(5, 0));
    }
}
