// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_map_mode::{IntPoint, IntRect, IntSize};

use crate::options::SurfaceOptions;

/// Pixel-space state of a surface: size, origin offset, DPI and HiDPI scale.
///
/// Setters report whether the stored value changed so that the owner can
/// invalidate what depends on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceGeometry {
    size: IntSize,
    offset: IntPoint,
    dpi_x: i32,
    dpi_y: i32,
    dpi_scale_percent: i32,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self::from_options(&SurfaceOptions::default())
    }
}

impl SurfaceGeometry {
    /// Creates geometry from surface options.
    pub fn from_options(options: &SurfaceOptions) -> Self {
        Self {
            size: options.size,
            offset: options.offset,
            dpi_x: options.dpi_x,
            dpi_y: options.dpi_y,
            dpi_scale_percent: options.dpi_scale_percent.max(100),
        }
    }

    /// Returns the size in device pixels.
    #[inline]
    pub fn size(&self) -> IntSize {
        self.size
    }

    /// Returns the pixel offset of the drawing origin within the parent.
    #[inline]
    pub fn offset(&self) -> IntPoint {
        self.offset
    }

    /// Returns `(dpi_x, dpi_y)`.
    #[inline]
    pub fn dpi(&self) -> (i32, i32) {
        (self.dpi_x, self.dpi_y)
    }

    /// Returns the HiDPI scale in percent (at least 100).
    #[inline]
    pub fn dpi_scale_percent(&self) -> i32 {
        self.dpi_scale_percent
    }

    /// Returns the device-pixel rectangle the surface draws into:
    /// `[x_off, x_off + w) × [y_off, y_off + h)`.
    pub fn device_bounds(&self) -> IntRect {
        IntRect::from_origin_size(self.offset, self.size)
    }

    /// Sets the size in pixels. Returns `true` if it changed.
    pub fn set_size_pixels(&mut self, size: IntSize) -> bool {
        replace_if_changed(&mut self.size, size)
    }

    /// Sets the origin offset in pixels. Returns `true` if it changed.
    pub fn set_offset_pixels(&mut self, offset: IntPoint) -> bool {
        replace_if_changed(&mut self.offset, offset)
    }

    /// Sets the resolution. Returns `true` if it changed.
    pub fn set_dpi(&mut self, dpi_x: i32, dpi_y: i32) -> bool {
        let changed = (self.dpi_x, self.dpi_y) != (dpi_x, dpi_y);
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
        changed
    }

    /// Sets the HiDPI scale, raising values below 100 to 100.
    /// Returns `true` if the stored value changed.
    pub fn set_dpi_scale_percent(&mut self, percent: i32) -> bool {
        replace_if_changed(&mut self.dpi_scale_percent, percent.max(100))
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::SurfaceGeometry;
    use crate::options::SurfaceOptions;
    use understory_map_mode::{IntPoint, IntRect, IntSize};

    #[test]
    fn setters_report_changes() {
        let mut geometry = SurfaceGeometry::default();
        assert_eq!(geometry.dpi(), (96, 96));
        assert!(!geometry.set_dpi(96, 96));
        assert!(geometry.set_dpi(144, 96));
        assert!(geometry.set_size_pixels(IntSize::new(50, 200)));
        assert!(!geometry.set_size_pixels(IntSize::new(50, 200)));
        assert!(geometry.set_offset_pixels(IntPoint::new(10, 20)));
        assert_eq!(geometry.device_bounds(), IntRect::new(10, 20, 60, 220));
    }

    #[test]
    fn options_seed_the_geometry() {
        let geometry = SurfaceGeometry::from_options(
            &SurfaceOptions::default()
                .with_size(IntSize::new(30, 40))
                .with_dpi(120, 144)
                .with_dpi_scale_percent(50),
        );
        assert_eq!(geometry.size(), IntSize::new(30, 40));
        assert_eq!(geometry.dpi(), (120, 144));
        assert_eq!(geometry.dpi_scale_percent(), 100);

        let hidpi = SurfaceGeometry::from_options(
            &SurfaceOptions::default().with_dpi_scale_percent(200),
        );
        assert_eq!(hidpi.dpi_scale_percent(), 200);
    }

    #[test]
    fn dpi_scale_is_at_least_one_hundred_percent() {
        let mut geometry = SurfaceGeometry::default();
        assert!(!geometry.set_dpi_scale_percent(50));
        assert_eq!(geometry.dpi_scale_percent(), 100);
        assert!(geometry.set_dpi_scale_percent(150));
        assert_eq!(geometry.dpi_scale_percent(), 150);
    }
}
