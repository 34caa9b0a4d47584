// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_map_mode::{IntPoint, IntSize};

/// Initial configuration of a [`crate::Surface`].
///
/// Size and DPI are overridden by the device's own values when a device is
/// attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Size in device pixels.
    pub size: IntSize,
    /// Pixel offset of the drawing origin within the parent device.
    pub offset: IntPoint,
    /// Horizontal resolution in dots per inch.
    pub dpi_x: i32,
    /// Vertical resolution in dots per inch.
    pub dpi_y: i32,
    /// HiDPI scale in percent; values below 100 are raised to 100.
    pub dpi_scale_percent: i32,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            size: IntSize::ZERO,
            offset: IntPoint::ZERO,
            dpi_x: 96,
            dpi_y: 96,
            dpi_scale_percent: 100,
        }
    }
}

impl SurfaceOptions {
    /// Sets the size in device pixels.
    #[must_use]
    pub fn with_size(mut self, size: IntSize) -> Self {
        self.size = size;
        self
    }

    /// Sets the pixel offset of the drawing origin.
    #[must_use]
    pub fn with_offset(mut self, offset: IntPoint) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the resolution.
    #[must_use]
    pub fn with_dpi(mut self, dpi_x: i32, dpi_y: i32) -> Self {
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
        self
    }

    /// Sets the HiDPI scale in percent.
    #[must_use]
    pub fn with_dpi_scale_percent(mut self, percent: i32) -> Self {
        self.dpi_scale_percent = percent;
        self
    }
}
