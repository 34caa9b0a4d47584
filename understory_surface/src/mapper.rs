// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_map_mode::{IntPoint, IntRect, IntSize, MappingMetrics};

use crate::region::Region;

/// Integer logical/device conversion for one mapping state.
///
/// A `DeviceMapper` is a `Copy` snapshot of a surface's metrics, resolution
/// and pixel offset. It stays valid until the surface's map mode or geometry
/// changes.
///
/// "Device pixels" include the surface's pixel offset within its parent;
/// "pixels" (the region helpers, widths and heights) do not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceMapper {
    metrics: MappingMetrics,
    dpi_x: i32,
    dpi_y: i32,
    offset: IntPoint,
    map_active: bool,
}

impl DeviceMapper {
    /// Creates a mapper. With `map_active` false, logical units are pixels.
    pub fn new(
        metrics: MappingMetrics,
        dpi_x: i32,
        dpi_y: i32,
        offset: IntPoint,
        map_active: bool,
    ) -> Self {
        Self {
            metrics,
            dpi_x,
            dpi_y,
            offset,
            map_active,
        }
    }

    /// Returns `true` if logical units differ from pixels.
    #[inline]
    pub fn is_map_active(&self) -> bool {
        self.map_active
    }

    /// Converts a logical point to surface pixels, without the device offset.
    pub fn logical_to_pixel(&self, pt: IntPoint) -> IntPoint {
        if self.map_active {
            self.metrics.logic_to_pixel(pt, self.dpi_x, self.dpi_y)
        } else {
            pt
        }
    }

    /// Converts surface pixels (without the device offset) to a logical point.
    pub fn pixel_to_logical(&self, pt: IntPoint) -> IntPoint {
        if self.map_active {
            self.metrics.pixel_to_logic(pt, self.dpi_x, self.dpi_y)
        } else {
            pt
        }
    }

    /// Converts a logical point to device pixels.
    pub fn logical_to_device_pixel(&self, pt: IntPoint) -> IntPoint {
        self.logical_to_pixel(pt)
            .translate(self.offset.x, self.offset.y)
    }

    /// Converts a device pixel to a logical point.
    pub fn device_pixel_to_logical(&self, pt: IntPoint) -> IntPoint {
        self.pixel_to_logical(pt.translate(
            self.offset.x.saturating_neg(),
            self.offset.y.saturating_neg(),
        ))
    }

    /// Converts a logical rectangle to device pixels.
    pub fn logical_to_device_rect(&self, rect: &IntRect) -> IntRect {
        self.logical_to_pixel_rect(rect)
            .translate(self.offset.x, self.offset.y)
    }

    /// Converts a device-pixel rectangle to logical units.
    pub fn device_rect_to_logical(&self, rect: &IntRect) -> IntRect {
        self.pixel_rect_to_logical(&rect.translate(
            self.offset.x.saturating_neg(),
            self.offset.y.saturating_neg(),
        ))
    }

    /// Converts a logical size to pixels.
    pub fn logical_to_device_size(&self, size: IntSize) -> IntSize {
        if self.map_active {
            self.metrics.logic_size_to_pixel(size, self.dpi_x, self.dpi_y)
        } else {
            size
        }
    }

    /// Converts a pixel size to logical units.
    pub fn device_size_to_logical(&self, size: IntSize) -> IntSize {
        if self.map_active {
            self.metrics.pixel_size_to_logic(size, self.dpi_x, self.dpi_y)
        } else {
            size
        }
    }

    /// Converts a logical horizontal distance to pixels, ignoring the offset.
    pub fn logical_width_to_pixel(&self, width: i64) -> i64 {
        if self.map_active {
            self.metrics.logic_width_to_pixel(width, self.dpi_x)
        } else {
            width
        }
    }

    /// Converts a logical vertical distance to pixels, ignoring the offset.
    pub fn logical_height_to_pixel(&self, height: i64) -> i64 {
        if self.map_active {
            self.metrics.logic_height_to_pixel(height, self.dpi_y)
        } else {
            height
        }
    }

    /// Converts a logical region to surface pixels.
    pub fn logical_to_pixel_region(&self, region: &Region) -> Region {
        if self.map_active {
            region.map_rects(|rect| self.logical_to_pixel_rect(rect))
        } else {
            region.clone()
        }
    }

    /// Converts a surface-pixel region to logical units.
    pub fn pixel_region_to_logical(&self, region: &Region) -> Region {
        if self.map_active {
            region.map_rects(|rect| self.pixel_rect_to_logical(rect))
        } else {
            region.clone()
        }
    }

    fn logical_to_pixel_rect(&self, rect: &IntRect) -> IntRect {
        if self.map_active {
            self.metrics
                .logic_rect_to_pixel(rect, self.dpi_x, self.dpi_y)
        } else {
            *rect
        }
    }

    fn pixel_rect_to_logical(&self, rect: &IntRect) -> IntRect {
        if self.map_active {
            self.metrics
                .pixel_rect_to_logic(rect, self.dpi_x, self.dpi_y)
        } else {
            *rect
        }
    }
}
