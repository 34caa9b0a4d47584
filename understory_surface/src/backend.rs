// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_map_mode::{FontMetrics, IntSize};

use crate::region::Region;

/// Errors reported by a [`DeviceBackend`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The device could not install the requested clip.
    #[error("device rejected a clip of {rects} rectangles")]
    ClipRejected {
        /// Number of rectangles in the rejected region.
        rects: usize,
    },
    /// The device is gone (window closed, context lost).
    #[error("device is no longer available")]
    Lost,
}

/// The narrow capability a surface needs from a rendering device.
///
/// Rasterization itself is out of scope: the surface only reads the pixel
/// dimensions and resolution, and installs or removes a clip region in
/// device pixels. Primitives are issued by the caller through
/// [`crate::DrawContext::device`].
pub trait DeviceBackend {
    /// Size of the drawable area in device pixels.
    fn device_pixel_dimensions(&self) -> IntSize;

    /// Resolution as `(dpi_x, dpi_y)`.
    fn dpi(&self) -> (i32, i32);

    /// Restricts subsequent drawing to `region`, given in device pixels.
    ///
    /// On error the device must keep whatever clip it had before.
    fn apply_clip(&mut self, region: &Region) -> Result<(), BackendError>;

    /// Removes any clip installed by [`DeviceBackend::apply_clip`].
    fn reset_clip(&mut self);

    /// Metrics of the device's default UI font, if it has one.
    ///
    /// Used once per process to size the app-font unit.
    fn default_font_metrics(&self) -> Option<FontMetrics> {
        None
    }
}
