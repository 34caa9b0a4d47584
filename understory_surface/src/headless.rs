// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory device for tests, benchmarks and font probing.
//!
//! [`HeadlessDevice`] does not rasterize anything. It reports a fixed size,
//! resolution and default font, and records every clip change so tests can
//! assert on exactly what a surface pushed to its device.

use understory_map_mode::{FontMetrics, IntSize};

use crate::backend::{BackendError, DeviceBackend};
use crate::region::Region;

/// Clip change recorded by [`HeadlessDevice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A clip region was installed.
    ApplyClip(Region),
    /// The clip was removed.
    ResetClip,
}

/// A device without pixels.
#[derive(Clone, Debug)]
pub struct HeadlessDevice {
    size: IntSize,
    dpi_x: i32,
    dpi_y: i32,
    font_metrics: Option<FontMetrics>,
    reject_clips: bool,
    lost: bool,
    clip: Option<Region>,
    events: Vec<DeviceEvent>,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new(IntSize::ZERO, 96, 96)
    }
}

impl HeadlessDevice {
    /// Default font reported unless overridden: 7 px average width, 16 px lines.
    pub const DEFAULT_FONT_METRICS: FontMetrics = FontMetrics {
        average_char_width: 7,
        text_height: 16,
    };

    /// Creates a device of the given size and resolution.
    pub fn new(size: IntSize, dpi_x: i32, dpi_y: i32) -> Self {
        Self {
            size,
            dpi_x,
            dpi_y,
            font_metrics: Some(Self::DEFAULT_FONT_METRICS),
            reject_clips: false,
            lost: false,
            clip: None,
            events: Vec::new(),
        }
    }

    /// Sets the default font metrics reported to the app-font probe.
    #[must_use]
    pub fn with_font_metrics(mut self, metrics: Option<FontMetrics>) -> Self {
        self.font_metrics = metrics;
        self
    }

    /// Makes subsequent [`DeviceBackend::apply_clip`] calls fail (or succeed again).
    pub fn set_reject_clips(&mut self, reject: bool) {
        self.reject_clips = reject;
    }

    /// Marks the device as lost; clip pushes then fail with [`BackendError::Lost`].
    pub fn set_lost(&mut self, lost: bool) {
        self.lost = lost;
    }

    /// Returns the clip currently installed, if any.
    pub fn current_clip(&self) -> Option<&Region> {
        self.clip.as_ref()
    }

    /// Returns the recorded clip changes, oldest first.
    pub fn events(&self) -> &[DeviceEvent] {
        &self.events
    }

    /// Clears the recorded events; the installed clip is kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl DeviceBackend for HeadlessDevice {
    fn device_pixel_dimensions(&self) -> IntSize {
        self.size
    }

    fn dpi(&self) -> (i32, i32) {
        (self.dpi_x, self.dpi_y)
    }

    fn apply_clip(&mut self, region: &Region) -> Result<(), BackendError> {
        if self.lost {
            return Err(BackendError::Lost);
        }
        if self.reject_clips {
            return Err(BackendError::ClipRejected {
                rects: region.rects().len(),
            });
        }
        self.clip = Some(region.clone());
        self.events.push(DeviceEvent::ApplyClip(region.clone()));
        Ok(())
    }

    fn reset_clip(&mut self) {
        self.clip = None;
        self.events.push(DeviceEvent::ResetClip);
    }

    fn default_font_metrics(&self) -> Option<FontMetrics> {
        self.font_metrics
    }
}
