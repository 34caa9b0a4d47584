// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip state and its lazy realization against device bounds.

use understory_map_mode::IntRect;

use crate::backend::DeviceBackend;
use crate::region::Region;

/// The active clip of a surface, in surface pixels, and its realized form.
///
/// Mutations only record the new region and mark the clip dirty.
/// [`ClipRegion::realize`] later intersects it with the device bounds and
/// pushes the result to the device. The realized region is always rebuilt
/// from the stored region, never patched.
#[derive(Clone, Debug, Default)]
pub struct ClipRegion {
    /// `Some` while clipping is active.
    region: Option<Region>,
    dirty: bool,
    realized: Region,
    output_clipped: bool,
    /// The device currently holds a clip pushed by us.
    backend_clip_set: bool,
}

impl ClipRegion {
    /// Creates an inactive clip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if clipping is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.region.is_some()
    }

    /// Returns `true` if the realized clip is out of date.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the active clip in surface pixels.
    #[inline]
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Returns the clip as of the last realization, in device pixels.
    ///
    /// `None` when clipping is inactive.
    pub fn realized(&self) -> Option<&Region> {
        self.region.as_ref().map(|_| &self.realized)
    }

    /// Returns `true` if the last realization left nothing to draw into.
    #[inline]
    pub fn is_output_clipped(&self) -> bool {
        self.output_clipped
    }

    /// Returns `true` if the device holds a clip pushed by this state.
    #[inline]
    pub fn is_backend_clip_set(&self) -> bool {
        self.backend_clip_set
    }

    /// Replaces the clip; `None` turns clipping off.
    pub fn set(&mut self, region: Option<Region>) {
        self.region = region;
        self.dirty = true;
    }

    /// Restricts the clip to `region`.
    ///
    /// On an inactive clip this activates clipping with `region` itself.
    pub fn intersect(&mut self, region: &Region) {
        match &mut self.region {
            Some(current) => current.intersect(region),
            None => self.region = Some(region.clone()),
        }
        self.dirty = true;
    }

    /// Moves the active clip by `(dx, dy)` pixels; no-op while inactive.
    pub fn translate(&mut self, dx: i64, dy: i64) {
        if let Some(region) = &mut self.region {
            region.translate(dx, dy);
            self.dirty = true;
        }
    }

    /// Forces the next [`ClipRegion::realize`] to recompute.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Forgets any clip pushed to the device, for a device swap.
    pub fn device_changed(&mut self) {
        self.backend_clip_set = false;
        self.dirty = true;
    }

    /// Brings the realized clip up to date and pushes it to `device`.
    ///
    /// The stored region is moved by the origin of `bounds` and intersected
    /// with `bounds`. An empty result sets [`ClipRegion::is_output_clipped`]
    /// and pushes nothing. A rejected push is logged and leaves the device
    /// state as it was. Turning clipping off resets the device clip if one
    /// was pushed.
    pub fn realize<D: DeviceBackend + ?Sized>(&mut self, bounds: IntRect, device: Option<&mut D>) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let Some(region) = &self.region else {
            self.realized = Region::new();
            self.output_clipped = false;
            if self.backend_clip_set {
                if let Some(device) = device {
                    device.reset_clip();
                }
                self.backend_clip_set = false;
                tracing::debug!("clip reset");
            }
            return;
        };

        let mut realized = region.clone();
        realized.translate(bounds.x0, bounds.y0);
        realized.intersect_rect(&bounds);
        self.realized = realized;
        self.output_clipped = self.realized.is_empty();
        if self.output_clipped {
            tracing::debug!(?bounds, "clip realized empty, output clipped");
            return;
        }

        let Some(device) = device else {
            return;
        };
        match device.apply_clip(&self.realized) {
            Ok(()) => {
                self.backend_clip_set = true;
                tracing::debug!(
                    rects = self.realized.rects().len(),
                    bounds = ?self.realized.bounds(),
                    "clip realized"
                );
            }
            Err(err) => {
                tracing::warn!(%err, "device rejected clip region, keeping previous clip");
            }
        }
    }
}
