// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cached logical-to-device affine transforms.

use core::cell::Cell;

use kurbo::Affine;
use understory_map_mode::MappingMetrics;

use crate::geometry::SurfaceGeometry;

bitflags::bitflags! {
    /// Which cached transforms need rebuilding.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct TransformDirty: u8 {
        /// The forward (logical to device) transform.
        const FORWARD = 0b0000_0001;
        /// The inverse (device to logical) transform.
        const INVERSE = 0b0000_0010;
    }
}

/// Builds the logical-to-device transform.
///
/// With `metrics`, the scale is `dpi * num / denom` per axis and the
/// translation is `offset * scale + pixel_offset`. Without (mapping
/// inactive), the transform only translates by the pixel offset.
pub fn compute_view_transform(
    metrics: Option<&MappingMetrics>,
    geometry: &SurfaceGeometry,
) -> Affine {
    let origin = geometry.offset().to_kurbo().to_vec2();
    let Some(metrics) = metrics else {
        return Affine::translate(origin);
    };
    let (dpi_x, dpi_y) = geometry.dpi();
    let scale_x = f64::from(dpi_x) * metrics.scale_x().to_f64();
    let scale_y = f64::from(dpi_y) * metrics.scale_y().to_f64();
    let offset = metrics.offset();
    Affine::new([
        scale_x,
        0.0,
        0.0,
        scale_y,
        offset.x as f64 * scale_x + origin.x,
        offset.y as f64 * scale_y + origin.y,
    ])
}

/// Lazily rebuilt forward and inverse view transforms.
///
/// The two matrices carry independent dirty bits: reading the forward
/// transform never pays for the inverse. Caches live in [`Cell`]s so they can
/// be refreshed through `&self`, which makes the owner `!Sync`.
#[derive(Debug)]
pub struct ViewTransform {
    forward: Cell<Affine>,
    inverse: Cell<Affine>,
    dirty: Cell<TransformDirty>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ViewTransform {
    fn clone(&self) -> Self {
        Self {
            forward: Cell::new(self.forward.get()),
            inverse: Cell::new(self.inverse.get()),
            dirty: Cell::new(self.dirty.get()),
        }
    }
}

impl ViewTransform {
    /// Creates a cache with both transforms dirty.
    pub fn new() -> Self {
        Self {
            forward: Cell::new(Affine::IDENTITY),
            inverse: Cell::new(Affine::IDENTITY),
            dirty: Cell::new(TransformDirty::all()),
        }
    }

    /// Marks both transforms for rebuilding.
    pub fn invalidate(&mut self) {
        self.dirty.set(TransformDirty::all());
    }

    /// Returns `true` if the forward transform is cached and current.
    pub fn is_current(&self) -> bool {
        !self.dirty.get().contains(TransformDirty::FORWARD)
    }

    /// Returns the forward transform, rebuilding it with `build` if dirty.
    pub fn forward(&self, build: impl FnOnce() -> Affine) -> Affine {
        let mut dirty = self.dirty.get();
        if dirty.contains(TransformDirty::FORWARD) {
            let affine = build();
            tracing::trace!(coeffs = ?affine.as_coeffs(), "view transform rebuilt");
            self.forward.set(affine);
            dirty.remove(TransformDirty::FORWARD);
            self.dirty.set(dirty);
        }
        self.forward.get()
    }

    /// Returns the inverse transform, rebuilding it (and the forward
    /// transform, if needed) when dirty.
    ///
    /// A singular forward transform (a zero scale) has no inverse; the
    /// identity is cached instead and a warning is logged.
    pub fn inverse(&self, build: impl FnOnce() -> Affine) -> Affine {
        if self.dirty.get().contains(TransformDirty::INVERSE) {
            let forward = self.forward(build);
            let det = forward.determinant();
            let inverse = if det == 0.0 || !det.is_finite() {
                tracing::warn!(
                    coeffs = ?forward.as_coeffs(),
                    "view transform is singular, using identity inverse"
                );
                Affine::IDENTITY
            } else {
                forward.inverse()
            };
            self.inverse.set(inverse);
            let mut dirty = self.dirty.get();
            dirty.remove(TransformDirty::INVERSE);
            self.dirty.set(dirty);
        }
        self.inverse.get()
    }
}
