// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Affine;
use understory_map_mode::{
    AppFont, IntPoint, IntRect, IntSize, MapMode, MappingMetrics, convert_logic,
};

use crate::app_font::app_font_with;
use crate::backend::DeviceBackend;
use crate::clip::ClipRegion;
use crate::geometry::SurfaceGeometry;
use crate::headless::HeadlessDevice;
use crate::mapper::DeviceMapper;
use crate::options::SurfaceOptions;
use crate::region::Region;
use crate::transform::{ViewTransform, compute_view_transform};

/// A drawing surface: map mode, geometry, clip and cached view transform.
///
/// A surface converts caller coordinates in the active [`MapMode`] into
/// device pixels and keeps the device clip in sync with its own clip region.
/// Drawing goes through [`Surface::prepare_draw`], which brings the transform
/// and clip up to date and hands out the device.
///
/// Without a device, all state changes still apply but drawing is a no-op.
///
/// A surface may carry a paired alpha-channel surface. Every map-mode,
/// geometry and clip change is replayed on it.
///
/// The cached transforms are refreshed through `&self`, so a `Surface` is not
/// `Sync`; callers serialize access to a surface themselves.
#[derive(Debug)]
pub struct Surface<D = HeadlessDevice> {
    device: Option<D>,
    geometry: SurfaceGeometry,
    /// Stored mode; relative modes are folded in and never stored.
    map_mode: MapMode,
    map_active: bool,
    metrics: MappingMetrics,
    clip: ClipRegion,
    transform: ViewTransform,
    alpha: Option<Box<Self>>,
}

/// Everything needed to issue one primitive: the device, the current view
/// transform and an integer mapper.
#[derive(Debug)]
pub struct DrawContext<'a, D> {
    device: &'a mut D,
    transform: Affine,
    mapper: DeviceMapper,
}

impl<D> DrawContext<'_, D> {
    /// Returns the device, with the surface's clip installed.
    pub fn device(&mut self) -> &mut D {
        self.device
    }

    /// Returns the logical-to-device transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Returns the integer mapper for the surface's current state.
    pub fn mapper(&self) -> DeviceMapper {
        self.mapper
    }

    /// Converts a logical point to device pixels.
    pub fn to_device(&self, pt: IntPoint) -> IntPoint {
        self.mapper.logical_to_device_pixel(pt)
    }
}

impl<D: DeviceBackend> Surface<D> {
    /// Creates a surface without a device.
    pub fn new(options: SurfaceOptions) -> Self {
        Self {
            device: None,
            geometry: SurfaceGeometry::from_options(&options),
            map_mode: MapMode::default(),
            map_active: false,
            metrics: MappingMetrics::default(),
            clip: ClipRegion::new(),
            transform: ViewTransform::new(),
            alpha: None,
        }
    }

    /// Creates a surface drawing to `device`, sized from the device.
    pub fn with_device(device: D) -> Self {
        Self::with_device_and_options(device, SurfaceOptions::default())
    }

    /// Creates a surface drawing to `device`.
    ///
    /// The size and DPI in `options` are replaced by the device's.
    pub fn with_device_and_options(device: D, options: SurfaceOptions) -> Self {
        let mut surface = Self::new(options);
        surface.attach_device(device);
        surface
    }

    /// Attaches `device`, returning the previous one.
    ///
    /// The surface takes the device's size and DPI, and the clip is pushed
    /// to the new device on the next realization.
    pub fn attach_device(&mut self, device: D) -> Option<D> {
        let size = device.device_pixel_dimensions();
        let (dpi_x, dpi_y) = device.dpi();
        let previous = self.take_device();
        self.device = Some(device);
        self.clip.device_changed();
        self.set_size_pixels(size);
        self.set_dpi(dpi_x, dpi_y);
        tracing::debug!(?size, dpi_x, dpi_y, "device attached");
        previous
    }

    /// Detaches and returns the device, removing any clip pushed to it.
    pub fn detach_device(&mut self) -> Option<D> {
        let device = self.take_device();
        self.clip.device_changed();
        device
    }

    fn take_device(&mut self) -> Option<D> {
        let mut device = self.device.take()?;
        if self.clip.is_backend_clip_set() {
            device.reset_clip();
        }
        Some(device)
    }

    /// Returns the device, if attached.
    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    /// Returns the device mutably, if attached.
    pub fn device_mut(&mut self) -> Option<&mut D> {
        self.device.as_mut()
    }

    /// Switches to `mode`.
    ///
    /// - The default mode turns mapping off.
    /// - A mode differing from the current one only in its origin just
    ///   replaces the offset.
    /// - A relative mode composes onto the current mapping (or onto plain
    ///   pixels when mapping is off) and is folded into the stored mode, so
    ///   [`Surface::map_mode`] never reports [`understory_map_mode::MapUnit::Relative`].
    ///
    /// The clip keeps its pixels; only the transform is invalidated.
    pub fn set_map_mode(&mut self, mode: MapMode) {
        if mode == self.map_mode {
            return;
        }
        if mode.is_default() {
            self.map_mode = mode;
        } else if mode.unit().is_relative() {
            let offset = self.resolve(&mode).offset();
            self.map_mode = self.map_mode.compose_relative(&mode, offset);
            // Live metrics must be exactly what a DPI change would recompute.
            let (dpi_x, dpi_y) = self.geometry.dpi();
            self.metrics = MappingMetrics::compute(&self.map_mode, dpi_x, dpi_y, || {
                self.app_font()
            });
        } else if self.map_active
            && mode.unit() == self.map_mode.unit()
            && mode.scale_x() == self.map_mode.scale_x()
            && mode.scale_y() == self.map_mode.scale_y()
        {
            self.metrics = self.metrics.with_offset(mode.origin());
            self.map_mode = mode;
        } else {
            self.metrics = self.resolve(&mode);
            self.map_mode = mode;
        }

        self.map_active = !self.map_mode.is_default();
        if !self.map_active {
            self.metrics = MappingMetrics::default();
        }
        self.transform.invalidate();
        self.clip.invalidate();
        tracing::debug!(%mode, stored = %self.map_mode, active = self.map_active, "map mode set");

        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.set_map_mode(mode);
        }
    }

    /// Resolves `mode` against the current state without changing it.
    fn resolve(&self, mode: &MapMode) -> MappingMetrics {
        let (dpi_x, dpi_y) = self.geometry.dpi();
        let previous = if self.map_active {
            self.metrics
        } else {
            MappingMetrics::pixel_base(dpi_x, dpi_y)
        };
        previous.compute_relative(mode, dpi_x, dpi_y, || self.app_font())
    }

    /// Returns the stored map mode.
    pub fn map_mode(&self) -> MapMode {
        self.map_mode
    }

    /// Returns `true` unless the surface is in the default (pixel) mode.
    pub fn is_map_active(&self) -> bool {
        self.map_active
    }

    /// Returns the resolved metrics of the stored map mode.
    pub fn metrics(&self) -> &MappingMetrics {
        &self.metrics
    }

    /// Returns the pixel-space geometry.
    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    /// Returns the clip state.
    pub fn clip(&self) -> &ClipRegion {
        &self.clip
    }

    /// Sets the size in device pixels. Returns `true` if it changed.
    pub fn set_size_pixels(&mut self, size: IntSize) -> bool {
        let changed = self.geometry.set_size_pixels(size);
        if changed {
            self.geometry_changed();
        }
        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.set_size_pixels(size);
        }
        changed
    }

    /// Sets the pixel offset of the drawing origin. Returns `true` if it changed.
    pub fn set_offset_pixels(&mut self, offset: IntPoint) -> bool {
        let changed = self.geometry.set_offset_pixels(offset);
        if changed {
            self.geometry_changed();
        }
        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.set_offset_pixels(offset);
        }
        changed
    }

    /// Sets the resolution, re-resolving the map mode. Returns `true` if it changed.
    pub fn set_dpi(&mut self, dpi_x: i32, dpi_y: i32) -> bool {
        let changed = self.geometry.set_dpi(dpi_x, dpi_y);
        if changed {
            if self.map_active {
                self.metrics = MappingMetrics::compute(&self.map_mode, dpi_x, dpi_y, || {
                    self.app_font()
                });
            }
            self.geometry_changed();
        }
        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.set_dpi(dpi_x, dpi_y);
        }
        changed
    }

    /// Sets the HiDPI scale in percent (at least 100). Returns `true` if it changed.
    pub fn set_dpi_scale_percent(&mut self, percent: i32) -> bool {
        let changed = self.geometry.set_dpi_scale_percent(percent);
        if changed {
            self.geometry_changed();
        }
        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.set_dpi_scale_percent(percent);
        }
        changed
    }

    fn geometry_changed(&mut self) {
        self.transform.invalidate();
        self.clip.invalidate();
    }

    fn build_transform(&self) -> Affine {
        compute_view_transform(self.map_active.then_some(&self.metrics), &self.geometry)
    }

    /// Returns the logical-to-device transform, rebuilding it if stale.
    pub fn view_transform(&self) -> Affine {
        self.transform.forward(|| self.build_transform())
    }

    /// Returns the device-to-logical transform, rebuilding it if stale.
    pub fn inverse_view_transform(&self) -> Affine {
        self.transform.inverse(|| self.build_transform())
    }

    /// Returns the transform `mode` would have on this surface.
    ///
    /// Neither the surface state nor its cached transforms are touched.
    pub fn view_transform_for(&self, mode: &MapMode) -> Affine {
        if mode.is_default() {
            return compute_view_transform(None, &self.geometry);
        }
        let metrics = self.resolve(mode);
        compute_view_transform(Some(&metrics), &self.geometry)
    }

    /// Returns an integer mapper for the current state.
    pub fn mapper(&self) -> DeviceMapper {
        let (dpi_x, dpi_y) = self.geometry.dpi();
        DeviceMapper::new(
            self.metrics,
            dpi_x,
            dpi_y,
            self.geometry.offset(),
            self.map_active,
        )
    }

    /// Converts a logical point to device pixels.
    pub fn logical_to_device_pixel(&self, pt: IntPoint) -> IntPoint {
        self.mapper().logical_to_device_pixel(pt)
    }

    /// Converts a device pixel to a logical point.
    pub fn device_pixel_to_logical(&self, pt: IntPoint) -> IntPoint {
        self.mapper().device_pixel_to_logical(pt)
    }

    /// Converts a logical rectangle to device pixels.
    pub fn logical_to_device_rect(&self, rect: &IntRect) -> IntRect {
        self.mapper().logical_to_device_rect(rect)
    }

    /// Converts a device-pixel rectangle to logical units.
    pub fn device_rect_to_logical(&self, rect: &IntRect) -> IntRect {
        self.mapper().device_rect_to_logical(rect)
    }

    /// Converts a logical size to pixels.
    pub fn logical_to_device_size(&self, size: IntSize) -> IntSize {
        self.mapper().logical_to_device_size(size)
    }

    /// Converts a pixel size to logical units.
    pub fn device_size_to_logical(&self, size: IntSize) -> IntSize {
        self.mapper().device_size_to_logical(size)
    }

    /// Converts `pt` from the units of `from` to the units of `to`.
    ///
    /// Relative modes are resolved against the surface's current mapping.
    pub fn logic_to_logic(&self, pt: IntPoint, from: &MapMode, to: &MapMode) -> IntPoint {
        if from == to {
            return pt;
        }
        convert_logic(pt, &self.resolve(from), &self.resolve(to))
    }

    /// Replaces the clip with `region` (logical units); `None` turns clipping off.
    pub fn set_clip_region(&mut self, region: Option<&Region>) {
        let pixels = region.map(|region| self.mapper().logical_to_pixel_region(region));
        self.clip.set(pixels);
        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.set_clip_region(region);
        }
    }

    /// Replaces the clip with a single logical rectangle.
    pub fn set_clip_rect(&mut self, rect: IntRect) {
        self.set_clip_region(Some(&Region::from_rect(rect.normalized())));
    }

    /// Restricts the clip to a logical rectangle, activating clipping if needed.
    pub fn intersect_clip_rect(&mut self, rect: IntRect) {
        self.intersect_clip_region(&Region::from_rect(rect.normalized()));
    }

    /// Restricts the clip to a logical region, activating clipping if needed.
    pub fn intersect_clip_region(&mut self, region: &Region) {
        let pixels = self.mapper().logical_to_pixel_region(region);
        self.clip.intersect(&pixels);
        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.intersect_clip_region(region);
        }
    }

    /// Moves the clip by a logical distance; no-op while clipping is off.
    pub fn move_clip_region(&mut self, dx: i64, dy: i64) {
        let mapper = self.mapper();
        self.clip.translate(
            mapper.logical_width_to_pixel(dx),
            mapper.logical_height_to_pixel(dy),
        );
        if let Some(alpha) = self.alpha.as_deref_mut() {
            alpha.move_clip_region(dx, dy);
        }
    }

    /// Returns the clip in logical units, or `None` while clipping is off.
    pub fn clip_region(&self) -> Option<Region> {
        let mapper = self.mapper();
        self.clip
            .region()
            .map(|region| mapper.pixel_region_to_logical(region))
    }

    /// Returns `true` if clipping is active.
    pub fn is_clip_region_active(&self) -> bool {
        self.clip.is_active()
    }

    /// Brings the device clip up to date.
    pub fn realize_clip(&mut self) {
        self.clip
            .realize(self.geometry.device_bounds(), self.device.as_mut());
    }

    /// Realizes the clip and returns it in device pixels.
    pub fn realized_clip(&mut self) -> Option<&Region> {
        self.realize_clip();
        self.clip.realized()
    }

    /// Returns `true` if the last realized clip was empty.
    pub fn is_output_clipped(&self) -> bool {
        self.clip.is_output_clipped()
    }

    /// Pairs an alpha-channel surface drawing to `device`, replacing any
    /// previous one.
    ///
    /// The new surface starts as a copy of this surface's geometry, map mode
    /// and clip, and follows every later change.
    pub fn enable_alpha_channel(&mut self, device: D) {
        let mut alpha = Self::with_device(device);
        alpha.geometry = self.geometry;
        alpha.map_mode = self.map_mode;
        alpha.map_active = self.map_active;
        alpha.metrics = self.metrics;
        alpha.clip.set(self.clip.region().cloned());
        alpha.transform.invalidate();
        self.alpha = Some(Box::new(alpha));
        tracing::debug!("alpha channel enabled");
    }

    /// Returns the paired alpha-channel surface.
    pub fn alpha_channel(&self) -> Option<&Self> {
        self.alpha.as_deref()
    }

    /// Returns the paired alpha-channel surface mutably.
    ///
    /// Changes made through it are not mirrored back.
    pub fn alpha_channel_mut(&mut self) -> Option<&mut Self> {
        self.alpha.as_deref_mut()
    }

    /// Removes and returns the paired alpha-channel surface.
    pub fn disable_alpha_channel(&mut self) -> Option<Self> {
        self.alpha.take().map(|alpha| *alpha)
    }

    /// Prepares one draw call.
    ///
    /// Returns `None`, and nothing should be drawn, when no device is
    /// attached or the clip leaves nothing visible. Otherwise the view
    /// transform is current and the clip is installed on the device.
    pub fn prepare_draw(&mut self) -> Option<DrawContext<'_, D>> {
        if self.device.is_none() {
            return None;
        }
        self.realize_clip();
        if self.clip.is_output_clipped() {
            return None;
        }
        let transform = self.view_transform();
        let mapper = self.mapper();
        let device = self.device.as_mut()?;
        Some(DrawContext {
            device,
            transform,
            mapper,
        })
    }

    /// Returns the process-wide app-font metric.
    ///
    /// The first call in the process measures this surface's device default
    /// font (or a headless stand-in); later calls return the cached value.
    pub fn app_font(&self) -> AppFont {
        app_font_with(|| {
            self.device
                .as_ref()
                .and_then(|device| device.default_font_metrics())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Surface;
    use crate::headless::HeadlessDevice;
    use crate::options::SurfaceOptions;
    use understory_map_mode::{IntPoint, IntSize, MapMode, MapUnit, Rational};

    fn surface() -> Surface {
        Surface::with_device(HeadlessDevice::new(IntSize::new(640, 480), 96, 96))
    }

    #[test]
    fn device_sets_size_and_dpi() {
        let s = Surface::with_device_and_options(
            HeadlessDevice::new(IntSize::new(50, 200), 120, 72),
            SurfaceOptions::default().with_offset(IntPoint::new(3, 4)),
        );
        assert_eq!(s.geometry().size(), IntSize::new(50, 200));
        assert_eq!(s.geometry().dpi(), (120, 72));
        assert_eq!(s.geometry().offset(), IntPoint::new(3, 4));
    }

    #[test]
    fn origin_only_change_keeps_scale() {
        let mut s = surface();
        s.set_map_mode(MapMode::new(MapUnit::Point));
        let scale = s.metrics().scale_x();
        s.set_map_mode(MapMode::new(MapUnit::Point).with_origin(IntPoint::new(9, 9)));
        assert_eq!(s.metrics().scale_x(), scale);
        assert_eq!(s.metrics().offset(), IntPoint::new(9, 9));
    }

    #[test]
    fn default_mode_deactivates_mapping() {
        let mut s = surface();
        s.set_map_mode(MapMode::new(MapUnit::Mm));
        assert!(s.is_map_active());
        s.set_map_mode(MapMode::default());
        assert!(!s.is_map_active());
        assert_eq!(s.metrics().offset(), IntPoint::ZERO);
        assert_eq!(s.metrics().scale_x(), Rational::ONE);
    }

    #[test]
    fn relative_mode_is_folded_into_stored_mode() {
        let mut s = surface();
        s.set_map_mode(MapMode::new(MapUnit::Point).with_origin(IntPoint::new(10, 0)));
        let zoom = MapMode::relative(IntPoint::new(1, 2), Rational::new(1, 2), Rational::new(1, 2))
            .unwrap();
        s.set_map_mode(zoom);
        let stored = s.map_mode();
        assert_eq!(stored.unit(), MapUnit::Point);
        assert_eq!(stored.scale_x(), Rational::new(1, 2));
        assert_eq!(stored.origin(), IntPoint::new(21, 2));
        assert_eq!(s.metrics().offset(), IntPoint::new(21, 2));
    }

    #[test]
    fn relative_from_inactive_uses_pixels() {
        let mut s = surface();
        let zoom = MapMode::relative(IntPoint::ZERO, Rational::new(2, 1), Rational::new(2, 1))
            .unwrap();
        s.set_map_mode(zoom);
        assert_eq!(s.map_mode().unit(), MapUnit::Pixel);
        assert_eq!(
            s.logical_to_device_pixel(IntPoint::new(5, 6)),
            IntPoint::new(10, 12)
        );
    }

    #[test]
    fn dpi_change_re_resolves_metrics() {
        let mut s = surface();
        s.set_map_mode(MapMode::new(MapUnit::Inch));
        assert_eq!(s.logical_to_device_pixel(IntPoint::new(1, 1)), IntPoint::new(96, 96));
        assert!(s.set_dpi(192, 192));
        assert_eq!(s.logical_to_device_pixel(IntPoint::new(1, 1)), IntPoint::new(192, 192));
        assert!(!s.set_dpi(192, 192));
    }
}
