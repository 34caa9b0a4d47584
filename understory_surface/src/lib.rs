// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_surface --heading-base-level=0

//! Understory Surface: drawing-surface state between callers and a device.
//!
//! A [`Surface`] sits between code that draws in logical units and a device
//! that rasterizes in pixels. It owns:
//!
//! - **Mapping**: the active [`MapMode`](understory_map_mode::MapMode) and its
//!   resolved [`MappingMetrics`](understory_map_mode::MappingMetrics), with
//!   integer conversion through a [`DeviceMapper`].
//! - **Geometry** ([`SurfaceGeometry`]): pixel size, origin offset, DPI and
//!   HiDPI scale.
//! - **Clipping** ([`ClipRegion`], [`Region`]): the active clip in pixels,
//!   realized lazily against the device bounds and pushed to the device.
//! - **View transform** ([`ViewTransform`]): cached logical-to-device and
//!   device-to-logical [`kurbo::Affine`]s, rebuilt only when an input changes.
//!
//! Rasterization is out of scope. Devices implement the narrow
//! [`DeviceBackend`] trait (dimensions, DPI, clip install/reset) and callers
//! issue primitives through the [`DrawContext`] returned by
//! [`Surface::prepare_draw`]. [`HeadlessDevice`] is an in-memory device for
//! tests and tooling.
//!
//! ## Example
//!
//! ```rust
//! use understory_map_mode::{IntPoint, IntRect, IntSize, MapMode, MapUnit};
//! use understory_surface::{HeadlessDevice, Surface};
//!
//! let mut surface = Surface::with_device(HeadlessDevice::new(IntSize::new(50, 200), 96, 96));
//!
//! // Draw in points: 72 points are 96 pixels at 96 DPI.
//! surface.set_map_mode(MapMode::new(MapUnit::Point));
//! assert_eq!(
//!     surface.logical_to_device_pixel(IntPoint::new(72, 72)),
//!     IntPoint::new(96, 96)
//! );
//!
//! // Clip to 75x75 points; the device only sees the part inside its bounds.
//! surface.set_clip_rect(IntRect::new(0, 0, 75, 75));
//! let mut ctx = surface.prepare_draw().expect("device attached and clip visible");
//! let clip = ctx.device().current_clip().expect("clip pushed");
//! assert_eq!(clip.bounds(), IntRect::new(0, 0, 50, 100));
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing` and installs no subscriber. Rejected clip
//! pushes and degenerate scales are reported at `warn`, map-mode switches and
//! clip realization at `debug`, transform rebuilds at `trace`.

mod app_font;
mod backend;
mod clip;
mod geometry;
mod headless;
mod mapper;
mod options;
mod region;
mod surface;
mod transform;

pub use backend::{BackendError, DeviceBackend};
pub use clip::ClipRegion;
pub use geometry::SurfaceGeometry;
pub use headless::{DeviceEvent, HeadlessDevice};
pub use mapper::DeviceMapper;
pub use options::SurfaceOptions;
pub use region::Region;
pub use surface::{DrawContext, Surface};
pub use transform::{ViewTransform, compute_view_transform};
