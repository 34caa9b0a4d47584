// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_map_mode --heading-base-level=0

//! Understory Map Mode: logical unit systems and integer logical/pixel mapping.
//!
//! This crate holds the numeric core of a drawing surface's coordinate
//! mapping. Callers express drawing coordinates in a logical unit
//! (millimeters, inches, points, twips, dialog font units, raw pixels, or a
//! mapping relative to the previous one) and the crate converts them to
//! integer device pixels without losing precision across repeated
//! conversions.
//!
//! - **Fractions** ([`Rational`], [`combine`], [`try_combine`]): reduced
//!   rationals and an overflow-guarded product that degrades precision
//!   gracefully instead of overflowing.
//! - **Units** ([`MapUnit`], [`UnitScale`]): the intrinsic size of each unit
//!   in inches.
//! - **Map modes** ([`MapMode`]): an immutable unit + origin + scale value.
//! - **Metrics** ([`MappingMetrics`]): the resolved scale and offset for a
//!   map mode at a given DPI, with integer conversions in both directions.
//! - **App font** ([`AppFont`], [`FontMetrics`]): the dialog font unit derived
//!   from the default UI font.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_map_mode::{AppFont, IntPoint, MapMode, MapUnit, MappingMetrics, Rational};
//!
//! // Points at 96 DPI: 72 points are one inch, i.e. 96 pixels.
//! let mode = MapMode::new(MapUnit::Point);
//! let metrics = MappingMetrics::compute(&mode, 96, 96, AppFont::default);
//!
//! assert_eq!(metrics.device_scale_x(96), Rational::new(4, 3));
//! assert_eq!(
//!     metrics.logic_to_pixel(IntPoint::new(72, 72), 96, 96),
//!     IntPoint::new(96, 96)
//! );
//!
//! // Zoom out by half, relative to the mapping above.
//! let zoom = MapMode::relative(IntPoint::ZERO, Rational::new(1, 2), Rational::new(1, 2)).unwrap();
//! let zoomed = metrics.compute_relative(&zoom, 96, 96, AppFont::default);
//! assert_eq!(zoomed.logic_to_pixel_x(72, 96), 48);
//! ```
//!
//! ## Rounding
//!
//! Every integer conversion rounds to the nearest integer with ties away from
//! zero, symmetrically for negative values. Intermediates are evaluated in
//! 128-bit arithmetic and narrowed back to `i64` with saturation.
//!
//! ## Degenerate fractions
//!
//! A zero denominator reaching [`combine`] (for example a device reporting
//! 0 DPI) is logged through `tracing` and treated as the identity fraction
//! `1/1`. [`try_combine`] reports it as [`MapModeError::ZeroDenominator`]
//! instead.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and does not allocate.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`, `thiserror/std` and `tracing/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` float support.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod app_font;
mod error;
mod fraction;
mod geometry;
mod map_mode;
mod metrics;
mod round;
mod unit;

pub use app_font::{AppFont, FontMetrics};
pub use error::MapModeError;
pub use fraction::{COMBINE_SIGNIFICANT_BITS, Rational, combine, try_combine};
pub use geometry::{IntPoint, IntRect, IntSize};
pub use map_mode::MapMode;
pub use metrics::{MappingMetrics, convert_logic};
pub use unit::{MapUnit, UnitScale};
