// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process-wide app-font metric.

use std::sync::OnceLock;

use understory_map_mode::{AppFont, FontMetrics};

use crate::backend::DeviceBackend;
use crate::headless::HeadlessDevice;
use crate::surface::Surface;

static APP_FONT: OnceLock<AppFont> = OnceLock::new();

/// Returns the app-font metric, initializing it on first use.
///
/// `device_metrics` is consulted only by the first caller in the process.
/// When it yields nothing, a throwaway headless surface is probed instead.
/// Every later call returns the cached value, whatever device it comes from.
pub(crate) fn app_font_with(device_metrics: impl FnOnce() -> Option<FontMetrics>) -> AppFont {
    *APP_FONT.get_or_init(|| {
        let metrics = device_metrics().unwrap_or_else(probe_headless);
        let font = AppFont::from_font_metrics(metrics);
        tracing::debug!(
            char_width = metrics.average_char_width,
            text_height = metrics.text_height,
            x = font.x,
            y = font.y,
            "app font initialized"
        );
        font
    })
}

fn probe_headless() -> FontMetrics {
    let probe = Surface::with_device(HeadlessDevice::default());
    probe
        .device()
        .and_then(|device| device.default_font_metrics())
        .unwrap_or(HeadlessDevice::DEFAULT_FONT_METRICS)
}
