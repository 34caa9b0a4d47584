// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dialog font units derived from the default UI font.

/// Metrics of a device's default UI font, in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontMetrics {
    /// Approximate width of an average character.
    pub average_char_width: i64,
    /// Line height of the font.
    pub text_height: i64,
}

/// Size of the application font unit used by [`crate::MapUnit::AppFont`]
/// and [`crate::MapUnit::SystemFont`].
///
/// One logical app-font unit is `x / 40` of a character cell horizontally and
/// `y / 80` vertically, expressed in pixels at the device DPI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AppFont {
    /// Horizontal metric (ten times an eighth of the widened character cell).
    pub x: i64,
    /// Vertical metric (ten times the text height).
    pub y: i64,
}

impl AppFont {
    /// Derives the app-font metric from default-font metrics.
    ///
    /// The character cell width is eight average characters, but never
    /// narrower than four text heights (plus a small margin when it is only
    /// just wider), so very narrow fonts still produce usable dialog layouts.
    pub fn from_font_metrics(metrics: FontMetrics) -> Self {
        let mut text_width = metrics.average_char_width.saturating_mul(8);
        let sym_height = metrics.text_height.saturating_mul(4);
        if sym_height > text_width {
            text_width = sym_height;
        } else if sym_height.saturating_add(5) > text_width {
            text_width = sym_height.saturating_add(5);
        }
        Self {
            x: text_width.saturating_mul(10) / 8,
            y: metrics.text_height.saturating_mul(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppFont, FontMetrics};

    #[test]
    fn wide_font_uses_character_width() {
        let font = AppFont::from_font_metrics(FontMetrics {
            average_char_width: 7,
            text_height: 6,
        });
        // 7 * 8 = 56 exceeds 4 * 6 + 5.
        assert_eq!(font, AppFont { x: 70, y: 60 });
    }

    #[test]
    fn narrow_font_is_widened() {
        let font = AppFont::from_font_metrics(FontMetrics {
            average_char_width: 5,
            text_height: 16,
        });
        assert_eq!(font.x, 64 * 10 / 8);
        assert_eq!(font.y, 160);

        let font = AppFont::from_font_metrics(FontMetrics {
            average_char_width: 8,
            text_height: 15,
        });
        // 64 is wider than 60 but within the 5 pixel margin.
        assert_eq!(font.x, 65 * 10 / 8);
    }
}
