// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::app_font::AppFont;
use crate::error::MapModeError;

/// Logical unit system of a [`crate::MapMode`].
///
/// The discriminants are stable and match the numbering used when map units
/// are stored or exchanged as raw integers; see [`MapUnit::try_from`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MapUnit {
    /// 1/100 millimeter.
    HundredthMm = 0,
    /// 1/10 millimeter.
    TenthMm = 1,
    /// Millimeter.
    Mm = 2,
    /// Centimeter.
    Cm = 3,
    /// 1/1000 inch.
    ThousandthInch = 4,
    /// 1/100 inch.
    HundredthInch = 5,
    /// 1/10 inch.
    TenthInch = 6,
    /// Inch.
    Inch = 7,
    /// Typographic point, 1/72 inch.
    Point = 8,
    /// Twentieth of a point, 1/1440 inch.
    Twip = 9,
    /// Device pixel.
    #[default]
    Pixel = 10,
    /// System font unit; currently sized like [`MapUnit::AppFont`].
    SystemFont = 11,
    /// Application (dialog) font unit; see [`AppFont`].
    AppFont = 12,
    /// Relative to the previously active mapping.
    ///
    /// A relative map mode has no unit of its own: its scale multiplies the
    /// previous scale and its origin is added to the previous offset expressed
    /// in the new scale.
    Relative = 13,
}

/// Intrinsic scale of a unit: logical units to inches as `num / denom` per axis.
///
/// Multiplying by the device DPI gives pixels per logical unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitScale {
    /// Horizontal numerator.
    pub num_x: i64,
    /// Horizontal denominator.
    pub denom_x: i64,
    /// Vertical numerator.
    pub num_y: i64,
    /// Vertical denominator.
    pub denom_y: i64,
}

impl UnitScale {
    /// Same `num / denom` on both axes.
    #[inline]
    pub const fn uniform(num: i64, denom: i64) -> Self {
        Self {
            num_x: num,
            denom_x: denom,
            num_y: num,
            denom_y: denom,
        }
    }
}

impl MapUnit {
    /// Every unit, in discriminant order.
    pub const ALL: [Self; 14] = [
        Self::HundredthMm,
        Self::TenthMm,
        Self::Mm,
        Self::Cm,
        Self::ThousandthInch,
        Self::HundredthInch,
        Self::TenthInch,
        Self::Inch,
        Self::Point,
        Self::Twip,
        Self::Pixel,
        Self::SystemFont,
        Self::AppFont,
        Self::Relative,
    ];

    /// Stable name used in debug output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HundredthMm => "HundredthMm",
            Self::TenthMm => "TenthMm",
            Self::Mm => "Mm",
            Self::Cm => "Cm",
            Self::ThousandthInch => "ThousandthInch",
            Self::HundredthInch => "HundredthInch",
            Self::TenthInch => "TenthInch",
            Self::Inch => "Inch",
            Self::Point => "Point",
            Self::Twip => "Twip",
            Self::Pixel => "Pixel",
            Self::SystemFont => "SystemFont",
            Self::AppFont => "AppFont",
            Self::Relative => "Relative",
        }
    }

    /// Returns `true` for [`MapUnit::Relative`].
    #[inline]
    pub const fn is_relative(self) -> bool {
        matches!(self, Self::Relative)
    }

    /// Returns `true` if the unit's size depends on the application font.
    #[inline]
    pub const fn is_font_relative(self) -> bool {
        matches!(self, Self::SystemFont | Self::AppFont)
    }

    /// Returns the intrinsic scale of this unit at the given DPI.
    ///
    /// `app_font` is only called for the font-relative units. Returns `None`
    /// for [`MapUnit::Relative`], whose scale is inherited from the previous
    /// mapping.
    pub fn scale(
        self,
        dpi_x: i32,
        dpi_y: i32,
        app_font: impl FnOnce() -> AppFont,
    ) -> Option<UnitScale> {
        let scale = match self {
            Self::HundredthMm => UnitScale::uniform(1, 2540),
            Self::TenthMm => UnitScale::uniform(1, 254),
            Self::Mm => UnitScale::uniform(5, 127),
            Self::Cm => UnitScale::uniform(50, 127),
            Self::ThousandthInch => UnitScale::uniform(1, 1000),
            Self::HundredthInch => UnitScale::uniform(1, 100),
            Self::TenthInch => UnitScale::uniform(1, 10),
            Self::Inch => UnitScale::uniform(1, 1),
            Self::Point => UnitScale::uniform(1, 72),
            Self::Twip => UnitScale::uniform(1, 1440),
            Self::Pixel => UnitScale {
                num_x: 1,
                denom_x: i64::from(dpi_x),
                num_y: 1,
                denom_y: i64::from(dpi_y),
            },
            Self::SystemFont | Self::AppFont => {
                let font = app_font();
                UnitScale {
                    num_x: font.x,
                    denom_x: i64::from(dpi_x) * 40,
                    num_y: font.y,
                    denom_y: i64::from(dpi_y) * 80,
                }
            }
            Self::Relative => return None,
        };
        Some(scale)
    }
}

impl TryFrom<u16> for MapUnit {
    type Error = MapModeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(MapModeError::UnknownUnit(value))
    }
}

impl From<MapUnit> for u16 {
    #[inline]
    fn from(unit: MapUnit) -> Self {
        unit as Self
    }
}

impl fmt::Display for MapUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
