//! Colors and the default theme.
//!
//! Colors are stored as 32-bit ARGB (`0xAARRGGBB`) and converted to the
//! backend's RGBA byte order only when vertices are emitted.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 32-bit ARGB color.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Solid black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Solid white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    /// Solid red.
    pub const RED: Self = Self(0xFFFF_0000);
    /// Solid green.
    pub const GREEN: Self = Self(0xFF00_FF00);
    /// Solid blue.
    pub const BLUE: Self = Self(0xFF00_00FF);

    /// Wraps a raw `0xAARRGGBB` value.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Builds a color from 8-bit channels.
    #[must_use]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Opaque color from 8-bit channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xFF, r, g, b)
    }

    /// Raw `0xAARRGGBB` value.
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        self.0
    }

    /// Alpha channel.
    #[must_use]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Returns true if the alpha channel is zero.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    /// Returns a new color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | (a as u32) << 24)
    }

    /// Multiplies the alpha channel by `factor` (clamped to [0, 1]).
    #[must_use]
    pub fn scale_alpha(self, factor: f32) -> Self {
        let factor = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 0.0 };
        let a = (f32::from(self.a()) * factor).round() as u8;
        self.with_alpha(a)
    }

    /// Byte order expected by vertex buffers.
    #[must_use]
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    /// Normalized RGBA.
    #[must_use]
    pub fn to_rgba_f32(self) -> [f32; 4] {
        self.to_rgba8().map(|c| f32::from(c) / 255.0)
    }

    /// Linearly interpolates between two colors, channel by channel.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            let (a, b) = (f32::from(a), f32::from(b));
            (a + (b - a) * t).round() as u8
        };
        Self::argb(
            mix(self.a(), other.a()),
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
        )
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(0x{:08X})", self.0)
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

/// Default colors handed to widgets at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Panel background.
    pub panel_background: Color,
    /// Panel border.
    pub panel_border: Color,
    /// Button in its resting state.
    pub button_normal: Color,
    /// Button under the pointer.
    pub button_hover: Color,
    /// Button held down.
    pub button_pressed: Color,
    /// Button that ignores input.
    pub button_disabled: Color,
    /// Button caption.
    pub button_text: Color,
    /// Label text.
    pub label_text: Color,
    /// Fill of missing-asset placeholders.
    pub placeholder_fill: Color,
    /// Frame of missing-asset placeholders.
    pub placeholder_frame: Color,
}

impl Theme {
    /// Dark slate theme.
    pub const SLATE: Self = Self {
        panel_background: Color(0xFF1E_2228),
        panel_border: Color(0xFF3A_414B),
        button_normal: Color(0xFF2D_5A88),
        button_hover: Color(0xFF3A_6FA6),
        button_pressed: Color(0xFF1F_3F60),
        button_disabled: Color(0xFF4A_4A4A),
        button_text: Color(0xFFF0_F0F0),
        label_text: Color(0xFFE6_E6E6),
        placeholder_fill: Color(0x40FF_00FF),
        placeholder_frame: Color(0xFFFF_00FF),
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::SLATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        let color = Color::from_argb(0xFF12_3456);
        assert_eq!(color.a(), 0xFF);
        assert_eq!(color.r(), 0x12);
        assert_eq!(color.g(), 0x34);
        assert_eq!(color.b(), 0x56);
        assert_eq!(color.to_rgba8(), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn test_color_lerp() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(mid.a(), 0xFF);
        assert!((i32::from(mid.r()) - 128).abs() <= 1);
    }

    #[test]
    fn test_scale_alpha() {
        assert_eq!(Color::WHITE.scale_alpha(0.0).a(), 0);
        assert_eq!(Color::WHITE.scale_alpha(1.0), Color::WHITE);
        assert_eq!(Color::WHITE.scale_alpha(f32::NAN).a(), 0);
    }
}
