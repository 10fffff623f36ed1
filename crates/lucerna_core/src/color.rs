//! RGBA colour type used throughout the renderer.
//!
//! Stored as four `f32` values in linear light (0.0 – 1.0).  Light colours
//! only use the RGB channels; alpha matters for clear colours and materials.
//!
//! # Example
//! ```rust,ignore
//! use lucerna_core::Color;
//!
//! let warm = Color::rgb(1.0, 0.8, 0.6);
//! let sky  = Color::from_hex(0x87CEEBFF);
//! let [r, g, b] = warm.to_rgb_array();
//! ```

use serde::{Deserialize, Serialize};

/// Linear-space RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    // ── Constructors ────────────────────────────────────────────────────────

    /// Opaque colour from red, green, blue components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour from all four components.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Construct from a packed `0xRRGGBBAA` hexadecimal value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self { r, g, b, a }
    }

    // ── Conversions ─────────────────────────────────────────────────────────

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns `[r, g, b]` (alpha discarded).
    #[inline]
    pub fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// RGB as a `Vec3`, the form light shaders consume.
    #[inline]
    pub fn to_vec3(self) -> glam::Vec3 {
        glam::Vec3::new(self.r, self.g, self.b)
    }

    /// Convert to a `wgpu::Color` for use as a clear value.
    #[cfg(feature = "gpu")]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    // ── Modifiers ───────────────────────────────────────────────────────────

    /// Linearly interpolate towards `other` by factor `t` (0 = self, 1 = other).
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    // ── Palette ─────────────────────────────────────────────────────────────

    pub const WHITE:       Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK:       Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const RED:         Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN:       Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE:        Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW:      Self = Self::rgb(1.0, 1.0, 0.0);
    pub const ORANGE:      Self = Self::rgb(1.0, 0.5, 0.0);

    pub const GRAY:        Self = Self::rgb(0.5, 0.5, 0.5);
    pub const SKY_BLUE:    Self = Self::rgb(0.53, 0.81, 0.92);
    pub const NAVY:        Self = Self::rgb(0.0, 0.0, 0.5);
}

impl From<[f32; 3]> for Color {
    fn from(a: [f32; 3]) -> Self {
        Self::rgb(a[0], a[1], a[2])
    }
}

impl From<glam::Vec3> for Color {
    fn from(v: glam::Vec3) -> Self {
        Self::rgb(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let c = Color::from_hex(0xFF8000FF);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.502).abs() < 0.01);
        assert!((c.b - 0.0).abs() < 0.01);
        assert!((c.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn lerp_halfway() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn alpha_defaults_to_opaque_when_omitted() {
        let c: Color = toml::from_str("r = 0.1\ng = 0.2\nb = 0.3").unwrap();
        assert_eq!(c, Color::rgb(0.1, 0.2, 0.3));
    }
}
