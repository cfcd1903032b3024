//! Palette colours.

use bytemuck::{Pod, Zeroable};

/// An RGB colour with components in 0..=1, stored in sRGB space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal, e.g. `Rgb::from_hex(0x1E3A8A)`.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Convert from sRGB to linear light (what a `*Srgb` surface expects in the shader).
    pub fn to_linear(self) -> Self {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::new(decode(self.r), decode(self.g), decode(self.b))
    }

    /// Multiply every channel (brightness), clamped to 0..=1.
    pub fn scaled(self, k: f32) -> Self {
        Self::new(
            (self.r * k).clamp(0.0, 1.0),
            (self.g * k).clamp(0.0, 1.0),
            (self.b * k).clamp(0.0, 1.0),
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_from_hex_splits_channels() {
        let c = Rgb::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn rgb_to_linear_keeps_endpoints() {
        assert_eq!(Rgb::BLACK.to_linear(), Rgb::BLACK);
        let w = Rgb::WHITE.to_linear();
        assert!((w.r - 1.0).abs() < 1e-6 && (w.g - 1.0).abs() < 1e-6 && (w.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rgb_to_linear_darkens_midtones() {
        let mid = Rgb::new(0.5, 0.5, 0.5).to_linear();
        assert!(mid.r < 0.25 && mid.r > 0.2);
    }
}
