//! Color types and utilities

/// RGBA color with f32 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create from hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgba8(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
            255,
        )
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Scale the existing alpha by `opacity` (clamped to 0..=1).
    pub fn faded(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Convert to u8 array [r, g, b, a]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

/// Palette shared by the demonstration scenes
pub mod palette {
    use super::Color;

    pub const WATER: Color = Color::new(0.25, 0.55, 0.85, 0.85);
    pub const SKY: Color = Color::rgb(0.9, 0.95, 1.0);
    pub const HULL: Color = Color::rgb(0.55, 0.35, 0.2);
    pub const ELEPHANT: Color = Color::rgb(0.6, 0.6, 0.65);
    pub const STONE: Color = Color::rgb(0.45, 0.45, 0.42);
    pub const WORKER: Color = Color::rgb(0.85, 0.6, 0.3);
    pub const MARK: Color = Color::rgb(0.85, 0.15, 0.15);
    pub const SCALE: Color = Color::rgb(0.3, 0.3, 0.35);
    pub const SUN_IDLE: Color = Color::rgb(0.95, 0.85, 0.4);
    pub const SUN_ACTIVE: Color = Color::rgb(1.0, 0.6, 0.1);
    pub const MOLECULE: Color = Color::rgb(0.1, 0.4, 0.9);
    pub const VAPOR: Color = Color::new(0.75, 0.85, 0.95, 1.0);
}
