//! RGBA colors.
//!
//! Components are stored as `f32` in `[0, 1]`. `lighter`/`darker` follow the
//! usual toolkit semantics: the value channel of the HSV representation is
//! scaled, and once it saturates at 1.0 the excess is taken out of the
//! saturation so very light colors drift towards white.

use serde::{Deserialize, Serialize};

/// Default factor used by [`Rgba::lighter`].
pub const DEFAULT_LIGHTER_FACTOR: f32 = 150.0;

/// Default factor used by [`Rgba::darker`].
pub const DEFAULT_DARKER_FACTOR: f32 = 200.0;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from float components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit components.
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Creates an opaque color from 8-bit components.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Creates a gray level.
    #[must_use]
    pub fn gray(level: u8) -> Self {
        Self::from_rgb8(level, level, level)
    }

    /// Converts to 8-bit components (rounded).
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Returns the same color with a different alpha.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    /// Creates a color from hue (degrees), saturation, lightness and alpha.
    #[must_use]
    pub fn from_hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        if s <= 0.0 {
            return Self::new(l, l, l, alpha);
        }

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = sector_rgb(h, c, x);
        let m = l - c / 2.0;
        Self::new(r + m, g + m, b + m, alpha.clamp(0.0, 1.0))
    }

    /// Creates a color from hue (degrees, negative for achromatic),
    /// saturation, value and alpha.
    #[must_use]
    pub fn from_hsva(hue: f32, saturation: f32, value: f32, alpha: f32) -> Self {
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);
        if hue < 0.0 || s <= 0.0 {
            return Self::new(v, v, v, alpha);
        }

        let c = v * s;
        let h = hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = sector_rgb(h, c, x);
        let m = v - c;
        Self::new(r + m, g + m, b + m, alpha.clamp(0.0, 1.0))
    }

    /// Returns `(hue, saturation, value)`; hue is `-1.0` for grays.
    #[must_use]
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;
        let saturation = if max > 0.0 { delta / max } else { 0.0 };

        if delta <= f32::EPSILON {
            return (-1.0, saturation, max);
        }

        let hue = if (max - self.r).abs() <= f32::EPSILON {
            60.0 * ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if (max - self.g).abs() <= f32::EPSILON {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };
        (hue, saturation, max)
    }

    /// Lighter color using the default factor (150%).
    #[must_use]
    pub fn lighter(self) -> Self {
        self.lighter_by(DEFAULT_LIGHTER_FACTOR)
    }

    /// Darker color using the default factor (200%).
    #[must_use]
    pub fn darker(self) -> Self {
        self.darker_by(DEFAULT_DARKER_FACTOR)
    }

    /// Lighter color; `factor` is a percentage (150 = 50% brighter).
    #[must_use]
    pub fn lighter_by(self, factor: f32) -> Self {
        if factor <= 0.0 {
            return self;
        }
        if factor < 100.0 {
            return self.darker_by(10_000.0 / factor);
        }

        let (hue, mut saturation, value) = self.to_hsv();
        let mut value = value * factor / 100.0;
        if value > 1.0 {
            saturation = (saturation - (value - 1.0)).max(0.0);
            value = 1.0;
        }
        Self::from_hsva(hue, saturation, value, self.a)
    }

    /// Darker color; `factor` is a percentage (200 = half the brightness).
    #[must_use]
    pub fn darker_by(self, factor: f32) -> Self {
        if factor <= 0.0 {
            return self;
        }
        if factor < 100.0 {
            return self.lighter_by(10_000.0 / factor);
        }

        let (hue, saturation, value) = self.to_hsv();
        Self::from_hsva(hue, saturation, value * 100.0 / factor, self.a)
    }

    /// Linear interpolation of all four channels.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

fn sector_rgb(h: f32, c: f32, x: f32) -> (f32, f32, f32) {
    match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    }
}
