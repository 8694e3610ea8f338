//! Color conversion
//!
//! RGBA colors with channels in `0.0..=1.0`, built from 0-255 components
//! or hex notation, plus linear blending between two colors.

use crate::error::{KitError, KitResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Builds a color from 0-255 channel values
    pub fn from_rgb255(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self::new(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            alpha,
        )
    }

    /// `0xRRGGBB` with an explicit alpha
    pub fn from_hex(value: u32, alpha: f64) -> Self {
        let [_, r, g, b] = value.to_be_bytes();
        Self::from_rgb255(r, g, b, alpha)
    }

    /// `0xAARRGGBB`
    pub fn from_hexa(value: u32) -> Self {
        let [a, r, g, b] = value.to_be_bytes();
        Self::from_rgb255(r, g, b, f64::from(a) / 255.0)
    }

    /// Parses `RRGGBB` or `#RRGGBB`, surrounding whitespace ignored
    ///
    /// # Errors
    /// `InvalidColor` unless exactly six hex digits remain.
    pub fn from_hex_str(input: &str, alpha: f64) -> KitResult<Self> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(KitError::InvalidColor(input.to_owned()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| KitError::InvalidColor(input.to_owned()))?;
        Ok(Self::from_hex(value, alpha))
    }

    /// Uppercase `RRGGBB`; channels are truncated, not rounded
    pub fn hex_string(&self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        format!(
            "{:02X}{:02X}{:02X}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }

    /// Linear interpolation from `start` to `end`
    ///
    /// `percentage <= 0` returns `start` and `>= 1` returns `end`.
    pub fn between(start: Rgba, end: Rgba, percentage: f64) -> Rgba {
        if percentage <= 0.0 {
            return start;
        }
        if percentage >= 1.0 {
            return end;
        }
        let lerp = |a: f64, b: f64| a + percentage * (b - a);
        Rgba::new(
            lerp(start.red, end.red),
            lerp(start.green, end.green),
            lerp(start.blue, end.blue),
            lerp(start.alpha, end.alpha),
        )
    }

    /// A random opaque color
    pub fn random() -> Self {
        Self::from_rgb255(
            rand::random_range(0..=255),
            rand::random_range(0..=255),
            rand::random_range(0..=255),
            1.0,
        )
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}
