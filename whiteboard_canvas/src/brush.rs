use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CanvasError;

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_SIZE: f64 = 2.0;
/// Sizes offered by the client's brush slider.
pub const SIZE_RANGE: RangeInclusive<f64> = 1.0..=10.0;

/// The stroke style applied to newly drawn segments.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Brush {
    pub color: String,
    pub size: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            size: DEFAULT_SIZE,
        }
    }
}

impl Brush {
    pub fn new(color: impl Into<String>, size: f64) -> Self {
        let mut brush = Self {
            color: color.into(),
            size: DEFAULT_SIZE,
        };
        brush.set_size(size);
        brush
    }

    /// Sets the size, clamped to [`SIZE_RANGE`]. NaN keeps the current size.
    pub fn set_size(&mut self, size: f64) {
        if !size.is_nan() {
            self.size = size.clamp(*SIZE_RANGE.start(), *SIZE_RANGE.end());
        }
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }
}

/// A straight (non-premultiplied) RGBA color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl FromStr for Color {
    type Err = CanvasError;

    /// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CanvasError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        let channels = match hex.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(255)),
            4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
            6 => (byte(0), byte(2), byte(4), Ok(255)),
            8 => (byte(0), byte(2), byte(4), byte(6)),
            _ => return Err(invalid()),
        };

        match channels {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Self { r, g, b, a }),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("#0f0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(
            "#0000ff80".parse::<Color>().unwrap(),
            Color { r: 0, g: 0, b: 255, a: 128 }
        );
        assert_eq!(
            "#abcd".parse::<Color>().unwrap(),
            Color { r: 0xaa, g: 0xbb, b: 0xcc, a: 0xdd }
        );
        assert_eq!("#A0B1C2".parse::<Color>().unwrap(), Color::rgb(0xa0, 0xb1, 0xc2));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "ff0000", "#ff000", "#gg0000", "red", "#ééé", "#1234567"] {
            assert!(
                matches!(bad.parse::<Color>(), Err(CanvasError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn brush_size_is_clamped_to_slider_range() {
        let mut brush = Brush::default();
        brush.set_size(25.0);
        assert_eq!(brush.size, 10.0);
        brush.set_size(0.0);
        assert_eq!(brush.size, 1.0);
        brush.set_size(f64::NAN);
        assert_eq!(brush.size, 1.0);
        assert_eq!(Brush::new("#123456", 4.0).size, 4.0);
    }
}
