//! RGBA colors as written into node and edge records.
//!
//! Colors travel as CSS strings (`#RRGGBB` or `rgba(r,g,b,a)`), which is what
//! the rendering side reads back out of `data(color)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Invalid rgb()/rgba() color: {0}")]
    InvalidFunction(String),
    #[error("Unrecognized color syntax: {0}")]
    Unrecognized(String),
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from a CSS-style fractional alpha in `0.0..=1.0`.
    pub fn with_alpha(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self::rgba(r, g, b, alpha_to_u8(alpha))
    }

    pub fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| ColorParseError::InvalidHex(hex.to_string()))
        };
        match digits.len() {
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(ColorParseError::InvalidHex(hex.to_string())),
        }
    }

    fn from_function(input: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidFunction(input.to_string());
        let open = input.find('(').ok_or_else(invalid)?;
        let inner = input
            .get(open + 1..)
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => {
                let alpha: f32 = a.parse().map_err(|_| invalid())?;
                Ok(Self::with_alpha(channel(r)?, channel(g)?, channel(b)?, alpha))
            }
            _ => Err(invalid()),
        }
    }
}

fn alpha_to_u8(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('#') {
            Self::from_hex(trimmed)
        } else if trimmed.starts_with("rgb") {
            Self::from_function(trimmed)
        } else if trimmed.eq_ignore_ascii_case("white") {
            Ok(Self::WHITE)
        } else if trimmed.eq_ignore_ascii_case("black") {
            Ok(Self::BLACK)
        } else {
            Err(ColorParseError::Unrecognized(s.to_string()))
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_color_renders_as_hex() {
        assert_eq!(Color::rgb(0x77, 0x77, 0x77).to_css(), "#777777");
        assert_eq!(Color::WHITE.to_css(), "#FFFFFF");
    }

    #[test]
    fn test_translucent_color_renders_as_rgba() {
        let gray = Color::with_alpha(80, 80, 80, 0.5);
        assert_eq!(gray.a, 128);
        assert_eq!(gray.to_css(), "rgba(80,80,80,0.502)");
    }

    #[test]
    fn test_parse_accepts_css_forms() {
        assert_eq!("#1f77b4".parse::<Color>().unwrap(), Color::rgb(31, 119, 180));
        assert_eq!(
            "rgba(80,80,80, 0.5)".parse::<Color>().unwrap(),
            Color::rgba(80, 80, 80, 128)
        );
        assert_eq!("rgb(1, 2, 3)".parse::<Color>().unwrap(), Color::rgb(1, 2, 3));
        assert_eq!("white".parse::<Color>().unwrap(), Color::WHITE);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "#12".parse::<Color>(),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            "rgb(1,2)".parse::<Color>(),
            Err(ColorParseError::InvalidFunction(_))
        ));
        assert!(matches!(
            "teal-ish".parse::<Color>(),
            Err(ColorParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_css_round_trip_through_serde() {
        let color = Color::with_alpha(30, 30, 30, 0.5);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"rgba(30,30,30,0.502)\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn test_every_alpha_level_survives_serde() {
        for a in 0..=255u8 {
            let color = Color::rgba(10, 20, 30, a);
            let json = serde_json::to_string(&color).unwrap();
            let back: Color = serde_json::from_str(&json).unwrap();
            assert_eq!(back, color, "alpha {a} came back as {}", back.a);
        }
    }
}
