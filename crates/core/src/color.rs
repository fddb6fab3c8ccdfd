//! Colors and the PowerPoint-style palettes offered by the color pickers.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded = match digits.len() {
            // #RGB shorthand: each digit is doubled
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
        Ok(Self::from_hex(value))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Theme colors for the text color picker, one row per palette line.
pub const THEME_TEXT_COLORS: [[Color; 6]; 3] = [
    [
        Color::from_hex(0x000000),
        Color::from_hex(0x44546A),
        Color::from_hex(0x5B9BD5),
        Color::from_hex(0x0070C0),
        Color::from_hex(0x002060),
        Color::from_hex(0x7030A0),
    ],
    [
        Color::from_hex(0xFFFFFF),
        Color::from_hex(0xD9D9D9),
        Color::from_hex(0xFFC000),
        Color::from_hex(0xED7D31),
        Color::from_hex(0xA5A5A5),
        Color::from_hex(0x3F3F3F),
    ],
    [
        Color::from_hex(0xFF0000),
        Color::from_hex(0x00B0F0),
        Color::from_hex(0x92D050),
        Color::from_hex(0xFFFF00),
        Color::from_hex(0xE26B0A),
        Color::from_hex(0x9BBB59),
    ],
];

pub const STANDARD_TEXT_COLORS: [Color; 18] = [
    Color::from_hex(0x000000),
    Color::from_hex(0x333333),
    Color::from_hex(0x666666),
    Color::from_hex(0x999999),
    Color::from_hex(0xCCCCCC),
    Color::from_hex(0xFFFFFF),
    Color::from_hex(0xFF0000),
    Color::from_hex(0xFF6600),
    Color::from_hex(0xFFFF00),
    Color::from_hex(0x00FF00),
    Color::from_hex(0x00FFFF),
    Color::from_hex(0x0000FF),
    Color::from_hex(0x800000),
    Color::from_hex(0x808000),
    Color::from_hex(0x008000),
    Color::from_hex(0x008080),
    Color::from_hex(0x000080),
    Color::from_hex(0x800080),
];

/// Theme colors for the highlight picker.
pub const THEME_HIGHLIGHT_COLORS: [[Color; 6]; 3] = [
    [
        Color::from_hex(0xFFFF00),
        Color::from_hex(0xFFFC99),
        Color::from_hex(0xFFF400),
        Color::from_hex(0xFFC000),
        Color::from_hex(0xF7D062),
        Color::from_hex(0xF39F3A),
    ],
    [
        Color::from_hex(0xE2F1A1),
        Color::from_hex(0xD5E8A5),
        Color::from_hex(0x9BD18B),
        Color::from_hex(0x5B9BD5),
        Color::from_hex(0x4472C4),
        Color::from_hex(0x2E75B6),
    ],
    [
        Color::from_hex(0xF2DCDB),
        Color::from_hex(0xE7B8B7),
        Color::from_hex(0xD9D9D9),
        Color::from_hex(0xBFBFBF),
        Color::from_hex(0x8EA9DB),
        Color::from_hex(0x5C7CA3),
    ],
];

pub const STANDARD_HIGHLIGHT_COLORS: [Color; 12] = [
    Color::from_hex(0xFFFFFF),
    Color::from_hex(0x000000),
    Color::from_hex(0xFF0000),
    Color::from_hex(0xFF6600),
    Color::from_hex(0xFFFF00),
    Color::from_hex(0x00FF00),
    Color::from_hex(0x00FFFF),
    Color::from_hex(0x0000FF),
    Color::from_hex(0x800000),
    Color::from_hex(0x808000),
    Color::from_hex(0x008000),
    Color::from_hex(0x008080),
];

/// Initial value of the custom highlight color input.
pub const DEFAULT_CUSTOM_HIGHLIGHT: Color = Color::from_hex(0xFFFF00);

/// All swatches of the text color picker in display order.
pub fn text_swatches() -> impl Iterator<Item = Color> {
    THEME_TEXT_COLORS
        .into_iter()
        .flatten()
        .chain(STANDARD_TEXT_COLORS)
}

/// All swatches of the highlight picker in display order.
pub fn highlight_swatches() -> impl Iterator<Item = Color> {
    THEME_HIGHLIGHT_COLORS
        .into_iter()
        .flatten()
        .chain(STANDARD_HIGHLIGHT_COLORS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!("#3B82F6".parse::<Color>().unwrap(), Color::rgb(0x3B, 0x82, 0xF6));
        assert_eq!("#3b82f6".parse::<Color>().unwrap(), Color::rgb(0x3B, 0x82, 0xF6));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(" #000 ".parse::<Color>().unwrap(), Color::BLACK);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("3B82F6".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("transparent".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_is_uppercase_hex() {
        assert_eq!(Color::rgb(0x1e, 0x40, 0xaf).to_string(), "#1E40AF");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::from_hex(0x92D050)).unwrap();
        assert_eq!(json, "\"#92D050\"");

        let back: Color = serde_json::from_str("\"#92d050\"").unwrap();
        assert_eq!(back, Color::from_hex(0x92D050));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn test_palette_sizes() {
        assert_eq!(text_swatches().count(), 36);
        assert_eq!(highlight_swatches().count(), 30);
        assert_eq!(text_swatches().next(), Some(Color::BLACK));
        assert_eq!(highlight_swatches().next(), Some(DEFAULT_CUSTOM_HIGHLIGHT));
    }
}
