//! Typed formatting commands applied to rich text.

use crate::{Color, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A formatting operation on a text selection or its editable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    SetForeground(Color),
    /// `None` removes the highlight.
    SetBackground(Option<Color>),
    SetFontFamily(String),
    SetFontSize(FontSize),
    SetAlignment(Alignment),
}

impl FormatCommand {
    /// Whether this command flips an attribute instead of setting a value.
    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            Self::Bold | Self::Italic | Self::Underline | Self::Strikethrough
        )
    }
}

/// Horizontal text alignment of an editable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "justify" => Ok(Self::Justify),
            other => Err(Error::UnknownValue(format!("alignment '{}'", other))),
        }
    }
}

/// A font size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontSize(u32);

impl FontSize {
    /// Size of newly inserted text elements.
    pub const ELEMENT_DEFAULT: FontSize = FontSize(16);
    /// Size shown by the ribbon before the user picks one.
    pub const RIBBON_DEFAULT: FontSize = FontSize(12);

    pub fn new(px: u32) -> Option<Self> {
        (px > 0).then_some(Self(px))
    }

    pub fn px(self) -> u32 {
        self.0
    }
}

impl FromStr for FontSize {
    type Err = Error;

    /// Accepts "16" as well as "16px".
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix("px").unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| Error::InvalidFontSize(s.to_string()))
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl TryFrom<String> for FontSize {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FontSize> for String {
    fn from(size: FontSize) -> Self {
        size.to_string()
    }
}

/// Letter case conversion for the selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Lower,
}

impl Case {
    pub fn convert(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
        }
    }
}

/// Toggle attributes in effect over a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}
