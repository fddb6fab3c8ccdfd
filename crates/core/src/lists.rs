//! List styles offered by the ribbon's list dropdown.
//!
//! Bullet, numeric and alphabetic lists are structural: they mark the
//! editable region as a list. Stars and arrows are decorated text: every
//! line is rewritten with a literal symbol in front.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// Regex matching a list marker at the start of a line.
static LEADING_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•★→]|\d+\.|[A-Z]\.)\s*").unwrap());

/// Structural list formatting of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    Bullet,
    Numeric,
    UpperAlpha,
}

/// A style from the list dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListStyle {
    #[default]
    Bullet,
    Numeric,
    Alphabetic,
    Stars,
    Arrows,
}

/// How a list style changes a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListApplication {
    Structural(ListKind),
    /// Lines are rewritten with this symbol in front.
    Decorated(char),
}

impl ListStyle {
    pub const ALL: [ListStyle; 5] = [
        Self::Bullet,
        Self::Numeric,
        Self::Alphabetic,
        Self::Stars,
        Self::Arrows,
    ];

    /// Marker shown on the dropdown button.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Bullet => "•",
            Self::Numeric => "1.",
            Self::Alphabetic => "A.",
            Self::Stars => "★",
            Self::Arrows => "→",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bullet => "Bullet Points",
            Self::Numeric => "Numeric",
            Self::Alphabetic => "Alphabetic",
            Self::Stars => "Stars",
            Self::Arrows => "Arrows",
        }
    }

    pub fn application(self) -> ListApplication {
        match self {
            Self::Bullet => ListApplication::Structural(ListKind::Bullet),
            Self::Numeric => ListApplication::Structural(ListKind::Numeric),
            Self::Alphabetic => ListApplication::Structural(ListKind::UpperAlpha),
            Self::Stars => ListApplication::Decorated('★'),
            Self::Arrows => ListApplication::Decorated('→'),
        }
    }
}

impl FromStr for ListStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bullet" => Ok(Self::Bullet),
            "numeric" => Ok(Self::Numeric),
            "alphabetic" => Ok(Self::Alphabetic),
            "stars" => Ok(Self::Stars),
            "arrows" => Ok(Self::Arrows),
            other => Err(Error::UnknownValue(format!("list style '{}'", other))),
        }
    }
}

/// Rewrite `text` as symbol-prefixed lines.
///
/// Blank lines are dropped and any marker already leading a line is
/// replaced rather than stacked.
pub fn decorate_lines(text: &str, symbol: char) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{} {}", symbol, strip_marker(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_marker(line: &str) -> &str {
    match LEADING_MARKER_REGEX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons() {
        let icons: Vec<_> = ListStyle::ALL.iter().map(|s| s.icon()).collect();
        assert_eq!(icons, vec!["•", "1.", "A.", "★", "→"]);
        assert_eq!(ListStyle::default(), ListStyle::Bullet);
    }

    #[test]
    fn test_applications() {
        assert_eq!(
            ListStyle::Alphabetic.application(),
            ListApplication::Structural(ListKind::UpperAlpha)
        );
        assert_eq!(ListStyle::Arrows.application(), ListApplication::Decorated('→'));
    }

    #[test]
    fn test_decorate_plain_lines() {
        assert_eq!(
            decorate_lines("first\n\nsecond\n   \nthird", '★'),
            "★ first\n★ second\n★ third"
        );
    }

    #[test]
    fn test_decorate_replaces_existing_markers() {
        let input = "• apples\n★ pears\n→ plums\n12. figs\nB. dates";
        assert_eq!(
            decorate_lines(input, '→'),
            "→ apples\n→ pears\n→ plums\n→ figs\n→ dates"
        );
    }

    #[test]
    fn test_decorate_keeps_leading_capitals() {
        assert_eq!(decorate_lines("Apples\n2024 results", '★'), "★ Apples\n★ 2024 results");
    }

    #[test]
    fn test_parse_list_style() {
        assert_eq!("Stars".parse::<ListStyle>().unwrap(), ListStyle::Stars);
        assert!("roman".parse::<ListStyle>().is_err());
    }
}
