//! Rich text held by editable slide elements.
//!
//! Text is a flat sequence of styled runs. Selections address it by
//! character offset, so a range never splits a UTF-8 sequence. Line breaks
//! are plain `\n` characters inside runs.

use crate::{Alignment, Case, Color, Error, FontSize, FormatCommand, FormatState, ListKind, Result};
use serde::{Deserialize, Serialize};

/// A range in a text, measured in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Create a range, swapping the bounds if they are reversed.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.abs_diff(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

/// Character-level formatting of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Color>,
}

impl InlineStyle {
    /// Whether the toggle attribute named by `command` is set.
    fn has(&self, command: &FormatCommand) -> bool {
        match command {
            FormatCommand::Bold => self.bold,
            FormatCommand::Italic => self.italic,
            FormatCommand::Underline => self.underline,
            FormatCommand::Strikethrough => self.strikethrough,
            _ => false,
        }
    }

    /// Apply a command. `enable` is the target state for toggles.
    fn apply(&mut self, command: &FormatCommand, enable: bool) {
        match command {
            FormatCommand::Bold => self.bold = enable,
            FormatCommand::Italic => self.italic = enable,
            FormatCommand::Underline => self.underline = enable,
            FormatCommand::Strikethrough => self.strikethrough = enable,
            FormatCommand::SetForeground(color) => self.color = Some(*color),
            FormatCommand::SetBackground(color) => self.highlight = *color,
            FormatCommand::SetFontFamily(family) => self.font_family = Some(family.clone()),
            FormatCommand::SetFontSize(size) => self.font_size = Some(*size),
            FormatCommand::SetAlignment(_) => {}
        }
    }
}

/// A stretch of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub style: InlineStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// The text of an editable region along with its paragraph formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RichText {
    pub runs: Vec<TextRun>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ListKind>,
}

impl RichText {
    /// Create unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_runs(vec![TextRun::new(text)])
    }

    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        let mut rich = Self {
            runs,
            ..Self::default()
        };
        rich.normalize();
        rich
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// The characters covered by `range`.
    pub fn slice(&self, range: Range) -> Result<String> {
        let range = self.check(range)?;
        Ok(self
            .plain_text()
            .chars()
            .skip(range.start)
            .take(range.len())
            .collect())
    }

    /// Apply a formatting command to `range`.
    ///
    /// Toggles switch the attribute off when every selected character already
    /// carries it and on otherwise. A caret range leaves characters untouched;
    /// alignment always applies to the whole region.
    pub fn apply(&mut self, range: Range, command: &FormatCommand) -> Result<()> {
        let range = self.check(range)?;

        if let FormatCommand::SetAlignment(alignment) = command {
            self.alignment = *alignment;
            return Ok(());
        }
        if range.is_caret() {
            return Ok(());
        }

        let enable = !command.is_toggle() || !self.all_chars(range, |style| style.has(command));

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.style.apply(command, enable);
        }
        self.normalize();
        Ok(())
    }

    /// Report which toggles are active over `range`.
    ///
    /// For a caret the style of the character before it is reported, or the
    /// first character when the caret sits at the start.
    pub fn query(&self, range: Range) -> Result<FormatState> {
        let range = self.check(range)?;

        if range.is_caret() {
            let offset = range.start.saturating_sub(1);
            let style = self.style_at(offset).cloned().unwrap_or_default();
            return Ok(FormatState {
                bold: style.bold,
                italic: style.italic,
                underline: style.underline,
                strikethrough: style.strikethrough,
            });
        }

        Ok(FormatState {
            bold: self.all_chars(range, |s| s.bold),
            italic: self.all_chars(range, |s| s.italic),
            underline: self.all_chars(range, |s| s.underline),
            strikethrough: self.all_chars(range, |s| s.strikethrough),
        })
    }

    /// Convert the case of the selected characters in place.
    ///
    /// Styling of each run is kept. Returns the range now covering the
    /// converted text, which differs in length from the input only when the
    /// conversion itself changes the character count.
    pub fn transform_case(&mut self, range: Range, case: Case) -> Result<Range> {
        let range = self.check(range)?;
        if range.is_caret() {
            return Ok(range);
        }

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        let mut converted_len = 0;
        for run in &mut self.runs[first..last] {
            run.text = case.convert(&run.text);
            converted_len += run.char_len();
        }
        self.normalize();

        Ok(Range::new(range.start, range.start + converted_len))
    }

    /// Overwrite the whole text, keeping the style of the first run.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        let style = self
            .runs
            .first()
            .map(|r| r.style.clone())
            .unwrap_or_default();
        self.runs = vec![TextRun::styled(text, style)];
        self.normalize();
    }

    /// Normalise `range` and make sure it lies inside the text.
    fn check(&self, range: Range) -> Result<Range> {
        let range = Range::new(range.start, range.end);
        let len = self.char_len();
        if range.end > len {
            return Err(Error::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(range)
    }

    fn style_at(&self, offset: usize) -> Option<&InlineStyle> {
        let mut pos = 0;
        for run in &self.runs {
            let len = run.char_len();
            if offset < pos + len {
                return Some(&run.style);
            }
            pos += len;
        }
        None
    }

    /// Whether every character in `range` satisfies `pred`.
    fn all_chars(&self, range: Range, pred: impl Fn(&InlineStyle) -> bool) -> bool {
        let mut pos = 0;
        for run in &self.runs {
            let len = run.char_len();
            let overlaps = pos < range.end && range.start < pos + len;
            if overlaps && !pred(&run.style) {
                return false;
            }
            pos += len;
        }
        true
    }

    /// Make `offset` a run boundary and return the index of the run that
    /// starts there.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.runs.len() {
            if pos == offset {
                return i;
            }
            let len = self.runs[i].char_len();
            if offset < pos + len {
                let byte = byte_offset(&self.runs[i].text, offset - pos);
                let tail = self.runs[i].text.split_off(byte);
                let style = self.runs[i].style.clone();
                self.runs.insert(i + 1, TextRun::styled(tail, style));
                return i + 1;
            }
            pos += len;
        }
        self.runs.len()
    }

    /// Drop empty runs and merge neighbours with identical style.
    fn normalize(&mut self) {
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> InlineStyle {
        InlineStyle {
            bold: true,
            ..InlineStyle::default()
        }
    }

    #[test]
    fn test_range_normalizes_reversed_bounds() {
        let range = Range::new(7, 2);
        assert_eq!(range, Range { start: 2, end: 7 });
        assert_eq!(range.len(), 5);
        assert!(Range::caret(3).is_caret());
    }

    #[test]
    fn test_reversed_field_range_is_normalized() {
        let reversed = Range { start: 11, end: 6 };
        assert_eq!(reversed.len(), 5);

        let mut text = RichText::plain("Hello world");
        assert_eq!(text.slice(reversed).unwrap(), "world");
        text.apply(reversed, &FormatCommand::Bold).unwrap();
        assert_eq!(
            text.runs,
            vec![TextRun::new("Hello "), TextRun::styled("world", bold())]
        );
        assert!(text.query(reversed).unwrap().bold);

        let converted = text.transform_case(reversed, Case::Upper).unwrap();
        assert_eq!(converted, Range::new(6, 11));
        assert_eq!(text.plain_text(), "Hello WORLD");

        assert!(matches!(
            text.slice(Range { start: 20, end: 2 }),
            Err(Error::InvalidRange { start: 2, end: 20, len: 11 })
        ));
    }

    #[test]
    fn test_bold_splits_runs() {
        let mut text = RichText::plain("Hello world");
        text.apply(Range::new(6, 11), &FormatCommand::Bold).unwrap();

        assert_eq!(
            text.runs,
            vec![TextRun::new("Hello "), TextRun::styled("world", bold())]
        );
        assert_eq!(text.plain_text(), "Hello world");
    }

    #[test]
    fn test_toggle_off_when_fully_applied() {
        let mut text = RichText::from_runs(vec![TextRun::styled("Hello", bold())]);
        text.apply(Range::new(0, 5), &FormatCommand::Bold).unwrap();

        assert_eq!(text.runs, vec![TextRun::new("Hello")]);
    }

    #[test]
    fn test_toggle_on_when_partially_applied() {
        let mut text = RichText::from_runs(vec![
            TextRun::styled("Hel", bold()),
            TextRun::new("lo"),
        ]);
        text.apply(Range::new(0, 5), &FormatCommand::Bold).unwrap();

        assert_eq!(text.runs, vec![TextRun::styled("Hello", bold())]);
        assert!(text.query(Range::new(0, 5)).unwrap().bold);
    }

    #[test]
    fn test_caret_changes_nothing() {
        let mut text = RichText::plain("Hello");
        text.apply(Range::caret(2), &FormatCommand::Italic).unwrap();
        assert_eq!(text.runs, vec![TextRun::new("Hello")]);
    }

    #[test]
    fn test_out_of_bounds_range_is_rejected() {
        let mut text = RichText::plain("Hi");
        let err = text.apply(Range::new(0, 3), &FormatCommand::Bold).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { end: 3, len: 2, .. }));
    }

    #[test]
    fn test_setters_apply_values() {
        let red = Color::from_hex(0xFF0000);
        let mut text = RichText::plain("abcdef");
        text.apply(Range::new(1, 3), &FormatCommand::SetForeground(red))
            .unwrap();
        text.apply(Range::new(1, 3), &FormatCommand::SetBackground(Some(Color::WHITE)))
            .unwrap();
        text.apply(Range::new(1, 3), &FormatCommand::SetBackground(None))
            .unwrap();

        assert_eq!(text.runs.len(), 3);
        assert_eq!(text.runs[1].text, "bc");
        assert_eq!(text.runs[1].style.color, Some(red));
        assert_eq!(text.runs[1].style.highlight, None);
    }

    #[test]
    fn test_alignment_applies_to_region() {
        let mut text = RichText::plain("abc");
        text.apply(Range::caret(0), &FormatCommand::SetAlignment(Alignment::Center))
            .unwrap();
        assert_eq!(text.alignment, Alignment::Center);
    }

    #[test]
    fn test_query_caret_uses_previous_character() {
        let text = RichText::from_runs(vec![TextRun::styled("ab", bold()), TextRun::new("cd")]);

        assert!(text.query(Range::caret(2)).unwrap().bold);
        assert!(!text.query(Range::caret(3)).unwrap().bold);
        assert!(text.query(Range::caret(0)).unwrap().bold);
        assert!(!text.query(Range::new(1, 3)).unwrap().bold);
    }

    #[test]
    fn test_transform_case_only_touches_selection() {
        let mut text = RichText::from_runs(vec![
            TextRun::new("make "),
            TextRun::styled("this", bold()),
            TextRun::new(" loud"),
        ]);
        let range = text.transform_case(Range::new(3, 12), Case::Upper).unwrap();

        assert_eq!(text.plain_text(), "maKE THIS LOud");
        assert_eq!(range, Range::new(3, 12));
        assert_eq!(text.runs[1], TextRun::styled("THIS", bold()));
    }

    #[test]
    fn test_transform_case_reports_grown_range() {
        let mut text = RichText::plain("straße");
        let range = text.transform_case(Range::new(0, 6), Case::Upper).unwrap();
        assert_eq!(text.plain_text(), "STRASSE");
        assert_eq!(range, Range::new(0, 7));
    }

    #[test]
    fn test_multibyte_offsets() {
        let mut text = RichText::plain("E = mc²!");
        text.apply(Range::new(6, 7), &FormatCommand::Underline).unwrap();
        assert_eq!(text.runs[1].text, "²");
        assert_eq!(text.slice(Range::new(4, 7)).unwrap(), "mc²");
    }

    #[test]
    fn test_replace_text_keeps_first_style() {
        let mut text = RichText::from_runs(vec![TextRun::styled("one", bold()), TextRun::new("two")]);
        text.replace_text("three");
        assert_eq!(text.runs, vec![TextRun::styled("three", bold())]);
    }

    #[test]
    fn test_plain_empty_text_has_no_runs() {
        let text = RichText::plain("");
        assert!(text.is_empty());
        assert!(text.runs.is_empty());
        assert_eq!(text.query(Range::caret(0)).unwrap(), FormatState::default());
    }
}
