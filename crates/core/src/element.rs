//! Slide elements: positioned, typed objects placed on a slide.

use crate::{Color, Error, FontSize, Result, RichText};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a slide element: its creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| Error::UnknownValue(format!("element id '{}'", s)))
    }
}

/// Hands out timestamp ids that never repeat.
///
/// Two elements created within the same millisecond get consecutive ids.
#[derive(Debug, Clone, Default)]
pub struct ElementIdGenerator {
    last: u64,
}

impl ElementIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> Result<ElementId> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now)
    }

    /// Allocate an id for an element created at `millis`.
    ///
    /// Fails once `u64::MAX` has been handed out or observed.
    pub fn next_at(&mut self, millis: u64) -> Result<ElementId> {
        let id = if millis > self.last {
            millis
        } else {
            self.last.checked_add(1).ok_or(Error::IdSpaceExhausted)?
        };
        self.last = id;
        Ok(ElementId(id))
    }

    /// Make sure later ids sort after `existing`.
    pub fn observe(&mut self, existing: ElementId) {
        self.last = self.last.max(existing.0);
    }
}

/// Position and size of an element on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// An element placed on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideElement {
    pub id: ElementId,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl SlideElement {
    pub fn new(id: ElementId, geometry: Geometry, kind: ElementKind) -> Self {
        Self { id, geometry, kind }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// The text frame of an editable element.
    pub fn text_frame(&self) -> Option<&TextFrame> {
        match &self.kind {
            ElementKind::Textbox(frame) | ElementKind::Equation(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn text_frame_mut(&mut self) -> Option<&mut TextFrame> {
        match &mut self.kind {
            ElementKind::Textbox(frame) | ElementKind::Equation(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.text_frame().is_some()
    }
}

/// Type-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Textbox(TextFrame),
    Shape(ShapeStyle),
    Image(ImageSource),
    Chart(ChartSpec),
    Table(TableGrid),
    Equation(TextFrame),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Textbox(_) => ElementType::Textbox,
            Self::Shape(_) => ElementType::Shape,
            Self::Image(_) => ElementType::Image,
            Self::Chart(_) => ElementType::Chart,
            Self::Table(_) => ElementType::Table,
            Self::Equation(_) => ElementType::Equation,
        }
    }
}

/// Editable text with its base font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFrame {
    pub body: RichText,
    pub font_family: String,
    pub font_size: FontSize,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub shape_type: String,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

/// An embedded picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// `data:` URL holding the image bytes.
    pub src: String,
    /// Original file name.
    pub alt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Pie,
    Doughnut,
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: ChartOptions,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub color: Color,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub legend: bool,
    pub data_labels: bool,
}

/// A table with every cell stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<String>>,
}

impl TableGrid {
    /// A `rows` x `cols` grid with every cell set to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: &str) -> Self {
        Self {
            rows,
            cols,
            data: vec![vec![fill.to_string(); cols]; rows],
        }
    }
}

/// The element types the ribbon can insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Textbox,
    Shape,
    Image,
    Chart,
    Table,
    Equation,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Textbox => "textbox",
            Self::Shape => "shape",
            Self::Image => "image",
            Self::Chart => "chart",
            Self::Table => "table",
            Self::Equation => "equation",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "textbox" => Ok(Self::Textbox),
            "shape" => Ok(Self::Shape),
            "image" => Ok(Self::Image),
            "chart" => Ok(Self::Chart),
            "table" => Ok(Self::Table),
            "equation" => Ok(Self::Equation),
            other => Err(Error::UnknownValue(format!("element type '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_timestamps() {
        let mut ids = ElementIdGenerator::new();
        assert_eq!(ids.next_at(1_700_000_000_000).unwrap(), ElementId(1_700_000_000_000));
        assert_eq!(ids.next_at(1_700_000_000_500).unwrap(), ElementId(1_700_000_000_500));
    }

    #[test]
    fn test_ids_in_same_tick_do_not_collide() {
        let mut ids = ElementIdGenerator::new();
        let a = ids.next_at(42).unwrap();
        let b = ids.next_at(42).unwrap();
        let c = ids.next_at(40).unwrap();
        assert_eq!((a, b, c), (ElementId(42), ElementId(43), ElementId(44)));
    }

    #[test]
    fn test_observe_existing_ids() {
        let mut ids = ElementIdGenerator::new();
        ids.observe(ElementId(900));
        assert_eq!(ids.next_at(100).unwrap(), ElementId(901));
        assert!(ids.next_id().unwrap() > ElementId(901));
    }

    #[test]
    fn test_largest_id_exhausts_generator() {
        let mut ids = ElementIdGenerator::new();
        ids.observe(ElementId(u64::MAX));
        assert!(matches!(ids.next_at(5), Err(Error::IdSpaceExhausted)));
        assert!(matches!(ids.next_id(), Err(Error::IdSpaceExhausted)));

        let mut ids = ElementIdGenerator::new();
        assert_eq!(ids.next_at(u64::MAX).unwrap(), ElementId(u64::MAX));
        assert!(ids.next_at(u64::MAX).is_err());
    }

    #[test]
    fn test_element_json_shape() {
        let element = SlideElement::new(
            ElementId(7),
            Geometry::new(100.0, 100.0, 160.0, 80.0),
            ElementKind::Table(TableGrid::filled(2, 2, "Cell")),
        );
        let value = serde_json::to_value(&element).unwrap();

        assert_eq!(value["type"], "table");
        assert_eq!(value["id"], 7);
        assert_eq!(value["width"], 160.0);
        assert_eq!(value["data"][1][0], "Cell");

        let back: SlideElement = serde_json::from_value(value).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_only_text_elements_are_editable() {
        let text = SlideElement::new(
            ElementId(1),
            Geometry::default(),
            ElementKind::Equation(TextFrame {
                body: RichText::plain("x"),
                font_family: "Arial".into(),
                font_size: FontSize::new(16).unwrap(),
                color: Color::BLACK,
            }),
        );
        let image = SlideElement::new(
            ElementId(2),
            Geometry::default(),
            ElementKind::Image(ImageSource {
                src: "data:image/png;base64,".into(),
                alt: "a.png".into(),
            }),
        );

        assert!(text.is_editable());
        assert!(!image.is_editable());
        assert_eq!(image.element_type(), ElementType::Image);
    }

    #[test]
    fn test_table_grid_fill() {
        let grid = TableGrid::filled(3, 4, "Cell");
        assert_eq!(grid.data.len(), 3);
        assert!(grid.data.iter().all(|row| row.len() == 4));
    }
}
