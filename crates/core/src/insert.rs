//! Default elements and parameter parsing for the insert buttons.

use crate::{
    ChartData, ChartOptions, ChartSpec, ChartType, Color, Dataset, ElementKind, Error, FontSize,
    Geometry, ImageSource, PromptOutcome, Result, RichText, ShapeStyle, TableGrid, TextFrame,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::future::{self, Future};
use std::path::{Path, PathBuf};

pub const ROWS_PROMPT: &str = "Enter number of rows (1-10):";
pub const COLUMNS_PROMPT: &str = "Enter number of columns (1-10):";
pub const CHART_PROMPT: &str = "Select chart type:\n1. Pie Chart\n2. Doughnut Chart\n3. Bar Chart\n4. Line Chart\n\nEnter 1, 2, 3, or 4:";

/// Table dimension used when a prompt gives nothing usable.
pub const DEFAULT_TABLE_DIMENSION: i64 = 3;
pub const MAX_TABLE_DIMENSION: i64 = 10;

const TABLE_CELL_WIDTH: f64 = 80.0;
const TABLE_CELL_HEIGHT: f64 = 40.0;
const TABLE_PLACEHOLDER: &str = "Cell";

const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Read a table dimension from a prompt answer, clamped to 1..=10.
pub fn table_dimension(outcome: &PromptOutcome) -> usize {
    let value = outcome
        .answer()
        .and_then(parse_leading_int)
        .unwrap_or(DEFAULT_TABLE_DIMENSION);
    value.clamp(1, MAX_TABLE_DIMENSION) as usize
}

/// Map a chart prompt answer to a chart type, defaulting to pie.
pub fn chart_type_choice(outcome: &PromptOutcome) -> ChartType {
    match outcome.answer() {
        Some("2") => ChartType::Doughnut,
        Some("3") => ChartType::Bar,
        Some("4") => ChartType::Line,
        _ => ChartType::Pie,
    }
}

/// Parse the integer a string starts with, ignoring leading whitespace
/// and anything after the digits. Values too large for `i64` saturate.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn text_frame(content: &str) -> TextFrame {
    TextFrame {
        body: RichText::plain(content),
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        font_size: FontSize::ELEMENT_DEFAULT,
        color: Color::BLACK,
    }
}

pub fn textbox(x: f64, y: f64) -> (Geometry, ElementKind) {
    (
        Geometry::new(x, y, 200.0, 100.0),
        ElementKind::Textbox(text_frame("New text")),
    )
}

pub fn equation(x: f64, y: f64) -> (Geometry, ElementKind) {
    (
        Geometry::new(x, y, 250.0, 150.0),
        ElementKind::Equation(text_frame("E = mc²")),
    )
}

pub fn shape(x: f64, y: f64) -> (Geometry, ElementKind) {
    (
        Geometry::new(x, y, 250.0, 150.0),
        ElementKind::Shape(ShapeStyle {
            shape_type: "rectangle".to_string(),
            fill: Color::from_hex(0x3B82F6),
            stroke: Color::from_hex(0x1E40AF),
            stroke_width: 2.0,
        }),
    )
}

pub fn table(x: f64, y: f64, rows: usize, cols: usize) -> (Geometry, ElementKind) {
    (
        Geometry::new(
            x,
            y,
            cols as f64 * TABLE_CELL_WIDTH,
            rows as f64 * TABLE_CELL_HEIGHT,
        ),
        ElementKind::Table(TableGrid::filled(rows, cols, TABLE_PLACEHOLDER)),
    )
}

/// A chart of the given type over the quarterly sample data.
pub fn chart(x: f64, y: f64, chart_type: ChartType) -> (Geometry, ElementKind) {
    let spec = ChartSpec {
        chart_type,
        data: ChartData {
            labels: ["Q1", "Q2", "Q3", "Q4"].map(String::from).to_vec(),
            datasets: vec![Dataset {
                label: "Sample Data".to_string(),
                color: Color::from_hex(0x3B82F6),
                data: vec![30.0, 45.0, 60.0, 40.0],
            }],
        },
        options: ChartOptions {
            legend: true,
            data_labels: true,
        },
        title: "Sample Chart".to_string(),
    };
    (Geometry::new(x, y, 400.0, 300.0), ElementKind::Chart(spec))
}

pub fn image(x: f64, y: f64, source: ImageSource) -> (Geometry, ElementKind) {
    (
        Geometry::new(x, y, 300.0, 200.0),
        ElementKind::Image(source),
    )
}

/// Lets the user choose an image file.
pub trait ImagePicker {
    /// `None` when the user dismissed the picker.
    fn pick_image(&self) -> impl Future<Output = Option<PathBuf>>;
}

/// Picker that always returns the same answer.
#[derive(Debug, Clone, Default)]
pub struct FixedPicker(pub Option<PathBuf>);

impl ImagePicker for FixedPicker {
    fn pick_image(&self) -> impl Future<Output = Option<PathBuf>> {
        future::ready(self.0.clone())
    }
}

/// Encode bytes as a `data:` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read an image file into an embeddable source.
///
/// The MIME type is guessed from the extension and must be `image/*`.
pub async fn load_image(path: &Path) -> Result<ImageSource> {
    let mime = mime_guess::from_path(path)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .ok_or_else(|| Error::UnsupportedImage(path.display().to_string()))?;

    let bytes = tokio::fs::read(path).await?;
    log::debug!("Read {} bytes of {} from {}", bytes.len(), mime, path.display());

    let alt = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ImageSource {
        src: data_url(mime.essence_str(), &bytes),
        alt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmed(text: &str) -> PromptOutcome {
        PromptOutcome::Confirmed(text.to_string())
    }

    #[test]
    fn test_table_dimension_clamps() {
        assert_eq!(table_dimension(&confirmed("4")), 4);
        assert_eq!(table_dimension(&confirmed("0")), 1);
        assert_eq!(table_dimension(&confirmed("-4")), 1);
        assert_eq!(table_dimension(&confirmed("11")), 10);
        assert_eq!(table_dimension(&confirmed("99999999999999999999999")), 10);
    }

    #[test]
    fn test_table_dimension_parses_leading_integer() {
        assert_eq!(table_dimension(&confirmed("  7 rows")), 7);
        assert_eq!(table_dimension(&confirmed("2.9")), 2);
        assert_eq!(table_dimension(&confirmed("+5")), 5);
    }

    #[test]
    fn test_table_dimension_defaults() {
        assert_eq!(table_dimension(&PromptOutcome::Cancelled), 3);
        assert_eq!(table_dimension(&confirmed("")), 3);
        assert_eq!(table_dimension(&confirmed("abc")), 3);
        assert_eq!(table_dimension(&confirmed("-")), 3);
    }

    #[test]
    fn test_chart_type_choice() {
        assert_eq!(chart_type_choice(&confirmed("1")), ChartType::Pie);
        assert_eq!(chart_type_choice(&confirmed("2")), ChartType::Doughnut);
        assert_eq!(chart_type_choice(&confirmed("3")), ChartType::Bar);
        assert_eq!(chart_type_choice(&confirmed("4")), ChartType::Line);
        assert_eq!(chart_type_choice(&confirmed(" 4 ")), ChartType::Pie);
        assert_eq!(chart_type_choice(&confirmed("3\n")), ChartType::Pie);
        assert_eq!(chart_type_choice(&confirmed("5")), ChartType::Pie);
        assert_eq!(chart_type_choice(&confirmed("bar")), ChartType::Pie);
        assert_eq!(chart_type_choice(&PromptOutcome::Cancelled), ChartType::Pie);
    }

    #[test]
    fn test_primitive_defaults() {
        let (geometry, kind) = textbox(100.0, 100.0);
        assert_eq!(geometry, Geometry::new(100.0, 100.0, 200.0, 100.0));
        match kind {
            ElementKind::Textbox(frame) => {
                assert_eq!(frame.body.plain_text(), "New text");
                assert_eq!(frame.font_size.to_string(), "16px");
                assert_eq!(frame.font_family, "Arial");
            }
            other => panic!("expected textbox, got {:?}", other),
        }

        let (geometry, kind) = shape(100.0, 100.0);
        assert_eq!((geometry.width, geometry.height), (250.0, 150.0));
        assert!(matches!(kind, ElementKind::Shape(ref s) if s.fill.to_string() == "#3B82F6"));

        let (_, kind) = equation(0.0, 0.0);
        assert!(matches!(kind, ElementKind::Equation(ref f) if f.body.plain_text() == "E = mc²"));
    }

    #[test]
    fn test_table_geometry_follows_grid() {
        let (geometry, kind) = table(100.0, 100.0, 2, 5);
        assert_eq!((geometry.width, geometry.height), (400.0, 80.0));
        assert!(matches!(kind, ElementKind::Table(ref t) if t.rows == 2 && t.cols == 5));
    }

    #[test]
    fn test_chart_sample_data() {
        let (geometry, kind) = chart(100.0, 100.0, ChartType::Bar);
        assert_eq!((geometry.width, geometry.height), (400.0, 300.0));
        let ElementKind::Chart(spec) = kind else {
            panic!("expected chart");
        };
        assert_eq!(spec.chart_type, ChartType::Bar);
        assert_eq!(spec.data.labels, vec!["Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(spec.data.datasets[0].data, vec![30.0, 45.0, 60.0, 40.0]);
        assert!(spec.options.legend && spec.options.data_labels);
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn test_load_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let source = load_image(&path).await.unwrap();
        assert_eq!(source.alt, "logo.png");
        assert_eq!(source.src, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_load_image_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(matches!(
            load_image(&path).await,
            Err(Error::UnsupportedImage(_))
        ));
    }

    #[tokio::test]
    async fn test_fixed_picker() {
        assert_eq!(FixedPicker(None).pick_image().await, None);
        let picker = FixedPicker(Some(PathBuf::from("a.png")));
        assert_eq!(picker.pick_image().await, Some(PathBuf::from("a.png")));
    }
}
