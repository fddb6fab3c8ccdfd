//! Error types for the formatting ribbon.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing slides through the ribbon.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A deck file could not be encoded or decoded.
    #[error("Deck serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A slide index does not exist in the presentation.
    #[error("Slide {index} out of range (presentation has {len} slides)")]
    SlideOutOfRange { index: usize, len: usize },

    /// A text range reaches past the end of the text it addresses.
    #[error("Range {start}..{end} out of bounds for text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// A color string is not `#RGB` or `#RRGGBB`.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A font size is not a positive integer.
    #[error("Invalid font size: {0}")]
    InvalidFontSize(String),

    /// A key combination string could not be parsed.
    #[error("Invalid key combination: {0}")]
    InvalidKey(String),

    /// A named option (alignment, list style, chart kind) is not recognized.
    #[error("Unknown value: {0}")]
    UnknownValue(String),

    /// No element id above the largest one in use is left.
    #[error("Element ids exhausted")]
    IdSpaceExhausted,

    /// A picked file is not an image.
    #[error("Not an image file: {0}")]
    UnsupportedImage(String),
}
