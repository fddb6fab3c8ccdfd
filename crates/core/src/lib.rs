//! Core model and controls for a slide editor's formatting ribbon:
//! rich text, slide elements, the presentation store, and the ribbon
//! that edits them.

pub mod color;
pub mod command;
pub mod dialog;
pub mod element;
pub mod error;
pub mod insert;
pub mod lists;
pub mod presentation;
pub mod ribbon;
pub mod shortcuts;
pub mod text;

pub use color::Color;
pub use command::{Alignment, Case, FontSize, FormatCommand, FormatState};
pub use dialog::{DialogState, ModalDialog, PromptOutcome, PromptReply, Prompter, ScriptedPrompter};
pub use element::{
    ChartData, ChartOptions, ChartSpec, ChartType, Dataset, ElementId, ElementIdGenerator,
    ElementKind, ElementType, Geometry, ImageSource, ShapeStyle, SlideElement, TableGrid,
    TextFrame,
};
pub use error::{Error, Result};
pub use insert::{FixedPicker, ImagePicker};
pub use lists::{ListApplication, ListKind, ListStyle};
pub use presentation::{Presentation, PresentationContext, Slide, SlideUpdate};
pub use ribbon::{
    ColorChoice, FormatChange, HighlightChoice, Primitive, Ribbon, RibbonConfig, RibbonHooks,
    RibbonState, TextSelection,
};
pub use shortcuts::{resolve_shortcut, KeyEvent, KeyboardHub, Modifiers, ShortcutAction, Subscription};
pub use text::{InlineStyle, Range, RichText, TextRun};
