//! The formatting ribbon: toolbar state plus the handlers behind its controls.
//!
//! Every edit follows the same contract. The current slide is read from the
//! [`PresentationContext`], a fresh element list is built from a copy of
//! the old one, and the result is committed with `update_slide`. Missing
//! selections and selections outside an editable element are no-ops.

use crate::insert::{self, ImagePicker, CHART_PROMPT, COLUMNS_PROMPT, ROWS_PROMPT};
use crate::lists::{decorate_lines, ListApplication};
use crate::shortcuts::{resolve_shortcut, KeyEvent, KeyboardHub, ShortcutAction, Subscription};
use crate::{
    Alignment, Case, Color, ElementId, ElementIdGenerator, ElementKind, ElementType, Error,
    FontSize, FormatCommand, FormatState, Geometry, ListStyle, PresentationContext, Prompter,
    Range, Result, SlideElement, SlideUpdate, TextFrame,
};
use std::fmt;

const FONT_FAMILIES: [&str; 10] = [
    "Arial",
    "Calibri",
    "Times New Roman",
    "Helvetica",
    "Georgia",
    "Verdana",
    "Tahoma",
    "Comic Sans MS",
    "Impact",
    "Trebuchet MS",
];

const FONT_SIZES: [u32; 15] = [8, 9, 10, 11, 12, 14, 16, 18, 20, 24, 28, 32, 36, 48, 72];

/// Choices offered by the ribbon and the defaults it starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonConfig {
    pub font_families: Vec<String>,
    pub font_sizes: Vec<FontSize>,
    pub default_font_family: String,
    pub default_font_size: FontSize,
    /// Top-left corner of newly inserted elements.
    pub insert_origin: (f64, f64),
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            font_families: FONT_FAMILIES.iter().map(|f| f.to_string()).collect(),
            font_sizes: FONT_SIZES.into_iter().filter_map(FontSize::new).collect(),
            default_font_family: FONT_FAMILIES[0].to_string(),
            default_font_size: FontSize::RIBBON_DEFAULT,
            insert_origin: (100.0, 100.0),
        }
    }
}

impl RibbonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.font_families = families.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_font(mut self, family: impl Into<String>, size: FontSize) -> Self {
        self.default_font_family = family.into();
        self.default_font_size = size;
        self
    }

    pub fn with_insert_origin(mut self, x: f64, y: f64) -> Self {
        self.insert_origin = (x, y);
        self
    }
}

/// What the toolbar currently displays.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonState {
    pub font_family: String,
    pub font_size: FontSize,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub list_dropdown_open: bool,
    pub selected_list: ListStyle,
    pub alignment: Alignment,
    pub text_color_picker_open: bool,
    pub highlight_picker_open: bool,
}

impl RibbonState {
    fn from_config(config: &RibbonConfig) -> Self {
        Self {
            font_family: config.default_font_family.clone(),
            font_size: config.default_font_size,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            list_dropdown_open: false,
            selected_list: ListStyle::default(),
            alignment: Alignment::default(),
            text_color_picker_open: false,
            highlight_picker_open: false,
        }
    }

    fn mirror(&mut self, format: FormatState) {
        self.bold = format.bold;
        self.italic = format.italic;
        self.underline = format.underline;
        self.strikethrough = format.strikethrough;
    }
}

/// A font choice reported to the parent editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatChange {
    FontFamily(String),
    FontSize(FontSize),
}

/// Optional callbacks supplied by the parent editor.
#[derive(Default)]
pub struct RibbonHooks {
    apply_format: Option<Box<dyn FnMut(&FormatCommand)>>,
    format_changed: Option<Box<dyn FnMut(&FormatChange)>>,
}

impl RibbonHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receives value commands (font, colors) and alignment requests that
    /// found no editable region.
    pub fn with_apply_format(mut self, hook: impl FnMut(&FormatCommand) + 'static) -> Self {
        self.apply_format = Some(Box::new(hook));
        self
    }

    /// Receives font family and size choices.
    pub fn with_format_changed(mut self, hook: impl FnMut(&FormatChange) + 'static) -> Self {
        self.format_changed = Some(Box::new(hook));
        self
    }

    fn apply_format(&mut self, command: &FormatCommand) {
        if let Some(hook) = self.apply_format.as_mut() {
            hook(command);
        }
    }

    fn format_changed(&mut self, change: &FormatChange) {
        if let Some(hook) = self.format_changed.as_mut() {
            hook(change);
        }
    }
}

impl fmt::Debug for RibbonHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RibbonHooks")
            .field("apply_format", &self.apply_format.is_some())
            .field("format_changed", &self.format_changed.is_some())
            .finish()
    }
}

/// A text selection inside one element of the current slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSelection {
    pub element: ElementId,
    pub range: Range,
}

impl TextSelection {
    pub fn new(element: ElementId, range: impl Into<Range>) -> Self {
        Self {
            element,
            range: range.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// A palette swatch; closes the picker.
    Swatch(Color),
    /// The custom color input; the picker stays open.
    Custom(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightChoice {
    /// "No Highlight"; closes the picker.
    None,
    Swatch(Color),
    Custom(Color),
}

/// Elements inserted without asking for parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Textbox,
    Shape,
    Equation,
}

#[derive(Debug)]
pub struct Ribbon {
    config: RibbonConfig,
    state: RibbonState,
    hooks: RibbonHooks,
    ids: ElementIdGenerator,
}

impl Default for Ribbon {
    fn default() -> Self {
        Self::new(RibbonConfig::default())
    }
}

impl Ribbon {
    pub fn new(config: RibbonConfig) -> Self {
        Self {
            state: RibbonState::from_config(&config),
            config,
            hooks: RibbonHooks::default(),
            ids: ElementIdGenerator::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: RibbonHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    pub fn state(&self) -> &RibbonState {
        &self.state
    }

    /// Icon shown on the list dropdown button.
    pub fn list_icon(&self) -> &'static str {
        self.state.selected_list.icon()
    }

    // --- Font ---

    pub fn set_font_family<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        family: &str,
    ) -> Result<()> {
        self.state.font_family = family.to_string();
        self.apply_value(ctx, selection, FormatCommand::SetFontFamily(family.to_string()))?;
        self.hooks
            .format_changed(&FormatChange::FontFamily(family.to_string()));
        Ok(())
    }

    pub fn set_font_size<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        size: FontSize,
    ) -> Result<()> {
        self.state.font_size = size;
        self.apply_value(ctx, selection, FormatCommand::SetFontSize(size))?;
        self.hooks.format_changed(&FormatChange::FontSize(size));
        Ok(())
    }

    // --- Character toggles ---

    pub fn toggle_bold<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
    ) -> Result<()> {
        self.toggle(ctx, selection, FormatCommand::Bold)
    }

    pub fn toggle_italic<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
    ) -> Result<()> {
        self.toggle(ctx, selection, FormatCommand::Italic)
    }

    pub fn toggle_underline<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
    ) -> Result<()> {
        self.toggle(ctx, selection, FormatCommand::Underline)
    }

    pub fn toggle_strikethrough<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
    ) -> Result<()> {
        self.toggle(ctx, selection, FormatCommand::Strikethrough)
    }

    fn toggle<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        command: FormatCommand,
    ) -> Result<()> {
        let Some(selection) = selection else {
            return Ok(());
        };

        let format = self.edit_region(ctx, selection, |frame| {
            frame.body.apply(selection.range, &command)?;
            frame.body.query(selection.range)
        })?;
        if let Some(format) = format {
            self.state.mirror(format);
        }
        Ok(())
    }

    // --- Case ---

    /// Upper-case the selection; returns the selection over the new text.
    pub fn to_uppercase<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
    ) -> Result<Option<TextSelection>> {
        self.change_case(ctx, selection, Case::Upper)
    }

    pub fn to_lowercase<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
    ) -> Result<Option<TextSelection>> {
        self.change_case(ctx, selection, Case::Lower)
    }

    fn change_case<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        case: Case,
    ) -> Result<Option<TextSelection>> {
        let Some(selection) = selection else {
            return Ok(None);
        };

        let range = self.edit_region(ctx, selection, |frame| {
            frame.body.transform_case(selection.range, case)
        })?;
        Ok(range.map(|range| TextSelection::new(selection.element, range)))
    }

    // --- Lists ---

    pub fn toggle_list_dropdown(&mut self) {
        self.state.list_dropdown_open = !self.state.list_dropdown_open;
    }

    /// Pick a list style from the dropdown.
    ///
    /// The choice is recorded and the dropdown closed even when there is
    /// nothing to format.
    pub fn apply_list<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        style: ListStyle,
    ) -> Result<()> {
        self.state.selected_list = style;
        self.state.list_dropdown_open = false;

        let Some(selection) = selection else {
            return Ok(());
        };

        self.edit_region(ctx, selection, |frame| {
            match style.application() {
                ListApplication::Structural(kind) => frame.body.list = Some(kind),
                ListApplication::Decorated(symbol) => {
                    let selected = frame.body.slice(selection.range)?;
                    let source = if selected.is_empty() {
                        frame.body.plain_text()
                    } else {
                        selected
                    };
                    frame.body.replace_text(decorate_lines(&source, symbol));
                    frame.body.list = None;
                }
            }
            Ok(())
        })?;
        Ok(())
    }

    // --- Alignment ---

    /// Align the editable region holding the selection.
    ///
    /// When the selection is not inside an editable element the request is
    /// handed to the `apply_format` hook instead. The displayed alignment is
    /// updated either way.
    pub fn set_alignment<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        alignment: Alignment,
    ) -> Result<()> {
        let Some(selection) = selection else {
            return Ok(());
        };

        let command = FormatCommand::SetAlignment(alignment);
        let applied = self.edit_region(ctx, selection, |frame| {
            frame.body.apply(selection.range, &command)
        })?;
        if applied.is_none() {
            self.hooks.apply_format(&command);
        }

        self.state.alignment = alignment;
        Ok(())
    }

    // --- Colors ---

    /// Open or close the text color picker; opening it closes the highlight picker.
    pub fn toggle_text_color_picker(&mut self) {
        self.state.text_color_picker_open = !self.state.text_color_picker_open;
        self.state.highlight_picker_open = false;
    }

    pub fn toggle_highlight_picker(&mut self) {
        self.state.highlight_picker_open = !self.state.highlight_picker_open;
        self.state.text_color_picker_open = false;
    }

    pub fn choose_text_color<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        choice: ColorChoice,
    ) -> Result<()> {
        let (color, close) = match choice {
            ColorChoice::Swatch(color) => (color, true),
            ColorChoice::Custom(color) => (color, false),
        };
        self.apply_value(ctx, selection, FormatCommand::SetForeground(color))?;
        if close {
            self.state.text_color_picker_open = false;
        }
        Ok(())
    }

    pub fn choose_highlight<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        choice: HighlightChoice,
    ) -> Result<()> {
        let (color, close) = match choice {
            HighlightChoice::None => (None, true),
            HighlightChoice::Swatch(color) => (Some(color), true),
            HighlightChoice::Custom(color) => (Some(color), false),
        };
        self.apply_value(ctx, selection, FormatCommand::SetBackground(color))?;
        if close {
            self.state.highlight_picker_open = false;
        }
        Ok(())
    }

    /// Apply a value command to the selection and forward it to the parent.
    fn apply_value<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        command: FormatCommand,
    ) -> Result<()> {
        if let Some(selection) = selection {
            self.edit_region(ctx, selection, |frame| {
                frame.body.apply(selection.range, &command)
            })?;
        }
        self.hooks.apply_format(&command);
        Ok(())
    }

    // --- Insertion ---

    /// Insert an element of any type, collecting parameters as needed.
    ///
    /// Returns `None` only when the image picker was dismissed.
    pub async fn insert_element<C, P, I>(
        &mut self,
        ctx: &mut C,
        element_type: ElementType,
        prompter: &P,
        picker: &I,
    ) -> Result<Option<ElementId>>
    where
        C: PresentationContext,
        P: Prompter,
        I: ImagePicker,
    {
        match element_type {
            ElementType::Textbox => self.insert_primitive(ctx, Primitive::Textbox).map(Some),
            ElementType::Shape => self.insert_primitive(ctx, Primitive::Shape).map(Some),
            ElementType::Equation => self.insert_primitive(ctx, Primitive::Equation).map(Some),
            ElementType::Table => self.insert_table(ctx, prompter).await.map(Some),
            ElementType::Chart => self.insert_chart(ctx, prompter).await.map(Some),
            ElementType::Image => self.insert_image(ctx, picker).await,
        }
    }

    pub fn insert_primitive<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        primitive: Primitive,
    ) -> Result<ElementId> {
        let (x, y) = self.config.insert_origin;
        let element = match primitive {
            Primitive::Textbox => insert::textbox(x, y),
            Primitive::Shape => insert::shape(x, y),
            Primitive::Equation => insert::equation(x, y),
        };
        self.append(ctx, element)
    }

    /// Ask for rows and columns, then insert a placeholder table.
    pub async fn insert_table<C: PresentationContext, P: Prompter>(
        &mut self,
        ctx: &mut C,
        prompter: &P,
    ) -> Result<ElementId> {
        let rows = insert::table_dimension(&prompter.prompt(ROWS_PROMPT).await);
        let cols = insert::table_dimension(&prompter.prompt(COLUMNS_PROMPT).await);
        log::debug!("Creating {}x{} table", rows, cols);

        let (x, y) = self.config.insert_origin;
        self.append(ctx, insert::table(x, y, rows, cols))
    }

    /// Ask for a chart type, then insert a chart of sample data.
    pub async fn insert_chart<C: PresentationContext, P: Prompter>(
        &mut self,
        ctx: &mut C,
        prompter: &P,
    ) -> Result<ElementId> {
        let chart_type = insert::chart_type_choice(&prompter.prompt(CHART_PROMPT).await);

        let (x, y) = self.config.insert_origin;
        self.append(ctx, insert::chart(x, y, chart_type))
    }

    /// Let the user pick an image and embed it once it has been read.
    pub async fn insert_image<C: PresentationContext, I: ImagePicker>(
        &mut self,
        ctx: &mut C,
        picker: &I,
    ) -> Result<Option<ElementId>> {
        let Some(path) = picker.pick_image().await else {
            log::debug!("Image picker dismissed");
            return Ok(None);
        };
        let source = insert::load_image(&path).await?;

        let (x, y) = self.config.insert_origin;
        self.append(ctx, insert::image(x, y, source)).map(Some)
    }

    // --- Shortcuts ---

    /// Start listening for formatting shortcuts on `hub`.
    pub fn activate(&self, hub: &KeyboardHub) -> Subscription {
        hub.subscribe(resolve_shortcut)
    }

    pub fn run_shortcut<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        action: ShortcutAction,
    ) -> Result<()> {
        match action {
            ShortcutAction::ToggleBold => self.toggle_bold(ctx, selection),
            ShortcutAction::ToggleItalic => self.toggle_italic(ctx, selection),
            ShortcutAction::ToggleUnderline => self.toggle_underline(ctx, selection),
            ShortcutAction::Align(alignment) => self.set_alignment(ctx, selection, alignment),
        }
    }

    /// Route a key press through `hub`. Returns false when no shortcut
    /// claimed it.
    pub fn handle_key<C: PresentationContext>(
        &mut self,
        hub: &KeyboardHub,
        ctx: &mut C,
        selection: Option<&TextSelection>,
        event: &KeyEvent,
    ) -> Result<bool> {
        match hub.dispatch(event) {
            Some(action) => {
                self.run_shortcut(ctx, selection, action)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- Slide access ---

    /// Run `edit` on the text frame the selection points into and commit
    /// the changed element list. `None` when that element is gone or not
    /// editable.
    fn edit_region<C, T>(
        &mut self,
        ctx: &mut C,
        selection: &TextSelection,
        edit: impl FnOnce(&mut TextFrame) -> Result<T>,
    ) -> Result<Option<T>>
    where
        C: PresentationContext,
    {
        let index = ctx.current_slide();
        let mut elements = current_slide_elements(&*ctx, index)?.to_vec();

        let Some(frame) = elements
            .iter_mut()
            .find(|e| e.id == selection.element)
            .and_then(SlideElement::text_frame_mut)
        else {
            log::debug!(
                "Element {} on slide {} is not an editable region",
                selection.element,
                index
            );
            return Ok(None);
        };

        let result = edit(frame)?;
        ctx.update_slide(index, SlideUpdate::elements(elements))?;
        Ok(Some(result))
    }

    /// Append a new element to the current slide.
    fn append<C: PresentationContext>(
        &mut self,
        ctx: &mut C,
        (geometry, kind): (Geometry, ElementKind),
    ) -> Result<ElementId> {
        let index = ctx.current_slide();
        let existing = current_slide_elements(&*ctx, index)?;

        for element in existing {
            self.ids.observe(element.id);
        }
        let element = SlideElement::new(self.ids.next_id()?, geometry, kind);
        let id = element.id;
        let element_type = element.element_type();

        let mut elements = Vec::with_capacity(existing.len() + 1);
        elements.extend_from_slice(existing);
        elements.push(element);
        ctx.update_slide(index, SlideUpdate::elements(elements))?;

        log::info!("Inserted {} {} on slide {}", element_type, id, index);
        Ok(id)
    }
}

fn current_slide_elements<C: PresentationContext>(ctx: &C, index: usize) -> Result<&[SlideElement]> {
    let slides = ctx.slides();
    slides
        .get(index)
        .map(|slide| slide.elements.as_slice())
        .ok_or(Error::SlideOutOfRange {
            index,
            len: slides.len(),
        })
}
