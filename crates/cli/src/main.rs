//! CLI tool for inserting and formatting slide elements in a JSON deck.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ribbon_core::{
    Alignment, Color, ColorChoice, ElementId, ElementKind, ElementType, FixedPicker, FontSize,
    HighlightChoice, KeyEvent, KeyboardHub, ListStyle, Presentation, PresentationContext,
    PromptOutcome, Prompter, Range, Ribbon, RibbonHooks, ScriptedPrompter, SlideElement,
    TextSelection,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Insert and format elements on the slides of a JSON presentation.
#[derive(Parser, Debug)]
#[command(name = "ribbon")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new deck file
    New {
        deck: PathBuf,

        #[arg(short, long, default_value = "Untitled")]
        title: String,

        /// Number of blank slides
        #[arg(short, long, default_value = "1")]
        slides: usize,
    },

    /// List the slides and elements of a deck
    Show { deck: PathBuf },

    /// Insert an element on a slide
    Insert {
        deck: PathBuf,

        /// textbox, shape, image, chart, table or equation
        element: ElementType,

        /// Slide to insert on (default: the deck's current slide)
        #[arg(short, long)]
        slide: Option<usize>,

        /// Answer for the next prompt; prompts read stdin when none are given
        #[arg(short, long = "answer")]
        answers: Vec<String>,

        /// Image file for image elements
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Format the text of an element
    Format(FormatArgs),
}

#[derive(clap::Args, Debug)]
struct FormatArgs {
    deck: PathBuf,

    /// Id of the element to edit
    #[arg(short, long)]
    element: ElementId,

    #[arg(short, long)]
    slide: Option<usize>,

    /// Character range such as 0..5 (default: all text)
    #[arg(short, long, value_parser = parse_range)]
    range: Option<Range>,

    #[arg(long)]
    font: Option<String>,

    #[arg(long)]
    size: Option<FontSize>,

    #[arg(long)]
    bold: bool,

    #[arg(long)]
    italic: bool,

    #[arg(long)]
    underline: bool,

    #[arg(long)]
    strike: bool,

    #[arg(long, value_enum)]
    case: Option<CaseArg>,

    /// bullet, numeric, alphabetic, stars or arrows
    #[arg(long)]
    list: Option<ListStyle>,

    /// left, center, right or justify
    #[arg(long)]
    align: Option<Alignment>,

    /// Text color as #RGB or #RRGGBB
    #[arg(long)]
    color: Option<Color>,

    /// Highlight color, or "none" to clear it
    #[arg(long, value_parser = parse_highlight)]
    highlight: Option<HighlightChoice>,

    /// Keyboard shortcut to press, e.g. ctrl+b (repeatable)
    #[arg(short, long = "key")]
    keys: Vec<KeyEvent>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CaseArg {
    Upper,
    Lower,
}

fn parse_range(s: &str) -> std::result::Result<Range, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got '{}'", s))?;
    let start = start.trim().parse().map_err(|_| format!("bad start in '{}'", s))?;
    let end = end.trim().parse().map_err(|_| format!("bad end in '{}'", s))?;
    Ok(Range::new(start, end))
}

fn parse_highlight(s: &str) -> std::result::Result<HighlightChoice, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(HighlightChoice::None);
    }
    s.parse::<Color>()
        .map(HighlightChoice::Swatch)
        .map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::New {
            deck,
            title,
            slides,
        } => {
            let presentation = Presentation::with_slides(title, slides);
            save_deck(&presentation, &deck)?;
            println!("Created {} with {} slide(s)", deck.display(), presentation.slides.len());
        }
        Command::Show { deck } => {
            let presentation = load_deck(&deck)?;
            print!("{}", describe(&presentation));
        }
        Command::Insert {
            deck,
            element,
            slide,
            answers,
            image,
        } => {
            let mut presentation = load_deck(&deck)?;
            select(&mut presentation, slide)?;

            let picker = FixedPicker(image);
            let inserted = if answers.is_empty() {
                insert(&mut presentation, element, &StdinPrompter, &picker).await?
            } else {
                let prompter = ScriptedPrompter::new(answers);
                insert(&mut presentation, element, &prompter, &picker).await?
            };

            match inserted {
                Some(id) => {
                    save_deck(&presentation, &deck)?;
                    println!("{}", id);
                }
                None => eprintln!("No image selected; deck unchanged"),
            }
        }
        Command::Format(format) => {
            let mut presentation = load_deck(&format.deck)?;
            select(&mut presentation, format.slide)?;
            apply_format(&mut presentation, &format)?;
            save_deck(&presentation, &format.deck)?;
        }
    }

    Ok(())
}

async fn insert<P: Prompter>(
    presentation: &mut Presentation,
    element: ElementType,
    prompter: &P,
    picker: &FixedPicker,
) -> Result<Option<ElementId>> {
    if element == ElementType::Image && picker.0.is_none() {
        bail!("--image is required for image elements");
    }

    let mut ribbon = Ribbon::default();
    let inserted = ribbon
        .insert_element(presentation, element, prompter, picker)
        .await
        .with_context(|| format!("Failed to insert {}", element))?;
    Ok(inserted)
}

/// Run every requested formatting step against one element.
fn apply_format(presentation: &mut Presentation, args: &FormatArgs) -> Result<()> {
    let index = presentation.current_slide();
    let element = presentation.slides[index]
        .element(args.element)
        .with_context(|| format!("No element {} on slide {}", args.element, index))?;
    let text_len = element
        .text_frame()
        .map(|frame| frame.body.char_len())
        .unwrap_or(0);

    let mut selection = TextSelection::new(args.element, args.range.unwrap_or(Range::new(0, text_len)));
    let mut ribbon = Ribbon::default().with_hooks(
        RibbonHooks::new()
            .with_apply_format(|command| log::debug!("Forwarded {:?}", command))
            .with_format_changed(|change| log::info!("Font changed: {:?}", change)),
    );
    let ctx = presentation;

    if let Some(font) = &args.font {
        ribbon.set_font_family(ctx, Some(&selection), font)?;
    }
    if let Some(size) = args.size {
        ribbon.set_font_size(ctx, Some(&selection), size)?;
    }
    if args.bold {
        ribbon.toggle_bold(ctx, Some(&selection))?;
    }
    if args.italic {
        ribbon.toggle_italic(ctx, Some(&selection))?;
    }
    if args.underline {
        ribbon.toggle_underline(ctx, Some(&selection))?;
    }
    if args.strike {
        ribbon.toggle_strikethrough(ctx, Some(&selection))?;
    }
    if let Some(case) = args.case {
        let converted = match case {
            CaseArg::Upper => ribbon.to_uppercase(ctx, Some(&selection))?,
            CaseArg::Lower => ribbon.to_lowercase(ctx, Some(&selection))?,
        };
        if let Some(converted) = converted {
            selection = converted;
        }
    }
    if let Some(style) = args.list {
        ribbon.apply_list(ctx, Some(&selection), style)?;
        let len = current_text_len(ctx, args.element);
        selection.range = Range::new(selection.range.start.min(len), selection.range.end.min(len));
    }
    if let Some(alignment) = args.align {
        ribbon.set_alignment(ctx, Some(&selection), alignment)?;
    }
    if let Some(color) = args.color {
        ribbon.choose_text_color(ctx, Some(&selection), ColorChoice::Swatch(color))?;
    }
    if let Some(highlight) = args.highlight {
        ribbon.choose_highlight(ctx, Some(&selection), highlight)?;
    }

    if !args.keys.is_empty() {
        let hub = KeyboardHub::new();
        let _shortcuts = ribbon.activate(&hub);
        for key in &args.keys {
            if !ribbon.handle_key(&hub, ctx, Some(&selection), key)? {
                log::warn!("{:?} is not a formatting shortcut", key);
            }
        }
    }

    let state = ribbon.state();
    log::debug!(
        "Ribbon state: bold={} italic={} underline={} strike={} align={:?}",
        state.bold,
        state.italic,
        state.underline,
        state.strikethrough,
        state.alignment
    );
    Ok(())
}

fn current_text_len(presentation: &Presentation, id: ElementId) -> usize {
    presentation.slides[presentation.current_slide()]
        .element(id)
        .and_then(SlideElement::text_frame)
        .map(|frame| frame.body.char_len())
        .unwrap_or(0)
}

fn select(presentation: &mut Presentation, slide: Option<usize>) -> Result<()> {
    if let Some(index) = slide {
        presentation
            .select_slide(index)
            .with_context(|| format!("Cannot select slide {}", index))?;
    }
    Ok(())
}

fn load_deck(path: &Path) -> Result<Presentation> {
    Presentation::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save_deck(presentation: &Presentation, path: &Path) -> Result<()> {
    presentation
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Human-readable listing of a deck.
fn describe(presentation: &Presentation) -> String {
    let mut out = format!("{}\n", presentation.title);
    for (index, slide) in presentation.slides.iter().enumerate() {
        let marker = if index == presentation.current { " (current)" } else { "" };
        out.push_str(&format!("Slide {}{}\n", index, marker));

        for element in &slide.elements {
            let detail = match &element.kind {
                ElementKind::Textbox(frame) | ElementKind::Equation(frame) => {
                    format!("{:?} {:?}", frame.body.plain_text(), frame.body.alignment)
                }
                ElementKind::Table(grid) => format!("{}x{}", grid.rows, grid.cols),
                ElementKind::Chart(chart) => format!("{:?}", chart.chart_type),
                ElementKind::Image(image) => image.alt.clone(),
                ElementKind::Shape(shape) => shape.shape_type.clone(),
            };
            out.push_str(&format!(
                "  {} {:<8} {}\n",
                element.id,
                element.element_type().as_str(),
                detail
            ));
        }
    }
    out
}

/// Asks prompts on the terminal.
struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt(&self, message: &str) -> impl Future<Output = PromptOutcome> {
        let message = message.to_string();
        async move {
            let mut stdout = tokio::io::stdout();
            let shown = async {
                stdout.write_all(format!("{}\n> ", message).as_bytes()).await?;
                stdout.flush().await
            };
            if let Err(e) = shown.await {
                log::warn!("Failed to show prompt: {}", e);
            }

            let mut line = String::new();
            match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
                Ok(0) | Err(_) => PromptOutcome::Cancelled,
                Ok(_) => PromptOutcome::Confirmed(line.trim_end().to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ribbon_core::Primitive;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0..5").unwrap(), Range::new(0, 5));
        assert_eq!(parse_range(" 7 .. 2 ").unwrap(), Range::new(2, 7));
        assert!(parse_range("5").is_err());
        assert!(parse_range("a..3").is_err());
    }

    #[test]
    fn test_parse_highlight() {
        assert_eq!(parse_highlight("None").unwrap(), HighlightChoice::None);
        assert_eq!(
            parse_highlight("#ff0").unwrap(),
            HighlightChoice::Swatch(Color::from_hex(0xFFFF00))
        );
        assert!(parse_highlight("yellow").is_err());
    }

    #[test]
    fn test_format_whole_element_by_default() {
        let mut deck = Presentation::new("Deck");
        let id = Ribbon::default()
            .insert_primitive(&mut deck, Primitive::Textbox)
            .unwrap();

        let id_arg = id.to_string();
        let args = Args::try_parse_from([
            "ribbon", "format", "deck.json", "--element", &id_arg, "--bold", "--case", "upper",
            "--key", "ctrl+e",
        ])
        .unwrap();
        let Command::Format(format) = args.command else {
            panic!("expected format command");
        };
        apply_format(&mut deck, &format).unwrap();

        let body = &deck.slides[0].element(id).unwrap().text_frame().unwrap().body;
        assert_eq!(body.plain_text(), "NEW TEXT");
        assert!(body.runs.iter().all(|run| run.style.bold));
        assert_eq!(body.alignment, Alignment::Center);
    }

    #[test]
    fn test_describe_lists_elements() {
        let mut deck = Presentation::with_slides("Quarterly", 2);
        let id = Ribbon::default()
            .insert_primitive(&mut deck, Primitive::Shape)
            .unwrap();

        let listing = describe(&deck);
        assert!(listing.starts_with("Quarterly\nSlide 0 (current)\n"));
        assert!(listing.contains(&format!("  {} shape    rectangle\n", id)));
        assert!(listing.ends_with("Slide 1\n"));
    }
}
