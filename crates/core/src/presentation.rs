//! Slides and the presentation context the ribbon edits through.

use crate::{Color, ElementId, Error, Result, SlideElement};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A single slide and the elements placed on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub elements: Vec<SlideElement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,

    /// Speaker notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: ElementId) -> Option<&SlideElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Replace every field that the update carries.
    pub fn merge(&mut self, update: SlideUpdate) {
        if let Some(elements) = update.elements {
            self.elements = elements;
        }
        if let Some(background) = update.background {
            self.background = background;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }
}

/// A partial set of slide fields to replace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlideUpdate {
    pub elements: Option<Vec<SlideElement>>,
    pub background: Option<Option<Color>>,
    pub notes: Option<Option<String>>,
}

impl SlideUpdate {
    pub fn elements(elements: Vec<SlideElement>) -> Self {
        Self {
            elements: Some(elements),
            ..Self::default()
        }
    }
}

/// Shared store of slides that the ribbon reads and commits to.
pub trait PresentationContext {
    fn slides(&self) -> &[Slide];

    /// Index of the slide being edited.
    fn current_slide(&self) -> usize;

    /// Merge `update` into the slide at `index`.
    fn update_slide(&mut self, index: usize, update: SlideUpdate) -> Result<()>;
}

/// An in-memory presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub current: usize,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Presentation {
    /// Create a presentation with one blank slide.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: vec![Slide::new()],
            current: 0,
        }
    }

    /// Create a presentation with `count` blank slides (at least one).
    pub fn with_slides(title: impl Into<String>, count: usize) -> Self {
        Self {
            title: title.into(),
            slides: vec![Slide::new(); count.max(1)],
            current: 0,
        }
    }

    pub fn add_slide(&mut self, slide: Slide) -> usize {
        self.slides.push(slide);
        self.slides.len() - 1
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Make `index` the slide being edited.
    pub fn select_slide(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let presentation: Self = serde_json::from_str(json)?;
        presentation.check_index(presentation.current)?;
        Ok(presentation)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let presentation = Self::from_json(&content)?;
        log::debug!(
            "Loaded {} slides from {}",
            presentation.slides.len(),
            path.as_ref().display()
        );
        Ok(presentation)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.to_json()? + "\n")?;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.slides.len() {
            Ok(())
        } else {
            Err(Error::SlideOutOfRange {
                index,
                len: self.slides.len(),
            })
        }
    }
}

impl PresentationContext for Presentation {
    fn slides(&self) -> &[Slide] {
        &self.slides
    }

    fn current_slide(&self) -> usize {
        self.current
    }

    fn update_slide(&mut self, index: usize, update: SlideUpdate) -> Result<()> {
        self.check_index(index)?;
        self.slides[index].merge(update);
        Ok(())
    }
}
