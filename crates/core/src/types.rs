//! Domain types for the presentation content being polished.

use serde::{Deserialize, Serialize};

/// The smallest unit of independently styled text within a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// Font size in hundredths of a point. `0` means unset (inherited).
    pub font_size_hundredths: i64,

    /// Solid fill color as six hex digits without `#`. `None` means
    /// inherited.
    pub fill_color_hex: Option<String>,

    /// Latin font family name, if explicitly set on the run.
    pub font_family: Option<String>,
}

impl TextRun {
    /// Create a run with an explicit font size in hundredths of a point.
    pub fn with_size(font_size_hundredths: i64) -> Self {
        Self {
            font_size_hundredths,
            ..Self::default()
        }
    }
}

/// One page of the deck, holding runs in depth-first document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number within the deck.
    pub number: usize,

    /// Text runs in document order.
    pub runs: Vec<TextRun>,
}

impl Slide {
    /// Create an empty slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            runs: Vec::new(),
        }
    }

    /// Append a run to this slide.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }
}

/// An ordered sequence of slides, built from the presentation's
/// slide-reference list. References that fail to resolve to a slide
/// part are skipped when the deck is constructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }
}
