//! Mode orchestration: one traversal, two modes.
//!
//! Analyze and apply share the same walk and the same rule decisions;
//! they differ only in whether a positive decision mutates the run and
//! persists the slide. That shared path is what keeps the two modes'
//! counts in exact agreement.

use crate::engine::{evaluate_color, evaluate_font_size};
use crate::error::Result;
use crate::rules::RuleConfig;
use crate::summary::Summary;
use crate::types::{Deck, TextRun};

/// Whether an invocation only reports or also mutates.
///
/// Chosen once at startup and never changed mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Evaluate and count; never mutate or persist.
    Analyze,
    /// Evaluate, mutate non-compliant runs, persist affected slides.
    Apply,
}

/// Capability surface the controller needs from a document backend.
///
/// Slides and runs are addressed by position; both orders are fixed by
/// the backend (slide-reference list order, depth-first run order), so
/// repeated traversals of an unchanged document are deterministic.
pub trait DocumentAdapter {
    /// Number of slides in the deck.
    fn slide_count(&self) -> usize;

    /// Number of runs on the given slide.
    fn run_count(&self, slide: usize) -> usize;

    /// Read access to one run's current properties.
    fn run(&self, slide: usize, run: usize) -> &TextRun;

    /// Set a run's font size in hundredths of a point.
    fn set_font_size(&mut self, slide: usize, run: usize, hundredths: i64);

    /// Set a run's solid fill to the given hex digits (no `#`).
    fn set_fill_color(&mut self, slide: usize, run: usize, hex: &str);

    /// Set a run's latin font family.
    fn set_font_family(&mut self, slide: usize, run: usize, family: &str);

    /// Persist one slide's current state.
    fn persist_slide(&mut self, slide: usize) -> Result<()>;

    /// Persist the deck-level container after all slides.
    fn persist_document(&mut self) -> Result<()>;
}

/// In-memory adapter over a plain [`Deck`]; persistence is a no-op.
impl DocumentAdapter for Deck {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn run_count(&self, slide: usize) -> usize {
        self.slides[slide].runs.len()
    }

    fn run(&self, slide: usize, run: usize) -> &TextRun {
        &self.slides[slide].runs[run]
    }

    fn set_font_size(&mut self, slide: usize, run: usize, hundredths: i64) {
        self.slides[slide].runs[run].font_size_hundredths = hundredths;
    }

    fn set_fill_color(&mut self, slide: usize, run: usize, hex: &str) {
        self.slides[slide].runs[run].fill_color_hex = Some(hex.to_string());
    }

    fn set_font_family(&mut self, slide: usize, run: usize, family: &str) {
        self.slides[slide].runs[run].font_family = Some(family.to_string());
    }

    fn persist_slide(&mut self, _slide: usize) -> Result<()> {
        Ok(())
    }

    fn persist_document(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Walks the deck and applies the configured rules in one mode.
pub struct ModeController {
    config: RuleConfig,
    mode: Mode,
}

impl ModeController {
    /// Create a controller for the given config and mode.
    pub fn new(config: RuleConfig, mode: Mode) -> Self {
        Self { config, mode }
    }

    /// Process the whole deck in one pass and return the summary.
    pub fn run<A: DocumentAdapter>(&self, adapter: &mut A) -> Result<Summary> {
        let threshold = self.config.threshold_hundredths();
        let apply = self.mode == Mode::Apply;
        let mut summary = Summary::default();

        log::debug!(
            "Polishing {} slides (mode: {:?}, threshold: {})",
            adapter.slide_count(),
            self.mode,
            threshold
        );

        for slide in 0..adapter.slide_count() {
            summary.slides += 1;

            for index in 0..adapter.run_count(slide) {
                let size = evaluate_font_size(adapter.run(slide, index), threshold);
                if size.adjust {
                    summary.adjusted_font_size += 1;
                    if apply {
                        adapter.set_font_size(slide, index, size.new_size);
                        // Font-family override rides along with a size
                        // adjustment; it is not independently counted.
                        if let Some(name) = &self.config.default_font_name {
                            adapter.set_font_family(slide, index, name);
                        }
                    }
                }

                let color =
                    evaluate_color(adapter.run(slide, index), self.config.target_color_hex());
                if color.adjust {
                    summary.adjusted_color += 1;
                    if apply {
                        if let Some(hex) = &color.new_color {
                            adapter.set_fill_color(slide, index, hex);
                        }
                    }
                }
            }

            if apply {
                adapter.persist_slide(slide)?;
            }
        }

        if apply {
            adapter.persist_document()?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Slide;

    /// Wraps a deck and records every mutating call, so tests can
    /// assert that analyze mode touches nothing.
    struct RecordingAdapter {
        deck: Deck,
        mutations: usize,
        persisted_slides: Vec<usize>,
        document_persisted: bool,
    }

    impl RecordingAdapter {
        fn new(deck: Deck) -> Self {
            Self {
                deck,
                mutations: 0,
                persisted_slides: Vec::new(),
                document_persisted: false,
            }
        }
    }

    impl DocumentAdapter for RecordingAdapter {
        fn slide_count(&self) -> usize {
            self.deck.slide_count()
        }

        fn run_count(&self, slide: usize) -> usize {
            self.deck.run_count(slide)
        }

        fn run(&self, slide: usize, run: usize) -> &TextRun {
            self.deck.run(slide, run)
        }

        fn set_font_size(&mut self, slide: usize, run: usize, hundredths: i64) {
            self.mutations += 1;
            self.deck.set_font_size(slide, run, hundredths);
        }

        fn set_fill_color(&mut self, slide: usize, run: usize, hex: &str) {
            self.mutations += 1;
            self.deck.set_fill_color(slide, run, hex);
        }

        fn set_font_family(&mut self, slide: usize, run: usize, family: &str) {
            self.mutations += 1;
            self.deck.set_font_family(slide, run, family);
        }

        fn persist_slide(&mut self, slide: usize) -> Result<()> {
            self.persisted_slides.push(slide);
            Ok(())
        }

        fn persist_document(&mut self) -> Result<()> {
            self.document_persisted = true;
            Ok(())
        }
    }

    fn sample_deck() -> Deck {
        let mut deck = Deck::new();

        let mut slide1 = Slide::new(1);
        slide1.add_run(TextRun::with_size(1200)); // below threshold
        slide1.add_run(TextRun {
            font_size_hundredths: 2400,
            fill_color_hex: Some("333333".to_string()),
            font_family: None,
        }); // compliant
        deck.add_slide(slide1);

        let mut slide2 = Slide::new(2);
        slide2.add_run(TextRun::default()); // unset size, no fill
        deck.add_slide(slide2);

        deck
    }

    #[test]
    fn test_analyze_counts() {
        let mut deck = sample_deck();
        let controller = ModeController::new(RuleConfig::default(), Mode::Analyze);
        let summary = controller.run(&mut deck).unwrap();

        assert_eq!(summary.slides, 2);
        // Runs 1 and 3 are below the 1800 threshold.
        assert_eq!(summary.adjusted_font_size, 2);
        // Runs 1 (no fill) and 3 (no fill) differ from #333333.
        assert_eq!(summary.adjusted_color, 2);
    }

    #[test]
    fn test_analyze_never_mutates_or_persists() {
        let mut adapter = RecordingAdapter::new(sample_deck());
        let controller = ModeController::new(RuleConfig::default(), Mode::Analyze);
        controller.run(&mut adapter).unwrap();

        assert_eq!(adapter.mutations, 0);
        assert!(adapter.persisted_slides.is_empty());
        assert!(!adapter.document_persisted);
    }

    #[test]
    fn test_apply_persists_each_slide_then_document() {
        let mut adapter = RecordingAdapter::new(sample_deck());
        let controller = ModeController::new(RuleConfig::default(), Mode::Apply);
        controller.run(&mut adapter).unwrap();

        assert_eq!(adapter.persisted_slides, vec![0, 1]);
        assert!(adapter.document_persisted);
    }

    #[test]
    fn test_analyze_and_apply_agree_on_counts() {
        let deck = sample_deck();
        let config = RuleConfig::default();

        let mut analyzed = deck.clone();
        let analyze_summary = ModeController::new(config.clone(), Mode::Analyze)
            .run(&mut analyzed)
            .unwrap();

        let mut applied = deck;
        let apply_summary = ModeController::new(config, Mode::Apply)
            .run(&mut applied)
            .unwrap();

        assert_eq!(analyze_summary, apply_summary);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut deck = sample_deck();
        let config = RuleConfig::default();

        let first = ModeController::new(config.clone(), Mode::Apply)
            .run(&mut deck)
            .unwrap();
        assert!(first.adjusted_font_size > 0);

        let second = ModeController::new(config, Mode::Apply)
            .run(&mut deck)
            .unwrap();
        assert_eq!(second.slides, first.slides);
        assert_eq!(second.adjusted_font_size, 0);
        assert_eq!(second.adjusted_color, 0);
    }

    #[test]
    fn test_apply_coerces_to_exact_threshold() {
        let mut deck = Deck::new();
        let mut slide = Slide::new(1);
        slide.add_run(TextRun::with_size(1200));
        deck.add_slide(slide);

        ModeController::new(RuleConfig::default(), Mode::Apply)
            .run(&mut deck)
            .unwrap();

        assert_eq!(deck.slides[0].runs[0].font_size_hundredths, 1800);
        assert_eq!(
            deck.slides[0].runs[0].fill_color_hex.as_deref(),
            Some("333333")
        );
    }

    #[test]
    fn test_font_family_rides_along_with_size_adjustment() {
        let mut deck = Deck::new();
        let mut slide = Slide::new(1);
        slide.add_run(TextRun::with_size(1200)); // size adjusted
        slide.add_run(TextRun {
            font_size_hundredths: 2400,
            fill_color_hex: None,
            font_family: None,
        }); // only color adjusted
        deck.add_slide(slide);

        let config = RuleConfig {
            default_font_name: Some("Noto Sans JP".to_string()),
            ..RuleConfig::default()
        };
        ModeController::new(config, Mode::Apply)
            .run(&mut deck)
            .unwrap();

        assert_eq!(
            deck.slides[0].runs[0].font_family.as_deref(),
            Some("Noto Sans JP")
        );
        // No size adjustment, so the family stays untouched even though
        // the color rule fired.
        assert_eq!(deck.slides[0].runs[1].font_family, None);
    }

    #[test]
    fn test_color_rule_disabled_without_target() {
        let mut deck = sample_deck();
        let config = RuleConfig {
            default_font_color: None,
            ..RuleConfig::default()
        };
        let summary = ModeController::new(config, Mode::Analyze)
            .run(&mut deck)
            .unwrap();

        assert_eq!(summary.adjusted_color, 0);
        assert_eq!(summary.adjusted_font_size, 2);
    }

    #[test]
    fn test_zero_color_target_counts_absent_fill() {
        let mut deck = Deck::new();
        let mut slide = Slide::new(1);
        slide.add_run(TextRun {
            font_size_hundredths: 2400,
            fill_color_hex: None,
            font_family: None,
        });
        slide.add_run(TextRun {
            font_size_hundredths: 2400,
            fill_color_hex: Some("000000".to_string()),
            font_family: None,
        });
        deck.add_slide(slide);

        let config = RuleConfig {
            default_font_color: Some("#000000".to_string()),
            ..RuleConfig::default()
        };
        let summary = ModeController::new(config, Mode::Analyze)
            .run(&mut deck)
            .unwrap();

        // Absent fill counts; an exact (case-insensitive) match does not.
        assert_eq!(summary.adjusted_color, 1);
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = Deck::new();
        let summary = ModeController::new(RuleConfig::default(), Mode::Apply)
            .run(&mut deck)
            .unwrap();
        assert_eq!(summary, Summary::default());
    }
}
