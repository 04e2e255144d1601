//! Pure per-run rule decisions.
//!
//! These functions never mutate anything; the mode controller decides
//! whether a positive decision is only counted (analyze) or also
//! applied (apply).

use crate::types::TextRun;

/// Outcome of evaluating the minimum-font-size rule for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizeDecision {
    /// Whether the run's size must change.
    pub adjust: bool,

    /// The size to coerce the run to, in hundredths of a point.
    pub new_size: i64,
}

/// Outcome of evaluating the fill-color rule for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDecision {
    /// Whether the run's fill must change.
    pub adjust: bool,

    /// The target fill as hex digits without `#`, when adjusting.
    pub new_color: Option<String>,
}

/// Decide whether a run's font size falls below the threshold.
///
/// An unset size (`0`) always qualifies, matching the inherited-size
/// case where the effective size is unknown.
pub fn evaluate_font_size(run: &TextRun, threshold_hundredths: i64) -> FontSizeDecision {
    FontSizeDecision {
        adjust: run.font_size_hundredths < threshold_hundredths,
        new_size: threshold_hundredths,
    }
}

/// Decide whether a run's fill differs from the target color.
///
/// With no target the rule is disabled and never adjusts. Comparison
/// strips any leading `#` and ignores ASCII case; a run without an
/// explicit fill always counts as differing.
pub fn evaluate_color(run: &TextRun, target_hex: Option<&str>) -> ColorDecision {
    let Some(target) = target_hex else {
        return ColorDecision {
            adjust: false,
            new_color: None,
        };
    };

    let target = target.trim_start_matches('#');
    let matches = run
        .fill_color_hex
        .as_deref()
        .map(|current| current.trim_start_matches('#').eq_ignore_ascii_case(target))
        .unwrap_or(false);

    ColorDecision {
        adjust: !matches,
        new_color: Some(target.to_string()),
    }
}
