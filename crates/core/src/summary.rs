//! The fixed-shape result record reported after a polishing pass.

use serde::Serialize;

/// Aggregated counts for one invocation.
///
/// Field declaration order is the serialized order; the renamed keys
/// are the tool's stable output contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of slides visited.
    #[serde(rename = "Slides")]
    pub slides: u64,

    /// Runs whose font size was (or would be) raised to the threshold.
    #[serde(rename = "AdjustedFontSize")]
    pub adjusted_font_size: u64,

    /// Runs whose fill was (or would be) set to the target color.
    #[serde(rename = "AdjustedColor")]
    pub adjusted_color: u64,
}

impl Summary {
    /// Serialize as the pretty-printed JSON record printed on success.
    pub fn to_pretty_json(&self) -> String {
        // Serialization of this shape cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
