//! Rule configuration: the declarative rule set driving the polisher.
//!
//! The rules file is a flat JSON object with all keys optional. A key
//! that is absent or carries a wrong-typed / out-of-range value falls
//! back to its default silently; only a file-level parse failure is an
//! error.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Default minimum font size in points.
pub const DEFAULT_MIN_FONT_SIZE_PT: f64 = 18.0;

/// Default fill color applied to non-compliant runs.
pub const DEFAULT_FONT_COLOR: &str = "#333333";

/// Immutable parsed rule set with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    /// Minimum permitted font size in points. Always positive.
    pub min_font_size_pt: f64,

    /// Target fill color, normalized to a leading `#`. `None` disables
    /// the color rule entirely.
    pub default_font_color: Option<String>,

    /// Font family forced onto a run whenever its size is adjusted.
    /// `None` leaves font families untouched.
    pub default_font_name: Option<String>,

    /// Parsed and stored but currently inert; reserved for a future
    /// spacing rule.
    pub normalize_paragraph_spacing: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_font_size_pt: DEFAULT_MIN_FONT_SIZE_PT,
            default_font_color: Some(DEFAULT_FONT_COLOR.to_string()),
            default_font_name: None,
            normalize_paragraph_spacing: false,
        }
    }
}

impl RuleConfig {
    /// Load the rule set from an optional file path.
    ///
    /// `None` yields the default config. A path that cannot be read is
    /// `RulesNotFound`; contents that are not a JSON object are
    /// `MalformedRules`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            log::debug!("No rules file given, using default config");
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .map_err(|_| Error::RulesNotFound(path.display().to_string()))?;
        Self::from_json(&content)
    }

    /// Parse the rule set from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let payload: Value =
            serde_json::from_str(content).map_err(|e| Error::MalformedRules(e.to_string()))?;

        let map = match payload {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(Error::MalformedRules(
                    "expected a JSON object at the top level".to_string(),
                ))
            }
        };

        let mut config = Self::default();

        if let Some(value) = map.get("min_font_size_pt") {
            match value.as_f64() {
                Some(size) if size > 0.0 => config.min_font_size_pt = size,
                _ => log::warn!("Ignoring invalid min_font_size_pt: {}", value),
            }
        }

        if let Some(Value::String(color)) = map.get("default_font_color") {
            config.default_font_color = normalize_hex(color);
        }

        if let Some(Value::String(name)) = map.get("default_font_name") {
            if !name.trim().is_empty() {
                config.default_font_name = Some(name.clone());
            }
        }

        if let Some(Value::Bool(flag)) = map.get("normalize_paragraph_spacing") {
            config.normalize_paragraph_spacing = *flag;
        }

        Ok(config)
    }

    /// Minimum font size as hundredths of a point, rounded half away
    /// from zero.
    pub fn threshold_hundredths(&self) -> i64 {
        (self.min_font_size_pt * 100.0).round() as i64
    }

    /// Target color in stored form: hex digits without the leading `#`.
    pub fn target_color_hex(&self) -> Option<&str> {
        self.default_font_color
            .as_deref()
            .map(|c| c.trim_start_matches('#'))
    }
}

/// Normalize a color value by prefixing `#` when missing.
///
/// A blank value yields `None`, disabling the color rule. The hex
/// digits themselves are not validated.
fn normalize_hex(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with('#') {
        Some(value.to_string())
    } else {
        Some(format!("#{}", value))
    }
}
