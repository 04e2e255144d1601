//! Rule configuration, rule evaluation, and mode orchestration
//! for PPTX typography polishing.

pub mod controller;
pub mod engine;
pub mod error;
pub mod rules;
pub mod summary;
pub mod types;

pub use controller::{DocumentAdapter, Mode, ModeController};
pub use error::{Error, Result};
pub use rules::RuleConfig;
pub use summary::Summary;
pub use types::{Deck, Slide, TextRun};
