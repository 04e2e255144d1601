//! Error types for the typography polisher.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while polishing a presentation.
///
/// All of these are terminal for the invocation: the CLI reports the
/// message on stderr and exits non-zero, with no retry or partial
/// recovery.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The input presentation path does not exist.
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    /// An explicitly given rules path does not exist or is unreadable.
    #[error("Rules file not found: {0}")]
    RulesNotFound(String),

    /// The rules file was read but could not be parsed as a JSON object.
    #[error("Malformed rules file: {0}")]
    MalformedRules(String),

    /// The input package lacks the expected presentation structure.
    #[error("Presentation part not found: {0}")]
    MissingPresentationPart(String),

    /// Attempted to persist a document that was opened read-only.
    #[error("Document opened read-only: {0}")]
    ReadOnlyDocument(String),

    /// ZIP container error.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing or serialization error.
    #[error("XML error: {0}")]
    Xml(String),
}
