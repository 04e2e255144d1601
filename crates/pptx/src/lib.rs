//! PPTX (Office Open XML) package adapter for typography polishing.
//!
//! Exposes a presentation as an ordered deck of slides whose text runs
//! can be read, mutated, and written back into the zip container.

pub mod package;
mod parser;
mod writer;

pub use package::{PackageMode, PptxPackage};
