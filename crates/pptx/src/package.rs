//! The PPTX package: zip container access, slide resolution, and the
//! [`DocumentAdapter`] implementation over it.

use crate::parser;
use crate::writer::{rewrite_slide_xml, RunEdit};
use polisher_core::{DocumentAdapter, Error, Result, TextRun};
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// Whether the package may be written back to disk.
///
/// Analyze mode opens read-only; only apply mode opens for write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageMode {
    ReadOnly,
    ReadWrite,
}

/// One resolved slide part with its parsed runs.
struct SlidePart {
    entry_name: String,
    runs: Vec<TextRun>,
    edits: Vec<RunEdit>,
}

/// An in-memory Office Open XML presentation package.
///
/// The whole archive is loaded up front; slide parts are parsed into
/// ordered runs, mutations accumulate in memory, and persistence
/// rewrites the affected entries and (for a file-backed package) the
/// container on disk.
pub struct PptxPackage {
    path: Option<PathBuf>,
    mode: PackageMode,
    // Entry order is preserved so a rewritten package keeps the
    // original part layout.
    entries: Vec<(String, Vec<u8>)>,
    slides: Vec<SlidePart>,
}

impl PptxPackage {
    /// Open a `.pptx` file in the given mode.
    pub fn open(path: &Path, mode: PackageMode) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::InputNotFound(path.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        let mut package = Self::from_reader(file)?;
        package.path = Some(path.to_path_buf());
        package.mode = mode;
        Ok(package)
    }

    /// Load a package from any seekable reader. The result has no
    /// backing file; use [`to_bytes`](Self::to_bytes) to serialize it.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| Error::Zip(format!("Failed to read archive entry: {}", e)))?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push((file.name().to_string(), data));
        }

        let mut package = Self {
            path: None,
            mode: PackageMode::ReadWrite,
            entries,
            slides: Vec::new(),
        };
        package.resolve_slides()?;
        Ok(package)
    }

    /// Build the ordered slide list from the presentation part.
    ///
    /// Slide references that do not resolve to an existing part are
    /// skipped silently; a missing presentation part is fatal.
    fn resolve_slides(&mut self) -> Result<()> {
        let presentation = self
            .entry_str(PRESENTATION_PART)?
            .ok_or_else(|| Error::MissingPresentationPart(PRESENTATION_PART.to_string()))?;
        let slide_ids = parser::parse_slide_id_list(&presentation)?;

        let relationships = match self.entry_str(PRESENTATION_RELS)? {
            Some(xml) => parser::parse_relationships(&xml)?,
            None => Default::default(),
        };

        for id in slide_ids {
            let Some(target) = relationships.get(&id) else {
                log::debug!("Slide reference {} has no relationship, skipping", id);
                continue;
            };

            let entry_name = resolve_target(target);
            let Some(xml) = self.entry_str(&entry_name)? else {
                log::debug!("Slide part {} not found in archive, skipping", entry_name);
                continue;
            };

            let runs = parser::parse_slide_runs(&xml)?;
            let edits = vec![RunEdit::default(); runs.len()];
            self.slides.push(SlidePart {
                entry_name,
                runs,
                edits,
            });
        }

        log::debug!("Resolved {} slides", self.slides.len());
        Ok(())
    }

    fn entry_str(&self, name: &str) -> Result<Option<String>> {
        let Some((_, data)) = self.entries.iter().find(|(n, _)| n == name) else {
            return Ok(None);
        };
        let text = std::str::from_utf8(data)
            .map_err(|_| Error::Xml(format!("Part {} is not valid UTF-8", name)))?;
        Ok(Some(text.to_string()))
    }

    fn set_entry(&mut self, name: &str, data: Vec<u8>) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = data;
        }
    }

    /// Serialize the package into zip bytes, preserving entry order.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_archive(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    fn write_archive<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options =
            FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (name, data) in &self.entries {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::Zip(format!("Failed to write entry {}: {}", name, e)))?;
            zip.write_all(data)?;
        }

        zip.finish()
            .map_err(|e| Error::Zip(format!("Failed to finalize archive: {}", e)))?;
        Ok(())
    }
}

impl DocumentAdapter for PptxPackage {
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
        let part = &mut self.slides[slide];
        part.runs[run].font_size_hundredths = hundredths;
        part.edits[run].size = true;
    }

    fn set_fill_color(&mut self, slide: usize, run: usize, hex: &str) {
        let part = &mut self.slides[slide];
        part.runs[run].fill_color_hex = Some(hex.to_string());
        part.edits[run].fill = true;
    }

    fn set_font_family(&mut self, slide: usize, run: usize, family: &str) {
        let part = &mut self.slides[slide];
        part.runs[run].font_family = Some(family.to_string());
        part.edits[run].family = true;
    }

    fn persist_slide(&mut self, slide: usize) -> Result<()> {
        let part = &self.slides[slide];
        if !part.edits.iter().any(RunEdit::any) {
            return Ok(());
        }

        let name = part.entry_name.clone();
        let xml = self
            .entry_str(&name)?
            .ok_or_else(|| Error::Zip(format!("Slide part {} disappeared", name)))?;

        let rewritten = rewrite_slide_xml(&xml, &part.runs, &part.edits)?;
        self.set_entry(&name, rewritten);

        let part = &mut self.slides[slide];
        for edit in &mut part.edits {
            *edit = RunEdit::default();
        }

        log::debug!("Persisted slide part {}", name);
        Ok(())
    }

    fn persist_document(&mut self) -> Result<()> {
        if self.mode == PackageMode::ReadOnly {
            return Err(Error::ReadOnlyDocument(
                "refusing to persist the package".to_string(),
            ));
        }

        if let Some(path) = &self.path {
            let file = File::create(path)?;
            self.write_archive(file)?;
            log::debug!("Wrote package to {}", path.display());
        }

        Ok(())
    }
}

/// Resolve a relationship target against the `ppt/` base.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("ppt/{}", target)
    }
}
