//! Write-side XML rewriting: stream a slide part through untouched,
//! replacing only the run properties of edited runs.
//!
//! Replacement mirrors the usual DOM approach: the `sz` attribute is
//! rewritten in place, while an edited fill or font family drops the
//! existing `a:solidFill` / `a:latin` children and appends fresh ones
//! at the end of `a:rPr`. A run without `a:rPr` gets one synthesized
//! as its first child.

use crate::parser::local_name;
use polisher_core::{Error, Result, TextRun};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Which of a run's properties were changed since the part was parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunEdit {
    pub size: bool,
    pub fill: bool,
    pub family: bool,
}

impl RunEdit {
    pub fn any(&self) -> bool {
        self.size || self.fill || self.family
    }
}

/// Rewrite one slide part, applying the edited runs' current state.
///
/// `runs` and `edits` are parallel to the document-order runs of the
/// original XML; everything outside edited run properties is copied
/// verbatim.
pub(crate) fn rewrite_slide_xml(xml: &str, runs: &[TextRun], edits: &[RunEdit]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    let mut run_index = 0usize;
    // Index of the run currently open, if any.
    let mut current: Option<usize> = None;
    // Namespace prefix of the current run element, e.g. "a:".
    let mut prefix = String::new();
    // Set right after an edited run opens, until its rPr is seen or
    // synthesized.
    let mut awaiting_rpr = false;
    // Between Start and End of an edited run's rPr.
    let mut in_edited_rpr = false;
    // Open-element depth below that rPr; replacements only displace
    // its direct children, never fills nested in kept children such
    // as a:ln or a:uFill.
    let mut rpr_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Xml(format!("Error rewriting slide: {}", e)))?;

        match event {
            Event::Eof => break,
            Event::Start(e) => {
                let local = local_name(e.name().as_ref()).to_vec();

                if local == b"r" && current.is_none() {
                    let index = run_index;
                    run_index += 1;
                    current = Some(index);
                    prefix = prefix_of(e.name().as_ref());
                    awaiting_rpr = edits.get(index).map(RunEdit::any).unwrap_or(false);
                    write(&mut writer, Event::Start(e))?;
                    continue;
                }

                if awaiting_rpr && local == b"rPr" {
                    awaiting_rpr = false;
                    in_edited_rpr = true;
                    rpr_depth = 0;
                    let index = current.unwrap_or_default();
                    let rewritten = rewrite_rpr_start(&e, &runs[index], &edits[index]);
                    write(&mut writer, Event::Start(rewritten))?;
                    continue;
                }

                if awaiting_rpr {
                    // First element child is not rPr: synthesize one
                    // before it, then continue normally.
                    awaiting_rpr = false;
                    let index = current.unwrap_or_default();
                    write_full_rpr(&mut writer, &prefix, &runs[index], &edits[index])?;
                }

                if in_edited_rpr {
                    let index = current.unwrap_or_default();
                    if rpr_depth == 0 && should_drop_child(&local, &edits[index]) {
                        reader
                            .read_to_end(e.name())
                            .map_err(|e| Error::Xml(format!("Error rewriting slide: {}", e)))?;
                        continue;
                    }
                    rpr_depth += 1;
                }

                write(&mut writer, Event::Start(e))?;
            }
            Event::Empty(e) => {
                let local = local_name(e.name().as_ref()).to_vec();

                if local == b"r" && current.is_none() {
                    let index = run_index;
                    run_index += 1;
                    let edit = edits.get(index).copied().unwrap_or_default();
                    if edit.any() {
                        // Expand the childless run so it can carry the
                        // synthesized properties.
                        let run_prefix = prefix_of(e.name().as_ref());
                        let end = BytesEnd::new(
                            String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        );
                        write(&mut writer, Event::Start(e))?;
                        write_full_rpr(&mut writer, &run_prefix, &runs[index], &edit)?;
                        write(&mut writer, Event::End(end))?;
                    } else {
                        write(&mut writer, Event::Empty(e))?;
                    }
                    continue;
                }

                if awaiting_rpr && local == b"rPr" {
                    awaiting_rpr = false;
                    let index = current.unwrap_or_default();
                    let rewritten = rewrite_rpr_start(&e, &runs[index], &edits[index]);
                    let end =
                        BytesEnd::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    write(&mut writer, Event::Start(rewritten))?;
                    inject_children(&mut writer, &prefix, &runs[index], &edits[index])?;
                    write(&mut writer, Event::End(end))?;
                    continue;
                }

                if awaiting_rpr {
                    awaiting_rpr = false;
                    let index = current.unwrap_or_default();
                    write_full_rpr(&mut writer, &prefix, &runs[index], &edits[index])?;
                }

                if in_edited_rpr {
                    let index = current.unwrap_or_default();
                    if rpr_depth == 0 && should_drop_child(&local, &edits[index]) {
                        continue;
                    }
                }

                write(&mut writer, Event::Empty(e))?;
            }
            Event::End(e) => {
                let local = local_name(e.name().as_ref()).to_vec();

                if in_edited_rpr {
                    if rpr_depth == 0 && local == b"rPr" {
                        in_edited_rpr = false;
                        let index = current.unwrap_or_default();
                        inject_children(&mut writer, &prefix, &runs[index], &edits[index])?;
                    } else {
                        rpr_depth = rpr_depth.saturating_sub(1);
                    }
                    write(&mut writer, Event::End(e))?;
                    continue;
                }

                if local == b"r" && current.is_some() {
                    if awaiting_rpr {
                        // The run had no element children at all.
                        awaiting_rpr = false;
                        let index = current.unwrap_or_default();
                        write_full_rpr(&mut writer, &prefix, &runs[index], &edits[index])?;
                    }
                    current = None;
                }

                write(&mut writer, Event::End(e))?;
            }
            other => write(&mut writer, other)?,
        }
    }

    Ok(writer.into_inner())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(format!("Error writing slide: {}", e)))
}

/// An edited fill or family drops the corresponding original direct
/// children of rPr; replacements are appended when the rPr closes.
fn should_drop_child(local: &[u8], edit: &RunEdit) -> bool {
    (local == b"solidFill" && edit.fill) || (local == b"latin" && edit.family)
}

/// Copy an rPr start tag, rewriting the `sz` attribute when the size
/// was edited.
fn rewrite_rpr_start(original: &BytesStart, run: &TextRun, edit: &RunEdit) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(original.name().as_ref()).into_owned();
    let mut element = BytesStart::new(name);

    for attr in original.attributes().flatten() {
        if edit.size && attr.key.as_ref() == b"sz" {
            continue;
        }
        element.push_attribute(attr);
    }

    if edit.size && run.font_size_hundredths > 0 {
        element.push_attribute(("sz", run.font_size_hundredths.to_string().as_str()));
    }

    element
}

/// Emit a complete rPr element for a run that had none.
fn write_full_rpr(
    writer: &mut Writer<Vec<u8>>,
    prefix: &str,
    run: &TextRun,
    edit: &RunEdit,
) -> Result<()> {
    let name = format!("{}rPr", prefix);
    let mut start = BytesStart::new(name.clone());
    if edit.size && run.font_size_hundredths > 0 {
        start.push_attribute(("sz", run.font_size_hundredths.to_string().as_str()));
    }

    write(writer, Event::Start(start))?;
    inject_children(writer, prefix, run, edit)?;
    write(writer, Event::End(BytesEnd::new(name)))
}

/// Append the replacement solidFill / latin children.
fn inject_children(
    writer: &mut Writer<Vec<u8>>,
    prefix: &str,
    run: &TextRun,
    edit: &RunEdit,
) -> Result<()> {
    if edit.fill {
        if let Some(hex) = &run.fill_color_hex {
            let fill_name = format!("{}solidFill", prefix);
            write(writer, Event::Start(BytesStart::new(fill_name.clone())))?;

            let mut color = BytesStart::new(format!("{}srgbClr", prefix));
            color.push_attribute(("val", hex.as_str()));
            write(writer, Event::Empty(color))?;

            write(writer, Event::End(BytesEnd::new(fill_name)))?;
        }
    }

    if edit.family {
        if let Some(family) = &run.font_family {
            let mut latin = BytesStart::new(format!("{}latin", prefix));
            latin.push_attribute(("typeface", family.as_str()));
            write(writer, Event::Empty(latin))?;
        }
    }

    Ok(())
}

/// Namespace prefix (with trailing colon) of a qualified name.
fn prefix_of(name: &[u8]) -> String {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => String::from_utf8_lossy(&name[..pos + 1]).into_owned(),
        None => String::new(),
    }
}
