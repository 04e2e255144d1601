//! Read-side XML parsing: slide reference list, relationships, and
//! per-slide text runs.
//!
//! Namespace prefixes vary in the wild, so element matching works on
//! local names throughout.

use polisher_core::{Error, Result, TextRun};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Extract the ordered `r:id` list from `p:sldIdLst` in
/// `ppt/presentation.xml`.
pub(crate) fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // `id` (the numeric slide id) and `r:id` (the part
                // reference) are distinct attributes; only the latter
                // resolves to a slide part.
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r:id" {
                        ids.push(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing presentation part: {}", e)));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Parse a `.rels` part into an Id -> Target map.
pub(crate) fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut rels = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                if !id.is_empty() && !target.is_empty() {
                    rels.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Extract the text runs of one slide, in depth-first document order.
///
/// One `a:r` element contributes one run: `a:rPr/@sz` is the size in
/// hundredths of a point (absent means unset), the first
/// `a:solidFill/a:srgbClr/@val` directly under `a:rPr` is the fill, and
/// `a:latin/@typeface` is the font family. `a:endParaRPr` carries no
/// run and is ignored.
pub(crate) fn parse_slide_runs(xml: &str) -> Result<Vec<TextRun>> {
    let mut reader = Reader::from_str(xml);
    let mut runs = Vec::new();

    // Stack of open element local names, used to tell a run's own
    // solidFill apart from fills elsewhere (shape fills, highlights,
    // underline fills).
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<TextRun> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let local = local_name(e.name().as_ref()).to_vec();

                if local == b"r" && current.is_none() {
                    current = Some(TextRun::default());
                } else if let Some(run) = current.as_mut() {
                    read_run_property(e, &local, &stack, run);
                }

                stack.push(local);
            }
            Ok(Event::Empty(ref e)) => {
                let local = local_name(e.name().as_ref()).to_vec();

                if local == b"r" && current.is_none() {
                    // A childless run still participates in counting.
                    runs.push(TextRun::default());
                } else if let Some(run) = current.as_mut() {
                    read_run_property(e, &local, &stack, run);
                }
            }
            Ok(Event::End(_)) => {
                if let Some(local) = stack.pop() {
                    if local == b"r" {
                        if let Some(run) = current.take() {
                            runs.push(run);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(runs)
}

/// Capture one styling property from an element inside an open run.
fn read_run_property(e: &BytesStart, local: &[u8], stack: &[Vec<u8>], run: &mut TextRun) {
    let parent = stack.last().map(|n| n.as_slice());

    match local {
        b"rPr" if parent == Some(b"r") => {
            for attr in e.attributes().flatten() {
                if attr.key.as_ref() == b"sz" {
                    if let Ok(size) = String::from_utf8_lossy(&attr.value).parse::<i64>() {
                        run.font_size_hundredths = size;
                    }
                }
            }
        }
        b"srgbClr" if parent == Some(b"solidFill") && grandparent(stack) == Some(b"rPr") => {
            if run.fill_color_hex.is_none() {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"val" {
                        run.fill_color_hex =
                            Some(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
        }
        b"latin" if parent == Some(b"rPr") => {
            for attr in e.attributes().flatten() {
                if attr.key.as_ref() == b"typeface" {
                    run.font_family = Some(String::from_utf8_lossy(&attr.value).to_string());
                }
            }
        }
        _ => {}
    }
}

fn grandparent(stack: &[Vec<u8>]) -> Option<&[u8]> {
    if stack.len() < 2 {
        return None;
    }
    Some(stack[stack.len() - 2].as_slice())
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
