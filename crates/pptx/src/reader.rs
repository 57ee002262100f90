//! PPTX deck reader.
//!
//! Reads a deck back into a structural summary: slide order, slide size,
//! text boxes with their paragraphs and positions, and each slide's
//! background. Used to verify rendered output.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Background of a slide as found in its `p:bg` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BackgroundSummary {
    /// No explicit background; the master's applies.
    Inherited,
    /// Solid `RRGGBB` fill.
    Solid { color: String },
    /// Picture fill; `media` is the resolved part name, e.g. `ppt/media/image1.png`.
    Image { media: String },
}

/// A text box on a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextBoxSummary {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    /// Paragraph texts in reading order; in-paragraph breaks are `\n`.
    pub paragraphs: Vec<String>,
    /// Whether the paragraphs carry bullet characters.
    pub bulleted: bool,
}

/// A slide read back from a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideSummary {
    /// 1-based position in the deck.
    pub number: usize,
    pub background: BackgroundSummary,
    pub text_boxes: Vec<TextBoxSummary>,
}

impl SlideSummary {
    /// All paragraphs of all text boxes, flattened.
    pub fn texts(&self) -> Vec<&str> {
        self.text_boxes
            .iter()
            .flat_map(|b| b.paragraphs.iter().map(String::as_str))
            .collect()
    }
}

/// Structural summary of a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub slide_width: i64,
    pub slide_height: i64,
    pub slides: Vec<SlideSummary>,
}

/// Reader for PPTX decks.
pub struct DeckReader;

impl DeckReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a deck from any seekable reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let presentation = self.read_file_from_archive(&mut archive, "ppt/presentation.xml")?;
        let (slide_rel_ids, slide_width, slide_height) = parse_presentation(&presentation)?;

        let rels = self.read_file_from_archive(&mut archive, "ppt/_rels/presentation.xml.rels")?;
        let targets = parse_relationships(&rels)?;

        let mut slides = Vec::with_capacity(slide_rel_ids.len());
        for (index, rel_id) in slide_rel_ids.iter().enumerate() {
            let target = targets.get(rel_id).ok_or_else(|| {
                Error::Xml(format!("Slide relationship '{}' has no target", rel_id))
            })?;
            let slide_path = resolve_target("ppt", target);
            slides.push(self.read_slide(&mut archive, &slide_path, index + 1)?);
        }

        Ok(DeckSummary {
            slide_width,
            slide_height,
            slides,
        })
    }

    /// Read a deck from bytes in memory.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<DeckSummary> {
        self.read(std::io::Cursor::new(bytes))
    }

    fn read_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        number: usize,
    ) -> Result<SlideSummary> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let (background, text_boxes) = parse_slide(&content)?;

        let background = match background {
            ParsedBackground::Image { rel_id } => {
                let (dir, file) = slide_path.rsplit_once('/').unwrap_or(("", slide_path));
                let rels_path = format!("{}/_rels/{}.rels", dir, file);
                let rels = self.read_file_from_archive(archive, &rels_path)?;
                let targets = parse_relationships(&rels)?;
                let target = targets.get(&rel_id).ok_or_else(|| {
                    Error::Xml(format!("Background relationship '{}' has no target", rel_id))
                })?;
                BackgroundSummary::Image {
                    media: resolve_target(dir, target),
                }
            }
            ParsedBackground::Solid(color) => BackgroundSummary::Solid { color },
            ParsedBackground::None => BackgroundSummary::Inherited,
        };

        Ok(SlideSummary {
            number,
            background,
            text_boxes,
        })
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

enum ParsedBackground {
    None,
    Solid(String),
    Image { rel_id: String },
}

/// Slide relationship ids in `sldIdLst` order, plus the slide size.
fn parse_presentation(xml: &str) -> Result<(Vec<String>, i64, i64)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut rel_ids = Vec::new();
    let (mut width, mut height) = (0, 0);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sldId" => {
                    if let Some(id) = attribute(e, b"r:id") {
                        rel_ids.push(id);
                    }
                }
                b"sldSz" => {
                    width = attribute(e, b"cx").and_then(|v| v.parse().ok()).unwrap_or(0);
                    height = attribute(e, b"cy").and_then(|v| v.parse().ok()).unwrap_or(0);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing presentation: {}", e))),
            _ => {}
        }
    }

    Ok((rel_ids, width, height))
}

/// Map relationship ids to targets.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing relationships: {}", e))),
            _ => {}
        }
    }

    Ok(targets)
}

/// Background and text boxes of a slide part.
fn parse_slide(xml: &str) -> Result<(ParsedBackground, Vec<TextBoxSummary>)> {
    let mut reader = Reader::from_str(xml);

    let mut background = ParsedBackground::None;
    let mut boxes = Vec::new();

    let mut in_background = false;
    let mut current: Option<TextBoxSummary> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"bg" => in_background = true,
                b"sp" => current = Some(TextBoxSummary::default()),
                b"p" if current.is_some() => paragraph = Some(String::new()),
                b"t" if paragraph.is_some() => in_text = true,
                // a:br carries run properties, so it is usually a start tag
                b"br" => push_break(&mut paragraph),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"srgbClr" if in_background => {
                    if let Some(color) = attribute(e, b"val") {
                        background = ParsedBackground::Solid(color);
                    }
                }
                b"blip" if in_background => {
                    if let Some(rel_id) = attribute(e, b"r:embed") {
                        background = ParsedBackground::Image { rel_id };
                    }
                }
                b"off" => {
                    if let Some(shape) = current.as_mut() {
                        shape.x = attribute(e, b"x").and_then(|v| v.parse().ok()).unwrap_or(0);
                        shape.y = attribute(e, b"y").and_then(|v| v.parse().ok()).unwrap_or(0);
                    }
                }
                b"ext" => {
                    if let Some(shape) = current.as_mut() {
                        shape.cx = attribute(e, b"cx").and_then(|v| v.parse().ok()).unwrap_or(0);
                        shape.cy = attribute(e, b"cy").and_then(|v| v.parse().ok()).unwrap_or(0);
                    }
                }
                b"buChar" => {
                    if let Some(shape) = current.as_mut() {
                        shape.bulleted = true;
                    }
                }
                b"br" => push_break(&mut paragraph),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(text) = paragraph.as_mut() {
                        let unescaped = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Bad text in slide: {}", e)))?;
                        text.push_str(&unescaped);
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"bg" => in_background = false,
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(shape), Some(text)) = (current.as_mut(), paragraph.take()) {
                        shape.paragraphs.push(text);
                    }
                }
                b"sp" => {
                    if let Some(shape) = current.take() {
                        boxes.push(shape);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing slide: {}", e))),
            _ => {}
        }
    }

    Ok((background, boxes))
}

fn push_break(paragraph: &mut Option<String>) {
    if let Some(text) = paragraph.as_mut() {
        text.push('\n');
    }
}

/// Value of an attribute by its qualified name.
fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
