//! DOCX extraction: body paragraphs with heading markers, then tables.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

use super::ooxml::{Package, attribute};
use crate::error::{DocError, Result};
use crate::format::DocumentFormat;

const FORMAT: DocumentFormat = DocumentFormat::Docx;

/// Deepest heading level Word offers.
const MAX_HEADING_LEVEL: usize = 9;

/// A top-level paragraph of the document body.
#[derive(Debug, Clone, PartialEq)]
struct Paragraph {
    text: String,
    style_id: Option<String>,
}

/// Rows of cells, each cell being the text of its paragraphs.
type Table = Vec<Vec<String>>;

#[derive(Debug, Default)]
struct Body {
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
}

pub fn extract(content: &[u8]) -> Result<String> {
    let mut package = Package::open(FORMAT, content)?;
    let document = package.read_part("word/document.xml")?;
    let styles = match package.read_optional_part("word/styles.xml")? {
        Some(xml) => parse_style_names(&xml)?,
        None => HashMap::new(),
    };

    let body = parse_body(&document)?;
    log::debug!(
        "DOCX body has {} paragraphs and {} tables",
        body.paragraphs.len(),
        body.tables.len()
    );

    let mut text_parts = Vec::new();

    for paragraph in &body.paragraphs {
        let text = paragraph.text.trim();
        if text.is_empty() {
            continue;
        }

        let style_name = paragraph
            .style_id
            .as_deref()
            .map(|id| styles.get(id).cloned().unwrap_or_else(|| id.to_string()));

        match style_name.as_deref().and_then(heading_level) {
            Some(level) => text_parts.push(format!("{} {}", "#".repeat(level), text)),
            None => text_parts.push(text.to_string()),
        }
    }

    for table in &body.tables {
        if table.is_empty() {
            continue;
        }
        let rows: Vec<String> = table
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.trim())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect();
        text_parts.push(format!("Table:\n{}", rows.join("\n")));
    }

    Ok(text_parts.join("\n\n"))
}

/// Heading level for a paragraph style name, or `None` for non-headings.
///
/// `"Heading"` alone is level 1. A numeric suffix gives the level, kept
/// within Word's 1..=9; a suffix that is not a number falls back to level 1.
pub fn heading_level(style_name: &str) -> Option<usize> {
    let suffix = style_name.strip_prefix("Heading")?.trim();
    if suffix.is_empty() {
        return Some(1);
    }
    Some(
        suffix
            .parse::<usize>()
            .map_or(1, |level| level.clamp(1, MAX_HEADING_LEVEL)),
    )
}

/// Map built-in style names, stored lowercase in styles.xml, to the names
/// Word shows in its UI.
fn ui_style_name(name: &str) -> String {
    if let Some(level) = name.strip_prefix("heading ") {
        return format!("Heading {}", level);
    }
    match name {
        "heading" => "Heading".to_string(),
        "title" => "Title".to_string(),
        "caption" => "Caption".to_string(),
        _ => name.to_string(),
    }
}

/// Parse `word/styles.xml` into a style-id to style-name map.
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"style" => {
                current_id = attribute(&e, b"styleId", FORMAT)?;
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"name" => {
                if let (Some(id), Some(name)) = (&current_id, attribute(&e, b"val", FORMAT)?) {
                    names.insert(id.clone(), ui_style_name(&name));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"style" => {
                current_id = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocError::processing(FORMAT, e)),
            _ => {}
        }
    }

    Ok(names)
}

/// Walks `word/document.xml`, collecting body paragraphs and top-level tables.
#[derive(Default)]
struct BodyParser {
    body: Body,
    /// Nesting depth of `w:tbl` elements.
    table_depth: usize,
    /// Nesting depth of `w:p` elements; text boxes nest paragraphs.
    paragraph_depth: usize,
    in_text: bool,
    paragraph: String,
    style_id: Option<String>,
    table: Table,
    row: Vec<String>,
    cell: Vec<String>,
}

impl BodyParser {
    /// Whether character data belongs to the paragraph being collected.
    fn collecting(&self) -> bool {
        self.paragraph_depth == 1 && self.table_depth <= 1
    }

    fn start(&mut self, element: &BytesStart<'_>) -> Result<()> {
        match element.local_name().as_ref() {
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table.clear();
                }
            }
            b"tr" if self.table_depth == 1 => self.row.clear(),
            b"tc" if self.table_depth == 1 => self.cell.clear(),
            b"p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.paragraph.clear();
                    self.style_id = None;
                }
            }
            b"t" if self.collecting() => self.in_text = true,
            _ => self.empty(element)?,
        }
        Ok(())
    }

    fn empty(&mut self, element: &BytesStart<'_>) -> Result<()> {
        if !self.collecting() {
            return Ok(());
        }
        match element.local_name().as_ref() {
            b"pStyle" => self.style_id = attribute(element, b"val", FORMAT)?,
            b"tab" => self.paragraph.push('\t'),
            b"br" | b"cr" => self.paragraph.push('\n'),
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.in_text && self.collecting() {
            self.paragraph.push_str(text);
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"t" => self.in_text = false,
            b"p" => {
                if self.paragraph_depth == 1 {
                    let text = std::mem::take(&mut self.paragraph);
                    match self.table_depth {
                        0 => self.body.paragraphs.push(Paragraph {
                            text,
                            style_id: self.style_id.take(),
                        }),
                        1 => self.cell.push(text),
                        _ => {}
                    }
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"tc" if self.table_depth == 1 => {
                let cell = std::mem::take(&mut self.cell).join("\n");
                self.row.push(cell);
            }
            b"tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.row);
                self.table.push(row);
            }
            b"tbl" => {
                if self.table_depth == 1 {
                    let table = std::mem::take(&mut self.table);
                    self.body.tables.push(table);
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }
}

fn parse_body(xml: &str) -> Result<Body> {
    let mut reader = Reader::from_str(xml);
    let mut parser = BodyParser::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => parser.start(&e)?,
            Ok(Event::Empty(e)) => parser.empty(&e)?,
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| DocError::processing(FORMAT, e))?;
                parser.text(&text);
            }
            Ok(Event::CData(e)) => parser.text(&String::from_utf8_lossy(&e)),
            Ok(Event::End(e)) => parser.end(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocError::processing(FORMAT, e)),
            _ => {}
        }
    }

    Ok(parser.body)
}
