//! HWPML markup reader
//!
//! Reads the XML markup produced by the binary-to-markup converter and builds
//! the document tree. The XML is first read into a generic element tree with
//! quick-xml, then mapped onto [`Document`] so that absent elements simply
//! become absent fields.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use super::extract::MAX_TABLE_DEPTH;
use super::models::*;
use crate::error::MarkupError;

/// Deepest element nesting kept from the markup. Each table level takes six
/// elements (`P/TEXT/TABLE/ROW/CELL/PARALIST`), so this stays above what the
/// extractor descends into. Anything deeper is dropped while reading.
pub const MAX_ELEMENT_DEPTH: usize = 8 * MAX_TABLE_DEPTH;

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Parse HWPML markup into a [`Document`].
pub fn parse_markup(xml: &str) -> Result<Document, MarkupError> {
    let root = read_element_tree(xml)?;
    if root.name != "HWPML" {
        return Err(MarkupError::MissingRoot);
    }

    let title = root
        .child("HEAD")
        .and_then(|head| head.child("DOCSUMMARY"))
        .and_then(|summary| summary.child("TITLE"))
        .map(|title| title.text.trim().to_string())
        .filter(|title| !title.is_empty());

    let sections = root
        .children_named("BODY")
        .flat_map(|body| body.children_named("SECTION"))
        .map(|section| Section {
            paragraphs: section.children_named("P").map(map_paragraph).collect(),
        })
        .collect();

    Ok(Document { title, sections })
}

fn map_paragraph(p: &Element) -> Paragraph {
    let runs = p
        .children_named("TEXT")
        .flat_map(|text| text.children.iter())
        .filter_map(|child| match child.name.as_str() {
            "CHAR" => Some(map_char(child)),
            "TABLE" => Some(Run::table(map_table(child))),
            _ => None,
        })
        .collect();
    Paragraph::new(runs)
}

fn map_char(ch: &Element) -> Run {
    if ch.attributes.is_empty() && ch.children.is_empty() {
        // Whitespace-only character data counts as empty
        if ch.text.trim().is_empty() {
            return Run::literal("");
        }
        return Run::literal(ch.text.clone());
    }

    let inner = if ch.text.trim().is_empty() {
        None
    } else {
        Some(ch.text.clone())
    };
    Run::annotated(ch.attributes.clone(), inner)
}

fn map_table(table: &Element) -> Table {
    let rows = table
        .children_named("ROW")
        .map(|row| Row::new(row.children_named("CELL").map(map_cell).collect()))
        .collect();
    Table::new(rows)
}

fn map_cell(cell: &Element) -> Cell {
    let paragraphs: Option<Vec<Paragraph>> = cell.child("PARALIST").and_then(|list| {
        let paragraphs: Vec<Paragraph> = list.children_named("P").map(map_paragraph).collect();
        (!paragraphs.is_empty()).then_some(paragraphs)
    });
    Cell { paragraphs }
}

fn read_element_tree(xml: &str) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    // Open elements inside a subtree that is being dropped for depth
    let mut skipped = 0usize;

    loop {
        let event = reader.read_event();
        if skipped > 0 {
            match event {
                Ok(Event::Start(_)) => skipped += 1,
                Ok(Event::End(_)) => skipped -= 1,
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(&reader, e)),
                _ => {}
            }
            continue;
        }

        match event {
            Ok(Event::Start(ref e)) => {
                if stack.len() >= MAX_ELEMENT_DEPTH {
                    warn!(
                        depth = stack.len(),
                        position = reader.buffer_position() as u64,
                        "markup nested too deep, skipping subtree"
                    );
                    skipped = 1;
                    continue;
                }
                stack.push(start_element(e, &reader)?);
            }
            Ok(Event::Empty(ref e)) => {
                if stack.len() >= MAX_ELEMENT_DEPTH {
                    continue;
                }
                let element = start_element(e, &reader)?;
                attach(element, &mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut root);
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape().map_err(|err| xml_error(&reader, err))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }

    if skipped > 0 {
        return Err(MarkupError::Xml {
            position: reader.buffer_position() as u64,
            message: "unclosed element in skipped subtree".to_string(),
        });
    }

    if let Some(open) = stack.last() {
        return Err(MarkupError::Xml {
            position: reader.buffer_position() as u64,
            message: format!("unclosed element <{}>", open.name),
        });
    }

    root.ok_or(MarkupError::MissingRoot)
}

fn start_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, MarkupError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in e.attributes() {
        let attribute = attribute.map_err(|err| xml_error(reader, err))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| xml_error(reader, err))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> MarkupError {
    MarkupError::Xml {
        position: reader.error_position() as u64,
        message: err.to_string(),
    }
}
