//! Core data structures for document representation
//!
//! This module defines the document tree produced from converted markup:
//! sections of paragraphs, paragraphs of runs, and runs that carry either
//! inline text or an embedded table whose cells hold further paragraphs.

use serde::{Deserialize, Serialize};

/// Root of a parsed markup document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: Option<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub paragraphs: Vec<Paragraph>,
}

/// Any node of the document tree.
///
/// The extractor accepts every variant, so callers can linearize a single
/// table or cell as easily as a whole paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentNode {
    Paragraph(Paragraph),
    Run(Run),
    Table(Table),
    Row(Row),
    Cell(Cell),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

/// Smallest addressable unit of paragraph content.
///
/// `payload` is `None` for runs that carry neither text nor a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub payload: Option<RunPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunPayload {
    Text(TextPayload),
    Table(Table),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextPayload {
    /// Plain character data with no markup of its own.
    Literal(String),
    /// Character data wrapped in an element that carries attributes.
    Annotated(AnnotatedText),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedText {
    pub attributes: Vec<(String, String)>,
    pub inner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// A table cell. `paragraphs` is `None` when the cell has no paragraph list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub paragraphs: Option<Vec<Paragraph>>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }
}

impl Run {
    pub fn empty() -> Self {
        Self { payload: None }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            payload: Some(RunPayload::Text(TextPayload::Literal(text.into()))),
        }
    }

    pub fn annotated(attributes: Vec<(String, String)>, inner: Option<String>) -> Self {
        Self {
            payload: Some(RunPayload::Text(TextPayload::Annotated(AnnotatedText {
                attributes,
                inner,
            }))),
        }
    }

    pub fn table(table: Table) -> Self {
        Self {
            payload: Some(RunPayload::Table(table)),
        }
    }
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

impl Cell {
    pub fn with_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs: Some(paragraphs),
        }
    }

    pub fn empty() -> Self {
        Self { paragraphs: None }
    }
}

impl From<Paragraph> for DocumentNode {
    fn from(paragraph: Paragraph) -> Self {
        DocumentNode::Paragraph(paragraph)
    }
}

impl From<Table> for DocumentNode {
    fn from(table: Table) -> Self {
        DocumentNode::Table(table)
    }
}
