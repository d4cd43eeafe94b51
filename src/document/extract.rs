//! Text extraction from the document tree
//!
//! Linearizes paragraphs, runs and nested tables into a single string in
//! document order. Extraction is total: a node with missing or unexpected
//! content contributes nothing and is reported as an [`Anomaly`] instead of
//! failing the whole document.

use tracing::warn;

use super::models::*;

/// Deepest table-in-cell nesting that is still descended into.
pub const MAX_TABLE_DEPTH: usize = 64;

/// Delimiter appended after a bare literal run.
const LINE_BREAK: char = '\n';
/// Delimiter between runs, after each table cell and after each section.
const WORD_BREAK: char = ' ';

/// A node that was skipped during extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Anomaly {
    /// An annotated text run had no inner literal to unwrap.
    MissingInnerLiteral { attributes: Vec<(String, String)> },
    /// A table cell sat deeper than [`MAX_TABLE_DEPTH`] nested tables.
    NestingTooDeep { depth: usize },
}

/// Extracted text together with every degraded contribution met on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub anomalies: Vec<Anomaly>,
}

/// Extract the text of any document node.
pub fn extract(node: &DocumentNode) -> String {
    extract_with_diagnostics(node).text
}

/// Extract the text of a node and keep the anomalies that were logged.
pub fn extract_with_diagnostics(node: &DocumentNode) -> Extraction {
    let mut extractor = Extractor::default();
    let text = match node {
        DocumentNode::Paragraph(paragraph) => extractor.paragraph(paragraph, 0),
        DocumentNode::Run(run) => extractor.run(run, 0),
        DocumentNode::Table(table) => extractor.table(table, 0),
        DocumentNode::Row(row) => extractor.row(row, 0),
        DocumentNode::Cell(cell) => extractor.cell(cell, 0),
    };
    Extraction {
        text,
        anomalies: extractor.anomalies,
    }
}

/// Extract a paragraph list, concatenating paragraphs without a separator.
pub fn extract_paragraphs(paragraphs: &[Paragraph]) -> String {
    Extractor::default().paragraphs(paragraphs, 0)
}

/// Extract a whole document. Every section is followed by a single space.
pub fn extract_document(document: &Document) -> String {
    extract_document_with_diagnostics(document).text
}

pub fn extract_document_with_diagnostics(document: &Document) -> Extraction {
    let mut extractor = Extractor::default();
    let mut text = String::new();
    for section in &document.sections {
        text.push_str(&extractor.paragraphs(&section.paragraphs, 0));
        text.push(WORD_BREAK);
    }
    Extraction {
        text,
        anomalies: extractor.anomalies,
    }
}

#[derive(Default)]
struct Extractor {
    anomalies: Vec<Anomaly>,
}

impl Extractor {
    fn report(&mut self, anomaly: Anomaly) {
        match &anomaly {
            Anomaly::MissingInnerLiteral { attributes } => {
                warn!(?attributes, "annotated text without inner literal, skipping run");
            }
            Anomaly::NestingTooDeep { depth } => {
                warn!(depth, "table nesting too deep, skipping cell");
            }
        }
        self.anomalies.push(anomaly);
    }

    fn paragraphs(&mut self, paragraphs: &[Paragraph], depth: usize) -> String {
        paragraphs
            .iter()
            .map(|paragraph| self.paragraph(paragraph, depth))
            .collect()
    }

    fn paragraph(&mut self, paragraph: &Paragraph, depth: usize) -> String {
        let mut text = String::new();
        for run in &paragraph.runs {
            let contribution = self.run(run, depth);
            if contribution.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(WORD_BREAK);
            }
            text.push_str(&contribution);
        }
        text
    }

    fn run(&mut self, run: &Run, depth: usize) -> String {
        match &run.payload {
            Some(RunPayload::Text(payload)) => self.text(payload),
            Some(RunPayload::Table(table)) => self.table(table, depth),
            None => String::new(),
        }
    }

    fn text(&mut self, payload: &TextPayload) -> String {
        match payload {
            TextPayload::Literal(value) => {
                let mut text = String::with_capacity(value.len() + 1);
                text.push_str(value);
                text.push(LINE_BREAK);
                text
            }
            TextPayload::Annotated(AnnotatedText {
                inner: Some(inner), ..
            }) => inner.clone(),
            TextPayload::Annotated(AnnotatedText {
                attributes,
                inner: None,
            }) => {
                self.report(Anomaly::MissingInnerLiteral {
                    attributes: attributes.clone(),
                });
                String::new()
            }
        }
    }

    fn table(&mut self, table: &Table, depth: usize) -> String {
        table.rows.iter().map(|row| self.row(row, depth)).collect()
    }

    fn row(&mut self, row: &Row, depth: usize) -> String {
        row.cells.iter().map(|cell| self.cell(cell, depth)).collect()
    }

    fn cell(&mut self, cell: &Cell, depth: usize) -> String {
        let Some(paragraphs) = &cell.paragraphs else {
            return String::new();
        };

        let depth = depth + 1;
        if depth > MAX_TABLE_DEPTH {
            self.report(Anomaly::NestingTooDeep { depth });
            return String::new();
        }

        let mut text = self.paragraphs(paragraphs, depth);
        text.push(WORD_BREAK);
        text
    }
}
