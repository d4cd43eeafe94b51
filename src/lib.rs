//! termrank: ranked noun lists from word-processor and PDF documents
//!
//! This library linearizes a parsed word-processor document tree (paragraphs,
//! runs and nested tables) into plain text, hands that text to a
//! part-of-speech tagger and ranks the common and proper nouns it finds.

pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod terms;

// Re-export commonly used types
pub use document::{Document, DocumentNode, SourceFormat, extract, extract_document};
pub use error::{ClassifierError, MarkupError, PipelineError};
pub use pipeline::{Pipeline, PipelineOutput};
pub use terms::{ClassifiedToken, FrequencyTable, RankedTerm, Tag, aggregate, format_ranking, rank};
