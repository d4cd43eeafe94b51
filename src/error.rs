//! Error types for the extraction pipeline.
//!
//! Structural anomalies inside a document tree are never errors; they are
//! absorbed by the extractor. The types here cover failures of the external
//! collaborators, which abort processing of the current document.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading converted markup into a [`crate::Document`].
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The XML reader rejected the input.
    #[error("Malformed markup at byte {position}: {message}")]
    Xml {
        /// Byte offset reported by the reader.
        position: u64,
        /// A description of the failure.
        message: String,
    },

    /// The document does not start with an `HWPML` element.
    #[error("Missing HWPML root element")]
    MissingRoot,
}

/// Errors raised by a term classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The tagger could not be started or did not answer its version check.
    #[error("Classifier initialization failed ({command}): {message}")]
    Initialization {
        /// The command used to launch the tagger.
        command: String,
        /// A description of the failure.
        message: String,
    },

    /// The tagger ran but did not produce usable output.
    #[error("Tagging failed ({command}): {message}")]
    Tagging {
        /// The command used to launch the tagger.
        command: String,
        /// A description of the failure.
        message: String,
    },

    /// `classify` was called before `initialize`.
    #[error("Classifier used before initialization")]
    NotInitialized,
}

/// Terminal failures for one document.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source file does not exist or has the wrong extension.
    #[error("Invalid source {path}: {message}")]
    InvalidSource {
        /// The offending path.
        path: PathBuf,
        /// A description of the problem.
        message: String,
    },

    /// Binary-to-markup conversion failed.
    #[error("Conversion failed for {path}: {message}")]
    Conversion {
        /// The document being converted.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// PDF text extraction failed.
    #[error("PDF text extraction failed for {path}: {message}")]
    PdfExtraction {
        /// The document being read.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// The converted markup could not be parsed.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// The term classifier failed.
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    /// Reading the source file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
