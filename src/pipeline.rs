//! Extraction pipeline orchestration
//!
//! [`Pipeline::run`] takes one source document through the whole chain:
//! obtain its text (markup conversion and tree extraction for `hwp`, an
//! external text extractor for `pdf`), tag the text, count content nouns,
//! rank them and format the word list. Stages run one after another; each
//! one consumes the previous stage's complete output.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::document::{
    Document, SourceFormat, base_name, extract_document_with_diagnostics, is_markup_file,
    parse_markup, validate_source,
};
use crate::error::PipelineError;
use crate::terms::{
    MecabClassifier, RankedTerm, TermClassifier, TermFilter, aggregate_with, flatten,
    format_ranking, rank,
};

/// Converts a binary word-processor document into HWPML markup.
#[async_trait]
pub trait MarkupConverter: Send + Sync {
    async fn convert(&self, path: &Path) -> Result<String, PipelineError>;
}

/// Reads the text of each page of a PDF document.
#[async_trait]
pub trait PdfTextSource: Send + Sync {
    async fn pages(&self, path: &Path) -> Result<Vec<String>, PipelineError>;
}

/// Converter that runs `<command> <args...> <path>` and reads markup from stdout.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    command: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

#[async_trait]
impl MarkupConverter for CommandConverter {
    async fn convert(&self, path: &Path) -> Result<String, PipelineError> {
        let conversion_error = |message: String| PipelineError::Conversion {
            path: path.to_path_buf(),
            message,
        };

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| conversion_error(format!("{}: {e}", self.command)))?;

        if !output.status.success() {
            return Err(conversion_error(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        String::from_utf8(output.stdout).map_err(|e| conversion_error(e.to_string()))
    }
}

/// PDF text source backed by poppler's `pdftotext`.
#[derive(Debug, Clone)]
pub struct PdftotextSource {
    command: String,
}

impl PdftotextSource {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for PdftotextSource {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

#[async_trait]
impl PdfTextSource for PdftotextSource {
    async fn pages(&self, path: &Path) -> Result<Vec<String>, PipelineError> {
        let extraction_error = |message: String| PipelineError::PdfExtraction {
            path: path.to_path_buf(),
            message,
        };

        let output = Command::new(&self.command)
            .args(["-enc", "UTF-8"])
            .arg(path)
            .arg("-")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| extraction_error(format!("{}: {e}", self.command)))?;

        if !output.status.success() {
            return Err(extraction_error(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Split `pdftotext` output on form feeds. The feed after the last page does not start a new page.
pub fn split_pages(text: &str) -> Vec<String> {
    let text = text.strip_suffix('\u{c}').unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\u{c}').map(str::to_string).collect()
}

/// Read an `hwp`-format source into a document tree.
///
/// `.hml` files are parsed directly; anything else goes through `converter`.
pub async fn load_document(
    path: &Path,
    converter: Option<&dyn MarkupConverter>,
) -> Result<Document, PipelineError> {
    let markup = if is_markup_file(path) {
        tokio::fs::read_to_string(path).await?
    } else {
        let converter = converter.ok_or_else(|| PipelineError::Conversion {
            path: path.to_path_buf(),
            message: "no markup converter configured (set converter_command)".to_string(),
        })?;
        converter.convert(path).await?
    };
    Ok(parse_markup(&markup)?)
}

/// Everything produced for one source document.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub base_name: String,
    pub format: SourceFormat,
    /// Raw text handed to the classifier
    pub contents: String,
    pub ranking: Vec<RankedTerm>,
    /// `ranking` formatted one `"<term> : <count> \r\n"` line per term
    pub word_list: String,
}

impl PipelineOutput {
    pub fn content_file_name(&self) -> String {
        format!("{}-{}-extracted-content.txt", self.base_name, self.format.tag())
    }

    pub fn word_list_file_name(&self) -> String {
        format!("{}-{}-word-list.txt", self.base_name, self.format.tag())
    }
}

/// Result of writing both output files. A failed write never undoes the other.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The extraction pipeline with its external collaborators.
pub struct Pipeline {
    classifier: Box<dyn TermClassifier>,
    pdf_source: Box<dyn PdfTextSource>,
    converter: Option<Box<dyn MarkupConverter>>,
    filter: TermFilter,
}

impl Pipeline {
    /// Create a pipeline around an already initialized classifier.
    pub fn new(classifier: Box<dyn TermClassifier>, pdf_source: Box<dyn PdfTextSource>) -> Self {
        Self {
            classifier,
            pdf_source,
            converter: None,
            filter: TermFilter::default(),
        }
    }

    pub fn with_converter(mut self, converter: Box<dyn MarkupConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_filter(mut self, filter: TermFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Build the command-backed pipeline described by `config`.
    ///
    /// The tagger is initialized here, once, before the pipeline can be used.
    pub async fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let mut classifier =
            MecabClassifier::new(config.mecab_command.clone(), config.mecab_args.clone());
        classifier.initialize().await?;

        let mut pipeline = Pipeline::new(
            Box::new(classifier),
            Box::new(PdftotextSource::new(config.pdftotext_command.clone())),
        );
        if let Some(command) = &config.converter_command {
            pipeline = pipeline.with_converter(Box::new(CommandConverter::new(
                command.clone(),
                config.converter_args.clone(),
            )));
        }
        Ok(pipeline)
    }

    /// Read an `hwp`-format source into a document tree.
    pub async fn load_document(&self, path: &Path) -> Result<Document, PipelineError> {
        load_document(path, self.converter.as_deref()).await
    }

    /// Obtain the raw text of a source document.
    pub async fn extract_text(
        &self,
        path: &Path,
        format: SourceFormat,
    ) -> Result<String, PipelineError> {
        match format {
            SourceFormat::Hwp => {
                let document = self.load_document(path).await?;
                let extraction = extract_document_with_diagnostics(&document);
                if !extraction.anomalies.is_empty() {
                    warn!(
                        path = %path.display(),
                        anomalies = extraction.anomalies.len(),
                        "document contained nodes without extractable text"
                    );
                }
                Ok(extraction.text)
            }
            SourceFormat::Pdf => {
                let pages = self.pdf_source.pages(path).await?;
                debug!(pages = pages.len(), "pdf text extracted");
                Ok(pages.join(" "))
            }
        }
    }

    /// Tag `text` and rank its content nouns.
    pub async fn rank_text(&self, text: &str) -> Result<Vec<RankedTerm>, PipelineError> {
        let sentences = self.classifier.classify(text).await?;
        let tokens = flatten(sentences);
        let table = aggregate_with(&self.filter, &tokens);
        debug!(tokens = tokens.len(), terms = table.len(), "tokens aggregated");
        Ok(rank(&table))
    }

    /// Run the whole chain for one document.
    pub async fn run(
        &self,
        path: &Path,
        format: SourceFormat,
    ) -> Result<PipelineOutput, PipelineError> {
        validate_source(path, format).map_err(|e| PipelineError::InvalidSource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        info!(path = %path.display(), %format, "extracting text");
        let contents = self.extract_text(path, format).await?;
        let ranking = self.rank_text(&contents).await?;
        let word_list = format_ranking(&ranking);

        info!("extracted word count : {}", ranking.len());

        Ok(PipelineOutput {
            base_name: base_name(path),
            format,
            contents,
            ranking,
            word_list,
        })
    }
}

/// Write the extracted text and the word list into `dir`.
///
/// Each failure is logged and reported; the other file is still written.
pub async fn write_outputs(output: &PipelineOutput, dir: &Path) -> WriteReport {
    let mut report = WriteReport::default();

    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        error!(dir = %dir.display(), "failed to create output directory: {e}");
    }

    let files = [
        (output.content_file_name(), &output.contents),
        (output.word_list_file_name(), &output.word_list),
    ];
    for (name, contents) in files {
        let path = dir.join(name);
        match tokio::fs::write(&path, contents.as_bytes()).await {
            Ok(()) => {
                info!("created {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                error!(path = %path.display(), "failed to write output: {e}");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_on_form_feed() {
        assert_eq!(split_pages("one\u{c}two\u{c}"), vec!["one", "two"]);
        assert_eq!(split_pages("single"), vec!["single"]);
        assert!(split_pages("").is_empty());
    }

    #[test]
    fn test_output_file_names() {
        let output = PipelineOutput {
            base_name: "report".to_string(),
            format: SourceFormat::Pdf,
            contents: String::new(),
            ranking: Vec::new(),
            word_list: String::new(),
        };
        assert_eq!(output.content_file_name(), "report-pdf-extracted-content.txt");
        assert_eq!(output.word_list_file_name(), "report-pdf-word-list.txt");
    }
}
