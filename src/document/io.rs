//! File selection and validation
//!
//! This module finds candidate documents in the target directory and checks
//! that a chosen file matches the requested source format.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported source formats.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Word-processor documents, converted to HWPML markup before extraction
    Hwp,
    /// PDF documents, read through an external text extractor
    Pdf,
}

impl SourceFormat {
    /// Short tag used in output file names.
    pub fn tag(self) -> &'static str {
        match self {
            SourceFormat::Hwp => "hwp",
            SourceFormat::Pdf => "pdf",
        }
    }

    /// Extensions accepted for this format. `.hml` is already-converted markup.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SourceFormat::Hwp => &["hwp", "hml"],
            SourceFormat::Pdf => &["pdf"],
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = lowercase_extension(path)?;
        [SourceFormat::Hwp, SourceFormat::Pdf]
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    pub fn matches(self, path: &Path) -> bool {
        lowercase_extension(path).is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Whether the file is already-converted markup rather than a binary document.
pub fn is_markup_file(path: &Path) -> bool {
    lowercase_extension(path).as_deref() == Some("hml")
}

/// List the files in `dir` that match `format`, sorted by file name.
///
/// The directory is created when it does not exist yet.
pub fn list_candidates(dir: &Path, format: SourceFormat) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && format.matches(&path) {
            candidates.push(path);
        }
    }
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(candidates)
}

/// File name with its last extension removed (`report.v2.hwp` -> `report.v2`).
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Validates that the file exists and carries an extension of `format`
pub fn validate_source(path: &Path, format: SourceFormat) -> Result<()> {
    if !format.matches(path) {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        bail!(
            "Invalid file format. Expected .{} file, got .{}\n\
            Note: supported extensions for {} are {}",
            format.tag(),
            extension,
            format,
            format.extensions().join(", ")
        );
    }

    if !path.is_file() {
        bail!("File not found: {}", path.display());
    }

    Ok(())
}
