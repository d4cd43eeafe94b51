//! Part-of-speech tagging boundary
//!
//! The tagger itself is an external collaborator. This module defines the
//! token types it produces, the [`TermClassifier`] trait the pipeline calls,
//! and a classifier backed by a mecab-ko process.

use std::convert::Infallible;
use std::fmt;
use std::process::Stdio;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::ClassifierError;

/// Grammatical category assigned by the tagger (Sejong tag set codes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// NNG: common noun
    CommonNoun,
    /// NNP: proper noun
    ProperNoun,
    /// NNB: dependent noun
    DependentNoun,
    /// NNM / NNBC: unit dependent noun
    UnitNoun,
    /// Any other category, kept by its code
    Other(String),
}

impl Tag {
    pub fn code(&self) -> &str {
        match self {
            Tag::CommonNoun => "NNG",
            Tag::ProperNoun => "NNP",
            Tag::DependentNoun => "NNB",
            Tag::UnitNoun => "NNM",
            Tag::Other(code) => code,
        }
    }
}

impl FromStr for Tag {
    type Err = Infallible;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Ok(match code {
            "NNG" => Tag::CommonNoun,
            "NNP" => Tag::ProperNoun,
            "NNB" => Tag::DependentNoun,
            "NNM" | "NNBC" => Tag::UnitNoun,
            other => Tag::Other(other.to_string()),
        })
    }
}

impl From<&str> for Tag {
    fn from(code: &str) -> Self {
        match code.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A surface form with the category the tagger gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedToken {
    pub surface: String,
    pub tag: Tag,
}

impl ClassifiedToken {
    pub fn new(surface: impl Into<String>, tag: impl Into<Tag>) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
        }
    }
}

/// Tokens of one whitespace-delimited word.
pub type SyntacticWord = Vec<ClassifiedToken>;
/// Words of one sentence.
pub type Sentence = Vec<SyntacticWord>;

/// Flatten sentence and word grouping into a single token sequence.
pub fn flatten(sentences: Vec<Sentence>) -> Vec<ClassifiedToken> {
    sentences.into_iter().flatten().flatten().collect()
}

#[async_trait]
pub trait TermClassifier: Send + Sync {
    /// Tag `text`, grouped by sentence and syntactic word.
    async fn classify(&self, text: &str) -> Result<Vec<Sentence>, ClassifierError>;
}

/// Classifier that returns a fixed result regardless of input.
#[derive(Debug, Clone, Default)]
pub struct StaticClassifier {
    sentences: Vec<Sentence>,
}

impl StaticClassifier {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// One sentence in which every token is its own word.
    pub fn from_tokens(tokens: Vec<ClassifiedToken>) -> Self {
        Self::new(vec![tokens.into_iter().map(|token| vec![token]).collect()])
    }
}

#[async_trait]
impl TermClassifier for StaticClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<Sentence>, ClassifierError> {
        Ok(self.sentences.clone())
    }
}

/// Classifier that pipes text through a mecab-ko process.
///
/// Construct it, then call [`MecabClassifier::initialize`] once before the
/// first [`TermClassifier::classify`] call.
#[derive(Debug, Clone)]
pub struct MecabClassifier {
    command: String,
    args: Vec<String>,
    initialized: bool,
}

impl MecabClassifier {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the tagger once with `--version` so that a missing installation fails before any text is sent.
    pub async fn initialize(&mut self) -> Result<(), ClassifierError> {
        if self.initialized {
            return Ok(());
        }

        let output = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.init_error(e))?;

        if !output.status.success() {
            return Err(self.init_error(String::from_utf8_lossy(&output.stderr).trim()));
        }

        info!(
            command = %self.command,
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "tagger initialized"
        );
        self.initialized = true;
        Ok(())
    }

    fn init_error(&self, message: impl fmt::Display) -> ClassifierError {
        ClassifierError::Initialization {
            command: self.command.clone(),
            message: message.to_string(),
        }
    }

    fn tagging_error(&self, message: impl fmt::Display) -> ClassifierError {
        ClassifierError::Tagging {
            command: self.command.clone(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl TermClassifier for MecabClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Sentence>, ClassifierError> {
        if !self.initialized {
            return Err(ClassifierError::NotInitialized);
        }

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.tagging_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.tagging_error("stdin unavailable"))?;
        let input = text.to_string();
        let write = async move {
            let result = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            result
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(|e| self.tagging_error(e))?;
        written.map_err(|e| self.tagging_error(e))?;

        if !output.status.success() {
            return Err(self.tagging_error(String::from_utf8_lossy(&output.stderr).trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sentences = parse_mecab_output(&stdout, text);
        debug!(sentences = sentences.len(), "tagging finished");
        Ok(sentences)
    }
}

/// Parse mecab output (`surface\tTAG,...` lines, `EOS` after each sentence).
///
/// Words are regrouped by walking `input` alongside the morphemes: whitespace
/// before a morpheme starts a new word. Multi-morpheme entries (`Inflect`,
/// `Preanalysis`) whose tag reads like `VV+EP+EF` are split into one token per
/// morpheme using the expression field.
pub fn parse_mecab_output(output: &str, input: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut sentence: Sentence = Vec::new();
    let mut word: SyntacticWord = Vec::new();
    let mut rest = input;

    for line in output.lines() {
        if line == "EOS" {
            if !word.is_empty() {
                sentence.push(std::mem::take(&mut word));
            }
            if !sentence.is_empty() {
                sentences.push(std::mem::take(&mut sentence));
            }
            continue;
        }

        let Some((surface, features)) = line.split_once('\t') else {
            continue;
        };

        let trimmed = rest.trim_start();
        if trimmed.len() != rest.len() && !word.is_empty() {
            sentence.push(std::mem::take(&mut word));
        }
        rest = trimmed.strip_prefix(surface).unwrap_or(trimmed);

        word.extend(morphemes(surface, features));
    }

    if !word.is_empty() {
        sentence.push(word);
    }
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
    sentences
}

/// Tokens for one mecab line.
fn morphemes(surface: &str, features: &str) -> Vec<ClassifiedToken> {
    let fields: Vec<&str> = features.split(',').collect();
    let tag = fields.first().copied().unwrap_or_default();
    if !tag.contains('+') {
        return vec![ClassifiedToken::new(surface, tag)];
    }

    // Expression field: `하/VV/*+았/EP/*+다/EF/*`
    let expanded: Option<Vec<ClassifiedToken>> = fields.get(7).and_then(|expression| {
        expression
            .split('+')
            .map(|part| {
                let mut pieces = part.split('/');
                let morpheme = pieces.next().filter(|m| !m.is_empty())?;
                let code = pieces.next().filter(|c| !c.is_empty())?;
                Some(ClassifiedToken::new(morpheme, code))
            })
            .collect()
    });

    expanded.unwrap_or_else(|| {
        let first = tag.split('+').next().unwrap_or_default();
        vec![ClassifiedToken::new(surface, first)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_codes() {
        assert_eq!(Tag::from("NNG"), Tag::CommonNoun);
        assert_eq!(Tag::from("NNP"), Tag::ProperNoun);
        assert_eq!(Tag::from("NNB"), Tag::DependentNoun);
        assert_eq!(Tag::from("NNBC"), Tag::UnitNoun);
        assert_eq!(Tag::from("JKS"), Tag::Other("JKS".to_string()));
        assert_eq!(Tag::Other("VV".to_string()).to_string(), "VV");
    }

    #[test]
    fn test_parse_mecab_groups_words_and_sentences() {
        let output = "서울\tNNP,지명,T,서울,*,*,*,*\n\
                      에\tJKB,*,F,에,*,*,*,*\n\
                      사람\tNNG,*,T,사람,*,*,*,*\n\
                      이\tJKS,*,F,이,*,*,*,*\n\
                      EOS\n\
                      것\tNNB,*,T,것,*,*,*,*\n\
                      EOS\n";
        let sentences = parse_mecab_output(output, "서울에 사람이\n것");

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].len(), 2);
        assert_eq!(sentences[0][0].len(), 2);
        assert_eq!(sentences[0][0][0], ClassifiedToken::new("서울", "NNP"));
        assert_eq!(sentences[0][1][0], ClassifiedToken::new("사람", "NNG"));
        assert_eq!(sentences[1], vec![vec![ClassifiedToken::new("것", "NNB")]]);
    }

    #[test]
    fn test_parse_mecab_splits_inflected_entries() {
        let output = "했다\tVV+EP+EF,*,F,했다,Inflect,VV,EF,하/VV/*+았/EP/*+다/EF/*\nEOS\n";
        let sentences = parse_mecab_output(output, "했다");
        assert_eq!(
            sentences[0][0],
            vec![
                ClassifiedToken::new("하", "VV"),
                ClassifiedToken::new("았", "EP"),
                ClassifiedToken::new("다", "EF"),
            ]
        );
    }

    #[test]
    fn test_parse_mecab_preanalysis_noun_is_not_counted_whole() {
        let output = "학생이다\tNNG+VCP+EF,*,F,학생이다,Preanalysis,NNG,EF,학생/NNG/*+이/VCP/*+다/EF/*\nEOS\n";
        let tokens = flatten(parse_mecab_output(output, "학생이다"));
        assert_eq!(tokens[0], ClassifiedToken::new("학생", "NNG"));
        assert!(tokens.iter().all(|token| token.surface != "학생이다"));

        let table = crate::terms::aggregate(&tokens);
        assert_eq!(table.get("학생"), Some(1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_parse_mecab_without_expression_keeps_first_tag() {
        let output = "했다\tVV+EP+EF,*,F,했다,Inflect,VV,EF,*\nEOS\n";
        let sentences = parse_mecab_output(output, "했다");
        assert_eq!(sentences[0][0], vec![ClassifiedToken::new("했다", "VV")]);
    }

    #[test]
    fn test_flatten_keeps_order() {
        let sentences = vec![
            vec![vec![ClassifiedToken::new("a", "NNG")], vec![ClassifiedToken::new("b", "NNP")]],
            vec![vec![ClassifiedToken::new("c", "NNB")]],
        ];
        let surfaces: Vec<_> = flatten(sentences).into_iter().map(|t| t.surface).collect();
        assert_eq!(surfaces, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mecab_requires_initialization() {
        let classifier = MecabClassifier::new("mecab", Vec::new());
        let result = classifier.classify("text").await;
        assert!(matches!(result, Err(ClassifierError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_mecab_missing_binary_fails_initialization() {
        let mut classifier = MecabClassifier::new("termrank-no-such-tagger", Vec::new());
        let result = classifier.initialize().await;
        assert!(matches!(result, Err(ClassifierError::Initialization { .. })));
        assert!(!classifier.is_initialized());
    }
}
