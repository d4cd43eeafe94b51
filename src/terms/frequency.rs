//! Term frequency aggregation
//!
//! Folds classified tokens into a term -> count table, keeping only
//! content-bearing nouns with more than one character.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tagger::{ClassifiedToken, Tag};

/// Occurrence count per accepted surface form. Every count is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `term`.
    pub fn record(&mut self, term: &str) {
        *self.counts.entry(term.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.counts.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in arbitrary order. Use [`super::rank`] for a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(term, count)| (term.as_str(), *count))
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self {
            counts: iter
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(term, count)| (term.into(), count))
                .collect(),
        }
    }
}

/// Which tokens are counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFilter {
    pub tags: Vec<Tag>,
    /// Surfaces must be strictly longer than this many characters.
    pub min_exclusive_len: usize,
}

impl Default for TermFilter {
    fn default() -> Self {
        Self {
            tags: vec![Tag::CommonNoun, Tag::ProperNoun],
            min_exclusive_len: 1,
        }
    }
}

impl TermFilter {
    pub fn accepts(&self, token: &ClassifiedToken) -> bool {
        self.tags.contains(&token.tag) && token.surface.chars().count() > self.min_exclusive_len
    }
}

/// Build a frequency table with the default noun filter.
pub fn aggregate<'a, I>(tokens: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a ClassifiedToken>,
{
    aggregate_with(&TermFilter::default(), tokens)
}

pub fn aggregate_with<'a, I>(filter: &TermFilter, tokens: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a ClassifiedToken>,
{
    tokens
        .into_iter()
        .filter(|token| filter.accepts(token))
        .fold(FrequencyTable::new(), |mut table, token| {
            table.record(&token.surface);
            table
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_counts_nouns_only() {
        let tokens = vec![
            ClassifiedToken::new("서울", "NNP"),
            ClassifiedToken::new("것", "NNB"),
            ClassifiedToken::new("사람", "NNG"),
            ClassifiedToken::new("것", "NNB"),
        ];
        let table = aggregate(&tokens);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("서울"), Some(1));
        assert_eq!(table.get("사람"), Some(1));
        assert_eq!(table.get("것"), None);
    }

    #[test]
    fn test_single_character_surfaces_are_dropped() {
        let tokens = vec![
            ClassifiedToken::new("집", "NNG"),
            ClassifiedToken::new("집들", "NNG"),
            ClassifiedToken::new("집들", "NNG"),
        ];
        let table = aggregate(&tokens);
        assert_eq!(table.get("집"), None);
        assert_eq!(table.get("집들"), Some(2));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // One Hangul syllable is three UTF-8 bytes but a single character
        let filter = TermFilter::default();
        assert!(!filter.accepts(&ClassifiedToken::new("길", "NNG")));
        assert!(filter.accepts(&ClassifiedToken::new("ab", "NNP")));
    }

    #[test]
    fn test_unit_and_other_tags_rejected() {
        let filter = TermFilter::default();
        assert!(!filter.accepts(&ClassifiedToken::new("개월", "NNBC")));
        assert!(!filter.accepts(&ClassifiedToken::new("달리다", "VV")));
    }

    #[test]
    fn test_custom_filter() {
        let filter = TermFilter {
            tags: vec![Tag::DependentNoun],
            min_exclusive_len: 0,
        };
        let tokens = vec![ClassifiedToken::new("것", "NNB")];
        assert_eq!(aggregate_with(&filter, &tokens).get("것"), Some(1));
    }

    #[test]
    fn test_empty_input() {
        let tokens: Vec<ClassifiedToken> = Vec::new();
        assert!(aggregate(&tokens).is_empty());
    }
}
