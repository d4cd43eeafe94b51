//! Term classification, frequency aggregation and ranking
//!
//! Tagged tokens come from an external classifier; this module keeps the
//! content nouns, counts them and orders the result.

pub mod frequency;
pub mod ranking;
pub mod tagger;

pub use frequency::{FrequencyTable, TermFilter, aggregate, aggregate_with};
pub use ranking::{RankedTerm, compare_ranked, format_ranking, rank};
pub use tagger::{
    ClassifiedToken, MecabClassifier, Sentence, StaticClassifier, SyntacticWord, Tag,
    TermClassifier, flatten, parse_mecab_output,
};
