//! Ranking of aggregated terms and word-list formatting

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub count: usize,
}

impl RankedTerm {
    pub fn new(term: impl Into<String>, count: usize) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

/// Higher count first; equal counts fall back to ascending term order.
pub fn compare_ranked(a: &RankedTerm, b: &RankedTerm) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.term.cmp(&b.term))
}

/// Order every entry of `table` by [`compare_ranked`].
pub fn rank(table: &FrequencyTable) -> Vec<RankedTerm> {
    let mut ranked: Vec<RankedTerm> = table
        .iter()
        .map(|(term, count)| RankedTerm::new(term, count))
        .collect();
    ranked.sort_by(compare_ranked);
    ranked
}

/// One `"<term> : <count> \r\n"` line per ranked term.
pub fn format_ranking(ranking: &[RankedTerm]) -> String {
    ranking
        .iter()
        .map(|entry| format!("{} : {} \r\n", entry.term, entry.count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ties_broken_by_term() {
        let table: FrequencyTable = [("나", 3), ("다", 1), ("가", 3)].into_iter().collect();
        assert_eq!(
            rank(&table),
            vec![
                RankedTerm::new("가", 3),
                RankedTerm::new("나", 3),
                RankedTerm::new("다", 1)
            ]
        );
    }

    #[test]
    fn test_rank_count_beats_term_order() {
        let table: FrequencyTable = [("apple", 1), ("zebra", 5)].into_iter().collect();
        let ranked = rank(&table);
        assert_eq!(ranked[0].term, "zebra");
        assert_eq!(ranked[1].term, "apple");
    }

    #[test]
    fn test_rank_empty_table() {
        assert!(rank(&FrequencyTable::new()).is_empty());
    }

    #[test]
    fn test_format_ranking_lines() {
        let ranking = vec![RankedTerm::new("사람", 1), RankedTerm::new("서울", 1)];
        assert_eq!(format_ranking(&ranking), "사람 : 1 \r\n서울 : 1 \r\n");
        assert_eq!(format_ranking(&[]), "");
    }
}
