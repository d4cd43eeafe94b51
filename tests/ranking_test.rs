//! Property tests for frequency aggregation and ranking.

use proptest::prelude::*;
use termrank::terms::{
    ClassifiedToken, FrequencyTable, RankedTerm, TermFilter, aggregate, format_ranking, rank,
};

const TAGS: [&str; 6] = ["NNG", "NNP", "NNB", "NNM", "VV", "JKS"];

/// Generate a token with a short surface and a tag drawn from a mixed set.
fn arb_token() -> impl Strategy<Value = ClassifiedToken> {
    ("[가-나a-c]{1,3}", 0..TAGS.len())
        .prop_map(|(surface, tag)| ClassifiedToken::new(surface, TAGS[tag]))
}

fn arb_table() -> impl Strategy<Value = FrequencyTable> {
    proptest::collection::hash_map("[a-d가-다]{1,4}", 1usize..6, 0..20)
        .prop_map(|counts| counts.into_iter().collect::<FrequencyTable>())
}

#[test]
fn test_ranking_example() {
    let table: FrequencyTable = [("가", 3), ("나", 3), ("다", 1)].into_iter().collect();
    assert_eq!(
        rank(&table),
        vec![
            RankedTerm::new("가", 3),
            RankedTerm::new("나", 3),
            RankedTerm::new("다", 1),
        ]
    );
}

#[test]
fn test_dependent_nouns_excluded_end_to_end() {
    let tokens = vec![
        ClassifiedToken::new("서울", "NNP"),
        ClassifiedToken::new("것", "NNB"),
        ClassifiedToken::new("사람", "NNG"),
        ClassifiedToken::new("것", "NNB"),
    ];
    let table = aggregate(&tokens);
    let expected: FrequencyTable = [("서울", 1), ("사람", 1)].into_iter().collect();
    assert_eq!(table, expected);
    assert_eq!(format_ranking(&rank(&table)), "사람 : 1 \r\n서울 : 1 \r\n");
}

mod prop_aggregation {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn aggregate_is_permutation_invariant(
            tokens in proptest::collection::vec(arb_token(), 0..40),
            seed in any::<u64>(),
        ) {
            let mut shuffled = tokens.clone();
            // Deterministic Fisher-Yates driven by the generated seed
            let mut state = seed | 1;
            for i in (1..shuffled.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let j = (state % (i as u64 + 1)) as usize;
                shuffled.swap(i, j);
            }
            prop_assert_eq!(aggregate(&tokens), aggregate(&shuffled));
        }

        #[test]
        fn counted_tokens_satisfy_filter(
            tokens in proptest::collection::vec(arb_token(), 0..40),
        ) {
            let filter = TermFilter::default();
            let table = aggregate(&tokens);

            for token in &tokens {
                let accepted = matches!(token.tag.code(), "NNG" | "NNP")
                    && token.surface.chars().count() > 1;
                prop_assert_eq!(filter.accepts(token), accepted);
            }

            let total: usize = table.iter().map(|(_, count)| count).sum();
            let accepted = tokens.iter().filter(|token| filter.accepts(token)).count();
            prop_assert_eq!(total, accepted);
            prop_assert!(table.iter().all(|(_, count)| count >= 1));
        }
    }
}

mod prop_ranking {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn ranking_is_totally_ordered(table in arb_table()) {
            let ranked = rank(&table);
            prop_assert_eq!(ranked.len(), table.len());

            for pair in ranked.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(
                    a.count > b.count || (a.count == b.count && a.term < b.term),
                    "{:?} should precede {:?}", a, b
                );
            }
        }

        #[test]
        fn ranking_is_idempotent(table in arb_table()) {
            prop_assert_eq!(rank(&table), rank(&table));
        }

        #[test]
        fn ranking_ignores_insertion_order(table in arb_table()) {
            let mut entries: Vec<(String, usize)> = table
                .iter()
                .map(|(term, count)| (term.to_string(), count))
                .collect();
            entries.reverse();
            let rebuilt: FrequencyTable = entries.into_iter().collect();
            prop_assert_eq!(rank(&table), rank(&rebuilt));
        }
    }
}
