//! Top-K selection over the record store.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::matcher::{FuzzyMatcher, NO_MATCH};
use crate::model::CharacterRecord;

/// A record paired with its score and its position in the store.
///
/// Ordered by rank: a higher score is greater, and between equal scores the
/// record that comes first in the store is greater.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub score: i64,
    pub position: usize,
    pub record: &'a CharacterRecord,
}

impl ScoredCandidate<'_> {
    fn key(&self) -> (i64, Reverse<usize>) {
        (self.score, Reverse(self.position))
    }
}

impl PartialEq for ScoredCandidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScoredCandidate<'_> {}

impl PartialOrd for ScoredCandidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredCandidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Score every record and keep the best `limit`, best first.
pub fn rank<'a>(
    query: &str,
    records: &'a [CharacterRecord],
    min_score: i64,
    limit: usize,
) -> Vec<&'a CharacterRecord> {
    rank_scored(query, records, min_score, limit)
        .into_iter()
        .map(|c| c.record)
        .collect()
}

/// Same as [`rank`] but keeps the scores.
///
/// Candidates below `min_score` are dropped, and so is [`NO_MATCH`] even when
/// `min_score` is `i64::MIN`. The result equals a stable sort by descending
/// score truncated to `limit`: ties keep store order. A min-heap of at most
/// `limit` entries holds the current worst candidate on top.
pub fn rank_scored<'a>(
    query: &str,
    records: &'a [CharacterRecord],
    min_score: i64,
    limit: usize,
) -> Vec<ScoredCandidate<'a>> {
    if limit == 0 {
        return Vec::new();
    }

    let mut matcher = FuzzyMatcher::new();
    let capacity = limit.min(records.len()).saturating_add(1);
    let mut heap: BinaryHeap<Reverse<ScoredCandidate<'a>>> = BinaryHeap::with_capacity(capacity);

    for (position, record) in records.iter().enumerate() {
        let score = matcher.score(query, record.search_text());
        if score == NO_MATCH || score < min_score {
            continue;
        }
        let candidate = ScoredCandidate { score, position, record };
        if heap.len() < limit {
            heap.push(Reverse(candidate));
        } else if let Some(Reverse(worst)) = heap.peek() {
            if candidate > *worst {
                heap.pop();
                heap.push(Reverse(candidate));
            }
        }
    }

    // ascending order of Reverse(..) is descending rank
    heap.into_sorted_vec().into_iter().map(|Reverse(c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::score;
    use proptest::prelude::*;

    fn record(name: &str, code: &str) -> CharacterRecord {
        CharacterRecord::new(name, "", "Test", code, 0).unwrap()
    }

    /// Re-sort after every insertion and truncate, the plain way.
    fn naive_rank<'a>(query: &str, records: &'a [CharacterRecord], min_score: i64, limit: usize) -> Vec<&'a CharacterRecord> {
        let mut results: Vec<(i64, &CharacterRecord)> = Vec::new();
        for r in records {
            let s = score(query, r.search_text());
            if s != NO_MATCH && s >= min_score {
                results.push((s, r));
                results.sort_by(|a, b| b.0.cmp(&a.0));
                results.truncate(limit);
            }
        }
        results.into_iter().map(|(_, r)| r).collect()
    }

    #[test]
    fn test_zero_limit() {
        let records = vec![record("LATIN SMALL LETTER A", "0061")];
        assert!(rank("a", &records, 0, 0).is_empty());
    }

    #[test]
    fn test_huge_limit() {
        let records = vec![record("LATIN SMALL LETTER A", "0061"), record("LATIN SMALL LETTER B", "0062")];
        assert_eq!(rank("latin", &records, 0, usize::MAX).len(), 2);
        assert_eq!(rank("latin", &records, 0, 1usize << 40).len(), 2);
    }

    #[test]
    fn test_min_score_filters() {
        let records = vec![record("LATIN SMALL LETTER A", "0061")];
        assert!(rank("a", &records, i64::MAX, 10).is_empty());
        assert_eq!(rank("a", &records, i64::MIN, 10).len(), 1);
    }

    #[test]
    fn test_no_match_never_passes() {
        let records = vec![record("LATIN SMALL LETTER A", "0061")];
        assert!(rank("zzz", &records, i64::MIN, 10).is_empty());
    }

    #[test]
    fn test_descending_order() {
        let records = vec![
            record("SQUARE WITH ORTHOGONAL CROSSHATCH FILL", "25A6"),
            record("BLACK SQUARE", "25A0"),
            record("SQUARE", "33A0"),
        ];
        let scored = rank_scored("square", &records, i64::MIN, 10);
        assert_eq!(scored.len(), 3);
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(scored[0].record.name(), "SQUARE");
    }

    #[test]
    fn test_ties_keep_store_order() {
        // Same length, same alignment
        let records = vec![
            record("DIGIT ONE", "0031"),
            record("DIGIT TWO", "0032"),
            record("DIGIT SIX", "0036"),
        ];
        let ranked = rank("digit", &records, i64::MIN, 2);
        let codes: Vec<&str> = ranked.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["0031", "0032"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let records: Vec<CharacterRecord> = (0x41..0x5B)
            .map(|c| record(&format!("LATIN CAPITAL LETTER {}", char::from_u32(c).unwrap()), &format!("{:04X}", c)))
            .collect();
        assert_eq!(rank("latin", &records, i64::MIN, 5).len(), 5);
    }

    fn corpus() -> impl Strategy<Value = Vec<CharacterRecord>> {
        prop::collection::vec("[a-c ]{0,10}", 0..40).prop_map(|names| {
            names
                .iter()
                .enumerate()
                .map(|(i, n)| record(n, &format!("{:04X}", 0x100 + i)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_heap_matches_naive(records in corpus(), query in "[a-c ]{1,4}", min_score in -200i64..200, limit in 0usize..12) {
            let fast = rank(&query, &records, min_score, limit);
            let slow = naive_rank(&query, &records, min_score, limit);
            prop_assert_eq!(fast, slow);
        }

        #[test]
        fn prop_rank_is_idempotent(records in corpus(), query in "[a-c]{1,3}", limit in 0usize..12) {
            prop_assert_eq!(rank(&query, &records, 0, limit), rank(&query, &records, 0, limit));
        }

        #[test]
        fn prop_sorted_and_bounded(records in corpus(), query in "[a-c]{1,3}", limit in 0usize..12) {
            let scored = rank_scored(&query, &records, i64::MIN, limit);
            prop_assert!(scored.len() <= limit);
            for w in scored.windows(2) {
                prop_assert!(w[0].score > w[1].score || (w[0].score == w[1].score && w[0].position < w[1].position));
            }
        }
    }
}
