//! Typo-tolerant fuzzy scoring.
//!
//! A query matches a candidate when its characters appear in the candidate in
//! order, case-insensitively. Among the possible alignments the best one is
//! picked by dynamic programming, rewarding word starts and contiguous runs and
//! penalising gaps. On top of that an exact substring earns a bonus large
//! enough to beat any scattered alignment, and every candidate character costs
//! a little so that shorter candidates win ties.

/// Score of a candidate the query is not an ordered subsequence of.
pub const NO_MATCH: i64 = i64::MIN;

const SCORE_MATCH: i64 = 64;
const BONUS_BOUNDARY: i64 = 32;
const BONUS_CONSECUTIVE: i64 = 32;
// Per query char; must exceed BONUS_BOUNDARY + the consecutive bonus lost to a gap
const BONUS_SUBSTRING: i64 = 64;
const PENALTY_GAP_START: i64 = 12;
const PENALTY_GAP_EXTENSION: i64 = 4;
const PENALTY_LENGTH: i64 = 1;

/// Scorer with reusable buffers, meant to be driven over a whole corpus.
///
/// The buffers carry no information between calls: the score only depends on
/// the two strings passed in.
pub struct FuzzyMatcher {
    needle: Vec<char>,
    haystack: Vec<char>,
    prev: Vec<Option<i64>>,
    cur: Vec<Option<i64>>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self {
            needle: Vec::new(),
            haystack: Vec::new(),
            prev: Vec::new(),
            cur: Vec::new(),
        }
    }

    /// Score `candidate` against `query`; higher is better, [`NO_MATCH`] if
    /// the query is not an ordered subsequence of the candidate.
    ///
    /// An empty query trivially matches with a score of 0.
    pub fn score(&mut self, query: &str, candidate: &str) -> i64 {
        self.needle.clear();
        self.needle.extend(query.chars().map(fold));
        if self.needle.is_empty() {
            return 0;
        }

        self.haystack.clear();
        self.haystack.extend(candidate.chars().map(fold));
        if !is_subsequence(&self.needle, &self.haystack) {
            return NO_MATCH;
        }

        let Self { needle, haystack, prev, cur } = self;
        let Some(alignment) = best_alignment(needle, haystack, prev, cur) else {
            return NO_MATCH;
        };

        let n = needle.len();
        let substring = if haystack.windows(n).any(|w| w == needle.as_slice()) {
            BONUS_SUBSTRING * n as i64
        } else {
            0
        };

        alignment + substring - PENALTY_LENGTH * haystack.len() as i64
    }
}

/// One-off scoring; see [`FuzzyMatcher::score`].
pub fn score(query: &str, candidate: &str) -> i64 {
    FuzzyMatcher::new().score(query, candidate)
}

/// Single-char case folding so that positions line up between both sides.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn is_subsequence(needle: &[char], haystack: &[char]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|q| rest.any(|c| c == q))
}

fn is_boundary(haystack: &[char], j: usize) -> bool {
    j == 0 || !haystack[j - 1].is_alphanumeric()
}

fn char_score(haystack: &[char], j: usize) -> i64 {
    if is_boundary(haystack, j) {
        SCORE_MATCH + BONUS_BOUNDARY
    } else {
        SCORE_MATCH
    }
}

/// Best alignment score over all ways of matching `needle` in order.
///
/// Row `i` holds, for each haystack position `j`, the best score of matching
/// `needle[..=i]` with `needle[i]` landing exactly on `j`.
fn best_alignment(
    needle: &[char],
    haystack: &[char],
    prev: &mut Vec<Option<i64>>,
    cur: &mut Vec<Option<i64>>,
) -> Option<i64> {
    let (first, rest) = needle.split_first()?;
    let m = haystack.len();

    prev.clear();
    prev.extend((0..m).map(|j| (haystack[j] == *first).then(|| char_score(haystack, j))));

    for &qc in rest {
        cur.clear();
        cur.resize(m, None);
        // best prev[k] for k <= j - 2, already charged the gap extension
        let mut gap: Option<i64> = None;
        for j in 0..m {
            if j >= 2 {
                gap = gap.map(|g| g - PENALTY_GAP_EXTENSION).max(prev[j - 2]);
            }
            if haystack[j] != qc {
                continue;
            }
            let consecutive = if j >= 1 {
                prev[j - 1].map(|s| s + BONUS_CONSECUTIVE)
            } else {
                None
            };
            let skipped = gap.map(|g| g - PENALTY_GAP_START);
            cur[j] = consecutive.max(skipped).map(|s| s + char_score(haystack, j));
        }
        std::mem::swap(prev, cur);
    }

    prev.iter().flatten().max().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_empty_query() {
        assert_eq!(score("", "anything"), 0);
        assert_eq!(score("", ""), 0);
    }

    #[test]
    fn test_empty_candidate() {
        assert_eq!(score("a", ""), NO_MATCH);
    }

    #[rstest]
    #[case("xyz", "LATIN SMALL LETTER A")]
    #[case("al", "LA")]
    #[case("aa", "a")]
    #[case("letter b", "LATIN SMALL LETTER A")]
    fn test_no_match(#[case] query: &str, #[case] candidate: &str) {
        assert_eq!(score(query, candidate), NO_MATCH);
    }

    #[rstest]
    #[case("a", "a 0061 LATIN SMALL LETTER A ")]
    #[case("ltin smll a", "a 0061 LATIN SMALL LETTER A ")]
    #[case("0061", "a 0061 LATIN SMALL LETTER A ")]
    #[case("€", "€ 20AC EURO SIGN ")]
    fn test_matches(#[case] query: &str, #[case] candidate: &str) {
        assert!(score(query, candidate) > NO_MATCH);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score("LATIN", "latin letter"), score("latin", "LATIN LETTER"));
    }

    #[test]
    fn test_substring_beats_scattered() {
        // Same length; the scattered candidate has a word start on every char
        let contiguous = score("abc", "abc--");
        let scattered = score("abc", "a-b-c");
        assert!(contiguous > scattered, "{contiguous} <= {scattered}");
    }

    #[test]
    fn test_word_start_beats_mid_word() {
        assert!(score("let", "xx letter") > score("let", "xxxletter"));
    }

    #[test]
    fn test_contiguous_run_beats_fragments() {
        // Neither contains "sign", the first keeps "sig" together
        assert!(score("sign", "sigxxn") > score("sign", "sxixgn"));
    }

    #[test]
    fn test_shorter_candidate_wins_ties() {
        assert!(score("euro", "euro sign") > score("euro", "euro signs"));
    }

    #[test]
    fn test_exact_query_beats_typo_query() {
        let text = "a 0061 LATIN SMALL LETTER A ";
        assert!(score("latin small letter a", text) > score("ltin smll a", text));
    }

    #[test]
    fn test_matcher_reuse_is_stateless() {
        let mut matcher = FuzzyMatcher::new();
        let first = matcher.score("sign", "EURO SIGN");
        matcher.score("a much longer query", "with another candidate text");
        assert_eq!(matcher.score("sign", "EURO SIGN"), first);
        assert_eq!(first, score("sign", "EURO SIGN"));
    }

    fn naive_subsequence(query: &str, candidate: &str) -> bool {
        let mut it = candidate.chars();
        query.chars().all(|q| it.any(|c| c == q))
    }

    proptest! {
        #[test]
        fn prop_sentinel_iff_not_subsequence(query in "[a-d ]{1,6}", candidate in "[a-d ]{0,16}") {
            let s = score(&query, &candidate);
            if naive_subsequence(&query, &candidate) {
                prop_assert!(s > NO_MATCH);
            } else {
                prop_assert_eq!(s, NO_MATCH);
            }
        }

        #[test]
        fn prop_contiguous_beats_scattered(query in "[a-z]{2,8}") {
            let n = query.chars().count();
            let contiguous = format!("{}{}", query, "-".repeat(n - 1));
            let scattered = query.chars().map(String::from).collect::<Vec<_>>().join("-");
            prop_assert_eq!(contiguous.len(), scattered.len());
            prop_assert!(score(&query, &contiguous) > score(&query, &scattered));
        }

        #[test]
        fn prop_score_is_deterministic(query in "\\PC{0,8}", candidate in "\\PC{0,32}") {
            prop_assert_eq!(score(&query, &candidate), score(&query, &candidate));
        }
    }
}
