//! The query engine: must/should token matching, trigram
//! prefiltering, constraint filtering, and top-K scoring.

use ahash::AHashMap;

use crate::distance::distance_within;
use crate::index::FrozenState;
use crate::token::{tokenize, Token};
use crate::trigram;

/// Options controlling a single [`crate::FuzzDex::search`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If set, only phrases carrying this constraint value are
    /// eligible. A value unknown to the index yields no results.
    pub constraint: Option<u64>,
    /// Maximum edit distance accepted between `must` and a candidate
    /// token.
    pub max_distance: usize,
    /// Maximum number of results returned.
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            constraint: None,
            max_distance: 2,
            limit: 30,
        }
    }
}

impl SearchOptions {
    pub fn with_constraint(mut self, constraint: u64) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// One matched phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The caller-assigned id passed to `add_phrase`.
    pub id: u64,
    /// The phrase's original, unnormalized text.
    pub text: String,
    /// The indexed token that matched `must`.
    pub matched_token: String,
    /// Edit distance between `must` and `matched_token`.
    pub distance: usize,
    /// Combined ranking score; higher is better.
    pub score: f64,
}

struct MustMatch {
    distance: usize,
    position: u32,
    matched_token: Token,
}

impl MustMatch {
    /// Lower distance wins outright; position only breaks ties among
    /// otherwise-equal distances. Since `should_bonus` is constant for
    /// a given phrase regardless of which candidate token matched, this
    /// ordering is exactly the ordering the final combined score would
    /// produce, without needing `max_distance` in scope here.
    fn is_better_than(&self, other: &MustMatch) -> bool {
        (self.distance, self.position) < (other.distance, other.position)
    }
}

/// Run a query against a frozen index. Never fails: queries that miss
/// (empty must, unknown constraint, no candidates) simply yield an
/// empty vector.
pub(crate) fn execute(
    frozen: &FrozenState,
    must: &str,
    should: &[&str],
    options: SearchOptions,
) -> Vec<SearchResult> {
    if options.limit == 0 {
        return Vec::new();
    }

    let constraint_members = match options.constraint {
        Some(c) => match frozen.constraint_index.get(&c) {
            Some(members) => Some(members),
            None => return Vec::new(),
        },
        None => None,
    };

    let Some(must_token) = tokenize(must).into_iter().next() else {
        return Vec::new();
    };

    let should_tokens: Vec<Token> = should
        .iter()
        .filter_map(|s| tokenize(s).into_iter().next())
        .collect();

    let k = options.max_distance;
    let candidates = candidate_tokens(frozen, &must_token, k);

    let mut best_per_phrase: AHashMap<u64, MustMatch> = AHashMap::default();

    for token in candidates {
        let Some(d) = distance_within(must_token.as_str(), token.as_str(), k) else {
            continue;
        };
        let Some(postings) = frozen.token_table.get(&token) else {
            continue;
        };

        for posting in postings {
            if let Some(members) = constraint_members {
                if !members.contains(&posting.phrase_id) {
                    continue;
                }
            }

            let candidate = MustMatch {
                distance: d,
                position: posting.token_position,
                matched_token: token.clone(),
            };

            best_per_phrase
                .entry(posting.phrase_id)
                .and_modify(|best| {
                    if candidate.is_better_than(best) {
                        *best = MustMatch {
                            distance: candidate.distance,
                            position: candidate.position,
                            matched_token: candidate.matched_token.clone(),
                        };
                    }
                })
                .or_insert(candidate);
        }
    }

    let mut results: Vec<SearchResult> = best_per_phrase
        .into_iter()
        .filter_map(|(phrase_id, best)| {
            let phrase = frozen.phrases.get(&phrase_id)?;
            let bonus = should_bonus(&should_tokens, &phrase.tokens, k);
            let position_component = 1.0 / (1.0 + best.position as f64);
            let score = must_score(best.distance, k) + tiebreak_weight(k) * (position_component + bonus);
            Some(SearchResult {
                id: phrase.id,
                text: phrase.original_text.clone(),
                matched_token: best.matched_token.as_str().to_string(),
                distance: best.distance,
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.distance.cmp(&b.distance))
            .then(a.id.cmp(&b.id))
    });
    results.truncate(options.limit);
    results
}

/// `(max_distance + 1 - d) / (max_distance + 1)`: 1.0 at `d == 0`,
/// strictly decreasing as `d` grows, never negative since candidates
/// are only ever produced with `d <= max_distance`.
fn must_score(d: usize, max_distance: usize) -> f64 {
    let denom = (max_distance + 1) as f64;
    (denom - d as f64) / denom
}

/// Weight applied to the position/should tiebreaker so it can never
/// outrank a one-unit difference in `must_score`. Consecutive distance
/// values are exactly `1 / (max_distance + 1)` apart in `must_score`,
/// and `position_component + should_bonus` is bounded by `2`, so the
/// tiebreaker's maximum possible contribution is
/// `2 * tiebreak_weight == 1 / (max_distance + 2)`, strictly below
/// that gap — an exact must match always outscores any fuzzier one,
/// regardless of position or should-token bonus.
fn tiebreak_weight(max_distance: usize) -> f64 {
    1.0 / (2.0 * (max_distance as f64 + 2.0))
}

/// The set of indexed tokens worth running `distance_within` against
/// for this `must` token: short tokens always bypass the trigram
/// prefilter, everything else is filtered by shared-trigram count.
fn candidate_tokens(frozen: &FrozenState, must: &Token, k: usize) -> Vec<Token> {
    if trigram::is_short(must.as_str()) {
        return frozen.token_table.keys().cloned().collect();
    }

    let must_trigrams = trigram::trigrams(must.as_str());
    let threshold = (must_trigrams.len().saturating_sub(k * 3)).max(1);

    let mut overlap: AHashMap<Token, usize> = AHashMap::default();
    for tg in &must_trigrams {
        if let Some(tokens) = frozen.trigram_table.get(tg) {
            for token in tokens {
                *overlap.entry(token.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut candidates: Vec<Token> = overlap
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(token, _)| token)
        .collect();
    candidates.extend(frozen.short_tokens.iter().cloned());
    candidates
}

/// Sum of per-should-token bonuses, normalized by the number of
/// should tokens so the total stays bounded in `[0, 1]`: each should
/// token contributes at most `1 / should.len()`, found via the
/// closest-matching token actually present in `phrase_tokens`.
fn should_bonus(should: &[Token], phrase_tokens: &[Token], k: usize) -> f64 {
    if should.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for s in should {
        let best = phrase_tokens
            .iter()
            .filter_map(|t| distance_within(s.as_str(), t.as_str(), k))
            .min();
        if let Some(d) = best {
            total += must_score(d, k);
        }
    }
    total / should.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FuzzDex;

    #[test]
    fn exact_match_outranks_fuzzy_match() {
        let dex = FuzzDex::new();
        dex.add_phrase("oneword", 1, []).unwrap();
        dex.add_phrase("onewrd", 2, []).unwrap();
        dex.finish();

        let results = dex.search("oneword", &[], SearchOptions::default()).unwrap();
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].distance, 0);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn late_exact_match_outranks_early_fuzzy_match() {
        let dex = FuzzDex::new();
        dex.add_phrase("zeta yeta xeta weta main", 1, []).unwrap();
        dex.add_phrase("man zeta", 2, []).unwrap();
        dex.finish();

        let results = dex.search("main", &[], SearchOptions::default()).unwrap();
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].distance, 0);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn should_tokens_break_ties() {
        let dex = FuzzDex::new();
        dex.add_phrase("main street", 10, []).unwrap();
        dex.add_phrase("main avenue", 11, []).unwrap();
        dex.finish();

        let results = dex
            .search("main", &["street"], SearchOptions::default())
            .unwrap();
        let pos10 = results.iter().position(|r| r.id == 10).unwrap();
        let pos11 = results.iter().position(|r| r.id == 11).unwrap();
        assert!(pos10 < pos11);
    }

    #[test]
    fn unknown_constraint_yields_no_results() {
        let dex = FuzzDex::new();
        dex.add_phrase("main street", 1, [7]).unwrap();
        dex.finish();

        let results = dex
            .search("main", &[], SearchOptions::default().with_constraint(999))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn constraint_filters_matches() {
        let dex = FuzzDex::new();
        dex.add_phrase("main street", 1, [7]).unwrap();
        dex.add_phrase("main avenue", 2, [8]).unwrap();
        dex.finish();

        let results = dex
            .search("main", &[], SearchOptions::default().with_constraint(7))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
    }

    #[test]
    fn empty_must_yields_no_results() {
        let dex = FuzzDex::new();
        dex.add_phrase("main street", 1, []).unwrap();
        dex.finish();

        let results = dex.search("   ", &[], SearchOptions::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn limit_zero_yields_no_results() {
        let dex = FuzzDex::new();
        dex.add_phrase("main street", 1, []).unwrap();
        dex.finish();

        let results = dex
            .search("main", &[], SearchOptions::default().with_limit(0))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn fuzzy_must_within_budget_matches() {
        let dex = FuzzDex::new();
        dex.add_phrase("streat", 1, []).unwrap();
        dex.finish();

        let results = dex.search("street", &[], SearchOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance, 1);
    }

    #[test]
    fn short_token_substitution_at_first_grapheme_is_still_found() {
        // "ab" vs "db" share zero trigrams (the substitution touches
        // every padded window of a 2-grapheme token), so this only
        // passes because such short tokens bypass the trigram filter.
        let dex = FuzzDex::new();
        dex.add_phrase("db", 1, []).unwrap();
        dex.finish();

        let results = dex
            .search("ab", &[], SearchOptions::default().with_max_distance(1))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance, 1);
    }
}
