//! Trigram windows over sentinel-padded tokens, used as a cheap
//! prefilter before the more expensive bounded edit-distance check.

use ahash::AHashSet;
use smol_str::SmolStr;
use unicode_segmentation::UnicodeSegmentation;

/// A 3-grapheme window, stored inline for the common (ASCII-ish)
/// case.
pub type Trigram = SmolStr;

/// Tokens with fewer graphemes than this skip the trigram prefilter
/// entirely and are matched directly against the candidate set.
///
/// A single edit can touch at most 3 overlapping windows, so a token
/// needs enough windows to survive a couple of edits with some shared
/// trigram left over. A token of `SHORT_TOKEN_THRESHOLD - 1` or fewer
/// graphemes has so few padded windows that one or two edits near an
/// end can wipe every one of them — e.g. `"ab"` vs `"db"` share zero
/// trigrams despite being one substitution apart — which would make
/// the shared-trigram lower bound in `search::candidate_tokens`
/// unsound (a real false negative, not just an imprecise filter).
/// Below this length there just isn't enough trigram material for the
/// filter to be trustworthy, so those tokens bypass it entirely.
pub const SHORT_TOKEN_THRESHOLD: usize = 4;

/// Number of grapheme clusters in `s`.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// `true` if `token` is too short to usefully prefilter and must be
/// matched directly instead.
pub fn is_short(token: &str) -> bool {
    grapheme_len(token) < SHORT_TOKEN_THRESHOLD
}

/// The set of distinct trigrams of `token`, computed over
/// `"^^" + token + "$"` so that even a one-grapheme token yields at
/// least one window.
pub fn trigrams(token: &str) -> AHashSet<Trigram> {
    let mut graphemes: Vec<&str> = Vec::with_capacity(grapheme_len(token) + 3);
    graphemes.push("^");
    graphemes.push("^");
    graphemes.extend(token.graphemes(true));
    graphemes.push("$");

    let mut set = AHashSet::default();
    if graphemes.len() >= 3 {
        for window in graphemes.windows(3) {
            set.insert(SmolStr::new(window.concat()));
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_token_below_threshold() {
        assert!(is_short("a"));
        assert!(is_short("ab"));
        assert!(is_short("abc"));
        assert!(!is_short("abcd"));
    }

    #[test]
    fn single_char_token_yields_one_trigram() {
        let tg = trigrams("a");
        assert_eq!(tg.len(), 1);
        assert!(tg.contains("^^a"));
    }

    #[test]
    fn trigrams_cover_full_padded_window() {
        let tg = trigrams("main");
        // "^^main$" -> ^^m, ^ma, mai, ain, in$
        assert_eq!(tg.len(), 5);
        for expected in ["^^m", "^ma", "mai", "ain", "in$"] {
            assert!(tg.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn shared_trigrams_detect_similarity() {
        let a = trigrams("street");
        let b = trigrams("streat");
        let shared = a.intersection(&b).count();
        assert!(shared > 0);
        assert!(shared < a.len());
    }
}
