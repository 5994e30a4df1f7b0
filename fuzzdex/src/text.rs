//! Character-level normalization shared by the tokenizer and the
//! grapheme-aware edit-distance engine.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a single raw token to its canonical comparison form.
///
/// Two steps, in order:
/// 1. Unicode lowercase (`char::to_lowercase`), not full case-fold: full
///    case-folding can expand one grapheme cluster into several (e.g.
///    `ß` -> `ss`), which would break the "normalization preserves
///    grapheme-cluster count" contract. Plain lowercasing does not.
/// 2. Decompose to NFD and drop combining marks, so base letters
///    compare equal regardless of diacritics (`"żółw"` folds toward
///    `"z o l w"`'s base letters, not to `"zolw"` byte-for-byte, but
///    the combining marks themselves are gone).
///
/// Both steps operate per `char`, so they can never merge or split a
/// grapheme cluster: a cluster is a base character plus its combining
/// marks, lowercasing doesn't add/remove combining marks, and dropping
/// combining marks leaves the base character that anchors the cluster.
pub fn fold(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// A single char is a split boundary if it is neither a Unicode letter
/// nor a Unicode digit. Runs of boundary chars collapse to one split.
#[inline]
pub fn is_boundary(c: char) -> bool {
    !(c.is_alphabetic() || c.is_numeric())
}
