//! The phrase record stored per indexed entry.

use crate::token::Token;
use ahash::AHashSet;

/// One indexed phrase: a caller-assigned id, the original text (kept
/// for display in search results), the ordered tokens derived from
/// it, and the set of constraint values attached to it.
#[derive(Debug, Clone)]
pub struct Phrase {
    pub id: u64,
    pub original_text: String,
    pub tokens: Vec<Token>,
    pub constraints: AHashSet<u64>,
}

/// A `(phrase_id, token_position)` pair recorded in a token's posting
/// list. `token_position` is the 0-based index of the token within
/// the phrase it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Posting {
    pub phrase_id: u64,
    pub token_position: u32,
}
