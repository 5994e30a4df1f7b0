//! Tokenization: splitting free text into normalized [`Token`]s.

use smol_str::SmolStr;
use std::fmt;

use crate::text::{fold, is_boundary};

/// A single normalized token: case-folded, diacritic-stripped,
/// non-empty. Backed by [`SmolStr`] so short tokens (the common case
/// for street/city names) never hit the allocator.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Token(SmolStr);

impl Token {
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Wrap an already-normalized string without re-normalizing it.
    /// Used internally once a string has already gone through [`fold`].
    pub(crate) fn from_normalized(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.0.as_str()).finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Split `text` into normalized tokens, in left-to-right order of
/// first appearance, discarding empties.
///
/// Deterministic and side-effect free. The same rules run at build
/// time (indexing a phrase) and at query time (normalizing `must`/
/// `should`), so a token produced by one always compares equal to the
/// same token produced by the other.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if is_boundary(c) {
            if !current.is_empty() {
                tokens.push(Token::from_normalized(fold(&current)));
                current.clear();
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(Token::from_normalized(fold(&current)));
    }

    tokens
}
