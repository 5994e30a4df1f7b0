//! The inverted index itself: the `Building` -> `Frozen` lifecycle and
//! the write-side operations (`add_phrase`, `finish`).

use std::sync::{Arc, RwLock};

use ahash::{AHashMap, AHashSet};

use crate::error::{FuzzDexError, Result};
use crate::phrase::{Phrase, Posting};
use crate::search::{self, SearchOptions, SearchResult};
use crate::token::{tokenize, Token};
use crate::trigram::{self, Trigram};

/// Mutable state while the index accepts writes.
#[derive(Default)]
struct BuildState {
    phrases: AHashMap<u64, Phrase>,
    token_table: AHashMap<Token, Vec<Posting>>,
    trigram_table: AHashMap<Trigram, AHashSet<Token>>,
    constraint_index: AHashMap<u64, AHashSet<u64>>,
    short_tokens: AHashSet<Token>,
}

/// Immutable state once the index has been frozen. Shared across
/// readers behind an `Arc` with no locking required to consult it.
pub(crate) struct FrozenState {
    pub(crate) phrases: AHashMap<u64, Phrase>,
    pub(crate) token_table: AHashMap<Token, Vec<Posting>>,
    pub(crate) trigram_table: AHashMap<Trigram, AHashSet<Token>>,
    pub(crate) constraint_index: AHashMap<u64, AHashSet<u64>>,
    pub(crate) short_tokens: AHashSet<Token>,
}

enum State {
    Building(BuildState),
    Frozen(Arc<FrozenState>),
}

/// An in-memory fuzzy-search index over short phrases.
///
/// An index starts `Building`: phrases are added one at a time with
/// [`FuzzDex::add_phrase`]. Calling [`FuzzDex::finish`] freezes it, at
/// which point [`FuzzDex::search`] becomes available and any number of
/// threads may query it concurrently without further synchronization
/// on the caller's part.
pub struct FuzzDex {
    state: RwLock<State>,
}

impl FuzzDex {
    /// Create a new, empty index in the `Building` state.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::Building(BuildState::default())),
        }
    }

    /// Add a phrase to the index.
    ///
    /// Fails with [`FuzzDexError::IndexFrozen`] if `finish` has
    /// already been called, [`FuzzDexError::DuplicateId`] if `id` is
    /// already present, or [`FuzzDexError::EmptyPhrase`] if `text`
    /// tokenizes to nothing.
    pub fn add_phrase(
        &self,
        text: &str,
        id: u64,
        constraints: impl IntoIterator<Item = u64>,
    ) -> Result<()> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(FuzzDexError::EmptyPhrase);
        }

        let mut guard = self.state.write().expect("fuzzdex lock poisoned");
        let build = match &mut *guard {
            State::Frozen(_) => return Err(FuzzDexError::IndexFrozen),
            State::Building(build) => build,
        };

        if build.phrases.contains_key(&id) {
            return Err(FuzzDexError::DuplicateId { id });
        }

        let constraints: AHashSet<u64> = constraints.into_iter().collect();
        for &c in &constraints {
            build.constraint_index.entry(c).or_default().insert(id);
        }

        for (position, token) in tokens.iter().enumerate() {
            build
                .token_table
                .entry(token.clone())
                .or_default()
                .push(Posting {
                    phrase_id: id,
                    token_position: position as u32,
                });

            if trigram::is_short(token.as_str()) {
                build.short_tokens.insert(token.clone());
            } else {
                for tg in trigram::trigrams(token.as_str()) {
                    build
                        .trigram_table
                        .entry(tg)
                        .or_default()
                        .insert(token.clone());
                }
            }
        }

        tracing::trace!(phrase_id = id, token_count = tokens.len(), "add_phrase");

        build.phrases.insert(
            id,
            Phrase {
                id,
                original_text: text.to_string(),
                tokens,
                constraints,
            },
        );

        Ok(())
    }

    /// Freeze the index. Idempotent: calling `finish` again is a
    /// no-op. Sorts each posting list by `(phrase_id, token_position)`
    /// and makes the index safe to query from any number of threads.
    pub fn finish(&self) {
        let mut guard = self.state.write().expect("fuzzdex lock poisoned");
        if matches!(&*guard, State::Frozen(_)) {
            return;
        }

        let State::Building(build) = std::mem::replace(&mut *guard, State::Building(BuildState::default())) else {
            unreachable!("checked above")
        };

        let mut token_table = build.token_table;
        for postings in token_table.values_mut() {
            postings.sort_unstable_by_key(|p| (p.phrase_id, p.token_position));
        }

        let frozen = FrozenState {
            phrases: build.phrases,
            token_table,
            trigram_table: build.trigram_table,
            constraint_index: build.constraint_index,
            short_tokens: build.short_tokens,
        };

        tracing::debug!(phrase_count = frozen.phrases.len(), "finish");
        *guard = State::Frozen(Arc::new(frozen));
    }

    /// Query the index. Fails with [`FuzzDexError::IndexNotReady`] if
    /// `finish` has not yet been called.
    ///
    /// `search` takes a read lock only long enough to clone a
    /// reference to the frozen state; the actual query work runs
    /// without holding any lock, so concurrent `search` calls never
    /// block one another.
    pub fn search(
        &self,
        must: &str,
        should: &[&str],
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let frozen = {
            let guard = self.state.read().expect("fuzzdex lock poisoned");
            match &*guard {
                State::Building(_) => return Err(FuzzDexError::IndexNotReady),
                State::Frozen(frozen) => Arc::clone(frozen),
            }
        };

        tracing::trace!(must, should_count = should.len(), "search");
        Ok(search::execute(&frozen, must, should, options))
    }
}

impl Default for FuzzDex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_index_is_building() {
        let dex = FuzzDex::new();
        assert_eq!(
            dex.search("x", &[], SearchOptions::default()),
            Err(FuzzDexError::IndexNotReady)
        );
    }

    #[test]
    fn add_phrase_rejects_empty_text() {
        let dex = FuzzDex::new();
        assert_eq!(dex.add_phrase("   ...  ", 1, []), Err(FuzzDexError::EmptyPhrase));
    }

    #[test]
    fn add_phrase_rejects_duplicate_id() {
        let dex = FuzzDex::new();
        dex.add_phrase("first entry", 1, []).unwrap();
        assert_eq!(
            dex.add_phrase("second entry", 1, []),
            Err(FuzzDexError::DuplicateId { id: 1 })
        );
    }

    #[test]
    fn add_phrase_rejects_after_finish() {
        let dex = FuzzDex::new();
        dex.add_phrase("first entry", 1, []).unwrap();
        dex.finish();
        assert_eq!(
            dex.add_phrase("second entry", 2, []),
            Err(FuzzDexError::IndexFrozen)
        );
    }

    #[test]
    fn finish_is_idempotent() {
        let dex = FuzzDex::new();
        dex.add_phrase("first entry", 1, []).unwrap();
        dex.finish();
        dex.finish();
        assert!(dex.search("first", &[], SearchOptions::default()).is_ok());
    }
}
