//! Error taxonomy for [`crate::FuzzDex`].
//!
//! Query misses (empty must-token, unknown constraint, no candidates)
//! are not errors — `search` returns an empty result vector for those.
//! These variants are reserved for misuse of the build/query contract.

use thiserror::Error;

/// Errors returned by [`crate::FuzzDex`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuzzDexError {
    /// A write (`add_phrase`) was attempted after `finish`.
    #[error("index is frozen; writes are no longer accepted")]
    IndexFrozen,

    /// `search` was attempted before `finish`.
    #[error("index is not ready; call finish() before searching")]
    IndexNotReady,

    /// `add_phrase` was called with an `id` already present in the index.
    #[error("duplicate phrase id {id}")]
    DuplicateId { id: u64 },

    /// `add_phrase`'s text tokenized to an empty sequence.
    #[error("phrase text tokenizes to an empty sequence")]
    EmptyPhrase,

    /// A numeric argument was out of range (e.g. a negative `max_distance`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, FuzzDexError>;
