//! In-memory fuzzy-search index over short phrases (city, street and
//! point-of-interest names) with a per-phrase constraint set.
//!
//! A [`FuzzDex`] is built once, phrase by phrase, then frozen with
//! [`FuzzDex::finish`]; afterwards any number of threads can call
//! [`FuzzDex::search`] concurrently without taking turns.
//!
//! ```
//! use fuzzdex::{FuzzDex, SearchOptions};
//!
//! let dex = FuzzDex::new();
//! dex.add_phrase("Main Street", 1, []).unwrap();
//! dex.add_phrase("Maine Avenue", 2, []).unwrap();
//! dex.finish();
//!
//! let hits = dex.search("main", &["street"], SearchOptions::default()).unwrap();
//! assert_eq!(hits[0].id, 1);
//! ```

mod distance;
mod error;
mod index;
mod phrase;
mod search;
mod text;
mod token;
mod trigram;

pub use distance::{distance, distance_within};
pub use error::{FuzzDexError, Result};
pub use index::FuzzDex;
pub use search::{SearchOptions, SearchResult};
pub use token::{tokenize, Token};
