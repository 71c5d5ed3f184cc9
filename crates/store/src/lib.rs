//! Best-effort persistence for progression records.
//!
//! The game never depends on the store succeeding: every backend error is
//! surfaced as a [`StoreError`], and [`ScoreBook`] logs and swallows those so
//! the session keeps its in-memory values.

pub mod error;
pub mod kv;
pub mod score_book;

pub use error::StoreError;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore, UnavailableStore};
pub use score_book::{ScoreBook, BEST_SCORE_KEY, MAX_UNLOCKED_LEVEL_KEY};
