//! # Strix - Trigram-Indexed Substring Search
//!
//! Strix provides approximate substring search over large, append-mostly
//! collections of short strings. Instead of scanning every string per
//! query, it tokenizes documents into overlapping 3-character trigrams
//! and stores an explicit posting list (trigram -> document-id bitmap)
//! in an embedded transactional key-value store.
//!
//! ## Architecture
//!
//! - [`index`] - posting-list storage and chunked batch loading
//! - [`query`] - the per-query plan: substring scan vs trigram intersection
//! - [`utils`] - trigram extraction
//! - [`error`] - typed failure taxonomy
//!
//! ## Quick Start
//!
//! ```ignore
//! use strix::{BatchLoader, IndexStore};
//!
//! let store = IndexStore::open("strings.redb")?;
//! store.create_table("phrases")?;
//!
//! let loader = BatchLoader::new(&store);
//! loader.load("phrases", &["racecars", "carpet", "banana"])?;
//!
//! let hits = store.search("phrases", "car", 10, 0)?;
//! assert_eq!(hits, vec!["racecars", "carpet"]);
//! ```
//!
//! ## Match semantics
//!
//! Queries shorter than 3 characters fall back to a literal substring
//! scan, since no trigram can represent them. Queries of 3 characters or
//! more intersect the postings of all their trigrams, which is
//! recall-complete but precision-imperfect: every true substring match is
//! found, and occasionally a document whose trigrams recombine
//! differently is returned as well. No verification pass filters those
//! false positives out.

pub mod error;
pub mod index;
pub mod query;
pub mod utils;

pub use error::{LoadError, QueryFailure, StorageFailure};
pub use index::{BatchLoader, IndexStore};
pub use query::QueryPlan;
