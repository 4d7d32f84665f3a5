//! Shared utilities.
//!
//! - [`trigram`] - 3-character window extraction for indexing and querying

pub mod trigram;

pub use trigram::*;
