//! Typed error taxonomy for the index core.
//!
//! Failures are returned to the immediate caller; the core never retries,
//! suppresses, or substitutes defaults. Retry policy belongs to callers.

use thiserror::Error;

use crate::index::types::DocId;

/// Errors raised while creating tables or inserting documents.
#[derive(Error, Debug)]
pub enum StorageFailure {
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("posting encode/decode error: {0}")]
    Posting(#[from] std::io::Error),

    #[error("metadata encode/decode error: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("index {0:?} has not been created")]
    MissingIndex(String),
}

/// Errors raised during search.
///
/// A search either returns a full result page or fails; there are no
/// partial results.
#[derive(Error, Debug)]
pub enum QueryFailure {
    #[error("unknown index: {0:?}")]
    UnknownIndex(String),

    #[error("table error: {0}")]
    Table(redb::TableError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("metadata for index {name:?} is corrupt: {source}")]
    CorruptMeta {
        name: String,
        source: serde_json::Error,
    },

    #[error("posting list for trigram {gram:?} is corrupt: {source}")]
    CorruptPosting {
        gram: String,
        source: std::io::Error,
    },

    #[error("posting references missing document {0}")]
    DanglingPosting(DocId),
}

impl QueryFailure {
    /// Map a table-open failure on the read path, turning "no such table"
    /// into the unknown-index error the caller can act on.
    pub(crate) fn from_table_error(err: redb::TableError, name: &str) -> Self {
        match err {
            redb::TableError::TableDoesNotExist(_) => QueryFailure::UnknownIndex(name.to_string()),
            other => QueryFailure::Table(other),
        }
    }
}

/// Error from a chunked load, surfacing partial success.
///
/// Chunks committed before the failing one stay committed; `inserted`
/// reports how many strings those chunks covered out of `total`.
#[derive(Error, Debug)]
#[error("load aborted after {inserted} of {total} strings: {source}")]
pub struct LoadError {
    pub inserted: usize,
    pub total: usize,
    #[source]
    pub source: StorageFailure,
}
