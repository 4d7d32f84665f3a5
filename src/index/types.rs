use serde::{Deserialize, Serialize};

/// Unique identifier for a document in an index, assigned in insertion order.
pub type DocId = u32;

/// Index metadata stored alongside each named index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    pub version: u32,
    pub doc_count: u64,
    pub gram_count: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

impl IndexMeta {
    pub const VERSION: u32 = 1;

    /// Fresh metadata for a newly created index.
    pub fn new(now: u64) -> Self {
        Self {
            version: Self::VERSION,
            doc_count: 0,
            gram_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
