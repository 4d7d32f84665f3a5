use crate::utils::{GRAM_LEN, query_trigrams};

/// Query execution plan.
///
/// A state-free classification applied per query, chosen by character
/// count against the tokenization window width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Literal substring scan of the document table (case-sensitive,
    /// unanchored). Taken for queries shorter than one window: the
    /// sliding tokenizer produces no trigram for them, so the posting
    /// index cannot represent the match and a scan is the only path
    /// that stays correct. The empty query matches every document.
    Substring(String),
    /// Intersect the postings of every query trigram. This approximates
    /// "query is a substring of document": necessary but not sufficient,
    /// so results are recall-complete but may include documents whose
    /// trigrams recombine differently than in the query. No verification
    /// pass is applied to filter those out.
    TrigramIntersect(Vec<String>),
}

impl QueryPlan {
    /// Plan a query with the default window-width threshold.
    pub fn for_query(query: &str) -> Self {
        Self::for_query_with_min_len(query, GRAM_LEN)
    }

    /// Plan a query with an explicit minimum length for the trigram path.
    pub fn for_query_with_min_len(query: &str, min_len: usize) -> Self {
        if query.chars().count() < min_len {
            QueryPlan::Substring(query.to_string())
        } else {
            QueryPlan::TrigramIntersect(query_trigrams(query))
        }
    }
}
