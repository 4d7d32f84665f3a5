/// Width of the sliding tokenization window, in characters.
pub const GRAM_LEN: usize = 3;

/// Extract unique trigrams from a document.
///
/// Slides a 3-character window across the string and collapses duplicates.
/// Windows are character-based, not byte-based, so multi-byte text produces
/// the same grams the query side will look up. Strings shorter than the
/// window yield an empty set; that is expected, not an error.
///
/// Documents here are short strings, so sort+dedup beats a hash set
/// (more cache-friendly, no hashing overhead).
pub fn extract_trigrams(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < GRAM_LEN {
        return Vec::new();
    }

    let mut grams: Vec<String> = chars.windows(GRAM_LEN).map(|w| w.iter().collect()).collect();
    grams.sort_unstable();
    grams.dedup();
    grams
}

/// Extract trigrams from a query string for searching.
///
/// Same windowing as [`extract_trigrams`]; kept separate so the query
/// path reads as its own step in the planner.
pub fn query_trigrams(query: &str) -> Vec<String> {
    extract_trigrams(query)
}
