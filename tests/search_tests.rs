//! End-to-end tests for the trigram index: insertion, both query paths,
//! pagination, and the documented over-matching of trigram intersection.

use std::collections::HashSet;

use strix::{BatchLoader, IndexStore, QueryFailure};

const TABLE: &str = "strings";

/// Fresh store in a scratch directory. The directory handle must stay
/// alive for the duration of the test.
fn temp_store() -> (tempfile::TempDir, IndexStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = IndexStore::open(dir.path().join("strings.redb")).expect("Failed to open store");
    (dir, store)
}

fn populated_store(strings: &[&str]) -> (tempfile::TempDir, IndexStore) {
    let (dir, store) = temp_store();
    store.create_table(TABLE).unwrap();
    store.insert_batch(TABLE, strings).unwrap();
    (dir, store)
}

#[test]
fn end_to_end_example_corpus() {
    let corpus = ["racecars", "carpet", "cartoon", "scar", "racingcar", "banana"];
    let (_dir, store) = populated_store(&corpus);

    let hits: HashSet<String> = store.search(TABLE, "car", 10, 0).unwrap().into_iter().collect();
    let expected: HashSet<String> = ["racecars", "carpet", "cartoon", "scar", "racingcar"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(hits, expected);
    assert!(!hits.contains("banana"));

    // single character: substring mode, every phrase contains an 'a'
    let hits = store.search(TABLE, "a", 10, 0).unwrap();
    assert_eq!(hits.len(), 6);

    let hits: HashSet<String> = store.search(TABLE, "race", 10, 0).unwrap().into_iter().collect();
    let expected: HashSet<String> = ["racecars", "racingcar"].iter().map(|s| s.to_string()).collect();
    assert_eq!(hits, expected);
}

#[test]
fn full_string_round_trip() {
    let (_dir, store) = populated_store(&["racecars", "banana"]);
    let hits = store.search(TABLE, "banana", 10, 0).unwrap();
    assert_eq!(hits, vec!["banana"]);
}

#[test]
fn short_query_finds_every_containing_document() {
    let (_dir, store) = populated_store(&["carpet", "scar", "dog"]);

    for query in ["c", "ca", "ar", "r"] {
        let hits = store.search(TABLE, query, 10, 0).unwrap();
        for doc in ["carpet", "scar"] {
            if doc.contains(query) {
                assert!(
                    hits.iter().any(|h| h == doc),
                    "query {:?} missed {:?}",
                    query,
                    doc
                );
            }
        }
    }

    let hits = store.search(TABLE, "z", 10, 0).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn empty_query_matches_everything() {
    let (_dir, store) = populated_store(&["carpet", "", "dog"]);
    let hits = store.search(TABLE, "", 10, 0).unwrap();
    assert_eq!(hits.len(), 3);
}

#[test]
fn recall_every_substring_of_length_three_or_more() {
    let doc = "racingcar";
    let (_dir, store) = populated_store(&[doc, "banana"]);

    for start in 0..doc.len() {
        for end in (start + 3)..=doc.len() {
            let query = &doc[start..end];
            let hits = store.search(TABLE, query, 10, 0).unwrap();
            assert!(
                hits.iter().any(|h| h == doc),
                "query {:?} missed {:?}",
                query,
                doc
            );
        }
    }
}

#[test]
fn trigram_matching_over_matches_without_verification() {
    // "abcxbcd" contains the trigrams "abc" and "bcd" of the query "abcd"
    // without containing "abcd" itself. The intersection path returns it:
    // the filter is recall-complete, not precision-perfect, and no
    // verification pass trims it. Asserted here as a characteristic, not
    // a bug.
    let (_dir, store) = populated_store(&["abcxbcd", "abcd"]);

    let hits = store.search(TABLE, "abcd", 10, 0).unwrap();
    assert!(hits.iter().any(|h| h == "abcd"));
    assert!(hits.iter().any(|h| h == "abcxbcd"));
}

#[test]
fn batch_size_one_and_thousand_read_back_identically() {
    let strings: Vec<String> = (0..37).map(|i| format!("string number {i}")).collect();

    let (_dir_a, store_a) = temp_store();
    store_a.create_table(TABLE).unwrap();
    BatchLoader::with_batch_size(&store_a, 1000)
        .load_with_progress(TABLE, &strings, true)
        .unwrap();

    let (_dir_b, store_b) = temp_store();
    store_b.create_table(TABLE).unwrap();
    BatchLoader::with_batch_size(&store_b, 1)
        .load_with_progress(TABLE, &strings, true)
        .unwrap();

    for query in ["string", "number 1", "ing num", "r 36"] {
        let a: HashSet<String> = store_a.search(TABLE, query, 100, 0).unwrap().into_iter().collect();
        let b: HashSet<String> = store_b.search(TABLE, query, 100, 0).unwrap().into_iter().collect();
        assert_eq!(a, b, "query {:?} diverged between batch sizes", query);
    }
}

#[test]
fn quotes_and_control_characters_stored_verbatim() {
    let tricky = "o'brien's car";
    let (_dir, store) = populated_store(&[tricky, "banana", "tab\there"]);

    // trigram path, gram containing the quote
    let hits = store.search(TABLE, "o'b", 10, 0).unwrap();
    assert_eq!(hits, vec![tricky]);

    // substring path with a quote
    let hits = store.search(TABLE, "'s", 10, 0).unwrap();
    assert_eq!(hits, vec![tricky]);

    // full round trip, unaltered
    let hits = store.search(TABLE, tricky, 10, 0).unwrap();
    assert_eq!(hits, vec![tricky]);

    let hits = store.search(TABLE, "b\th", 10, 0).unwrap();
    assert_eq!(hits, vec!["tab\there"]);
}

#[test]
fn pagination_walks_results_in_insertion_order() {
    let strings: Vec<String> = (0..9).map(|i| format!("carton {i}")).collect();
    let (_dir, store) = temp_store();
    store.create_table(TABLE).unwrap();
    store.insert_batch(TABLE, &strings).unwrap();

    let page1 = store.search(TABLE, "carton", 4, 0).unwrap();
    let page2 = store.search(TABLE, "carton", 4, 4).unwrap();
    let page3 = store.search(TABLE, "carton", 4, 8).unwrap();

    assert_eq!(page1, &strings[0..4]);
    assert_eq!(page2, &strings[4..8]);
    assert_eq!(page3, &strings[8..9]);

    // same pagination contract on the substring path
    let page2_short = store.search(TABLE, "ca", 4, 4).unwrap();
    assert_eq!(page2_short, &strings[4..8]);
}

#[test]
fn unknown_index_is_a_query_failure() {
    let (_dir, store) = temp_store();
    match store.search("missing", "abc", 10, 0) {
        Err(QueryFailure::UnknownIndex(name)) => assert_eq!(name, "missing"),
        other => panic!("expected UnknownIndex, got {:?}", other),
    }
}

#[test]
fn query_with_unindexed_trigram_returns_empty() {
    let (_dir, store) = populated_store(&["racecars"]);
    let hits = store.search(TABLE, "xyz", 10, 0).unwrap();
    assert!(hits.is_empty());
}
