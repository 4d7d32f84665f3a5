use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use roaring::RoaringBitmap;

use crate::error::{QueryFailure, StorageFailure};
use crate::index::types::{DocId, IndexMeta};
use crate::query::QueryPlan;
use crate::utils::extract_trigrams;

/// Key under which [`IndexMeta`] is stored in each index's meta table.
const META_KEY: &str = "meta";

/// Index store backed by an embedded ACID key-value engine.
///
/// Each named index occupies three tables in one database file:
///
/// - `<name>.docs` - doc id (insertion order) -> document string
/// - `<name>.grams` - trigram -> roaring bitmap of doc ids
/// - `<name>.meta` - counts and timestamps
///
/// The posting-list schema is explicit rather than delegated to an
/// engine-native trigram feature, so intersection happens here and any
/// backend with typed tables and transactions could sit underneath.
/// Document content only ever travels through typed keys and values,
/// never through query text, so quotes and control characters are stored
/// and matched verbatim.
///
/// The store owns all posting data derived from inserted documents;
/// callers keep ownership of the strings they pass in. One handle is
/// meant to serve one logical caller at a time for writes; isolation of
/// concurrent readers during a write is the engine's MVCC, not ours.
pub struct IndexStore {
    db: Database,
}

impl IndexStore {
    /// Open (or create) the backing database file.
    ///
    /// This is the explicit lifecycle boundary: the handle is created at
    /// startup and dropping it releases the backing connection.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageFailure> {
        Ok(Self {
            db: Database::create(path)?,
        })
    }

    /// Create an empty index under `name`, dropping any previous index of
    /// the same name. Drop-and-recreate, not a merge: pre-existing
    /// documents under this name are destroyed.
    pub fn create_table(&self, name: &str) -> Result<(), StorageFailure> {
        let (docs_name, grams_name, meta_name) = table_names(name);
        let docs_def: TableDefinition<DocId, &str> = TableDefinition::new(&docs_name);
        let grams_def: TableDefinition<&str, &[u8]> = TableDefinition::new(&grams_name);
        let meta_def: TableDefinition<&str, &str> = TableDefinition::new(&meta_name);

        let txn = self.db.begin_write()?;
        {
            txn.delete_table(docs_def)?;
            txn.delete_table(grams_def)?;
            txn.delete_table(meta_def)?;

            let _ = txn.open_table(docs_def)?;
            let _ = txn.open_table(grams_def)?;
            let mut meta_table = txn.open_table(meta_def)?;

            let meta = IndexMeta::new(unix_now());
            meta_table.insert(META_KEY, serde_json::to_string(&meta)?.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Insert a batch of documents as one durable unit.
    ///
    /// Assigns ascending doc ids, stores each string, and merges its
    /// trigrams into the posting table. Everything happens in a single
    /// write transaction: either the whole batch commits or none of it
    /// does. The index must have been created first.
    pub fn insert_batch<S: AsRef<str>>(
        &self,
        name: &str,
        strings: &[S],
    ) -> Result<(), StorageFailure> {
        let (docs_name, grams_name, meta_name) = table_names(name);
        let docs_def: TableDefinition<DocId, &str> = TableDefinition::new(&docs_name);
        let grams_def: TableDefinition<&str, &[u8]> = TableDefinition::new(&grams_name);
        let meta_def: TableDefinition<&str, &str> = TableDefinition::new(&meta_name);

        let txn = self.db.begin_write()?;
        {
            let mut meta_table = txn.open_table(meta_def)?;
            let mut meta: IndexMeta = {
                match meta_table.get(META_KEY)? {
                    Some(guard) => serde_json::from_str(guard.value())?,
                    // A write transaction creates missing tables on open,
                    // so absent metadata is the reliable signal that
                    // create_table was never called for this name.
                    None => return Err(StorageFailure::MissingIndex(name.to_string())),
                }
            };

            let mut docs_table = txn.open_table(docs_def)?;
            let next_id: DocId = docs_table
                .last()?
                .map(|(key, _)| key.value() + 1)
                .unwrap_or(0);

            // Accumulate per-trigram deltas first so each posting is read
            // and rewritten once per batch, not once per document.
            let mut deltas: BTreeMap<String, RoaringBitmap> = BTreeMap::new();
            for (i, s) in strings.iter().enumerate() {
                let doc_id = next_id + i as DocId;
                docs_table.insert(doc_id, s.as_ref())?;
                for gram in extract_trigrams(s.as_ref()) {
                    deltas.entry(gram).or_default().insert(doc_id);
                }
            }

            let mut grams_table = txn.open_table(grams_def)?;
            for (gram, delta) in &deltas {
                let merged = match grams_table.get(gram.as_str())? {
                    Some(guard) => {
                        let mut bitmap = RoaringBitmap::deserialize_from(guard.value())?;
                        bitmap |= delta;
                        bitmap
                    }
                    None => delta.clone(),
                };
                let mut buf = Vec::with_capacity(merged.serialized_size());
                merged.serialize_into(&mut buf)?;
                grams_table.insert(gram.as_str(), buf.as_slice())?;
            }

            meta.doc_count += strings.len() as u64;
            meta.gram_count = grams_table.len()?;
            meta.updated_at = unix_now();
            meta_table.insert(META_KEY, serde_json::to_string(&meta)?.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Search `name` for documents matching `query`, paginated by
    /// `limit`/`offset`, in insertion order.
    ///
    /// Queries shorter than the trigram window run as a literal substring
    /// scan. Longer queries intersect trigram postings, which over-matches:
    /// a document containing every query trigram is returned even when the
    /// trigrams recombine differently than in the query. Callers wanting
    /// exact containment must verify results themselves.
    pub fn search(
        &self,
        name: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<String>, QueryFailure> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let (docs_name, grams_name, _) = table_names(name);
        let docs_def: TableDefinition<DocId, &str> = TableDefinition::new(&docs_name);
        let grams_def: TableDefinition<&str, &[u8]> = TableDefinition::new(&grams_name);

        let txn = self.db.begin_read()?;
        let docs_table = txn
            .open_table(docs_def)
            .map_err(|e| QueryFailure::from_table_error(e, name))?;

        match QueryPlan::for_query(query) {
            QueryPlan::Substring(needle) => {
                let mut out = Vec::new();
                let mut skipped = 0;
                for item in docs_table.iter()? {
                    let (_, value) = item?;
                    let doc = value.value();
                    if doc.contains(needle.as_str()) {
                        if skipped < offset {
                            skipped += 1;
                            continue;
                        }
                        out.push(doc.to_string());
                        if out.len() == limit {
                            break;
                        }
                    }
                }
                Ok(out)
            }
            QueryPlan::TrigramIntersect(grams) => {
                let grams_table = txn
                    .open_table(grams_def)
                    .map_err(|e| QueryFailure::from_table_error(e, name))?;

                let mut hits: Option<RoaringBitmap> = None;
                for gram in &grams {
                    let Some(guard) = grams_table.get(gram.as_str())? else {
                        // A query trigram nothing contains: no document
                        // can match, skip the remaining postings.
                        return Ok(Vec::new());
                    };
                    let bitmap = RoaringBitmap::deserialize_from(guard.value()).map_err(
                        |source| QueryFailure::CorruptPosting {
                            gram: gram.clone(),
                            source,
                        },
                    )?;
                    hits = Some(match hits {
                        Some(mut acc) => {
                            acc &= &bitmap;
                            acc
                        }
                        None => bitmap,
                    });
                    if hits.as_ref().is_some_and(RoaringBitmap::is_empty) {
                        return Ok(Vec::new());
                    }
                }

                let Some(hits) = hits else {
                    return Ok(Vec::new());
                };

                let mut out = Vec::with_capacity(limit.min(hits.len() as usize));
                for doc_id in hits.iter().skip(offset).take(limit) {
                    let guard = docs_table
                        .get(doc_id)?
                        .ok_or(QueryFailure::DanglingPosting(doc_id))?;
                    out.push(guard.value().to_string());
                }
                Ok(out)
            }
        }
    }

    /// Read the metadata of a named index.
    pub fn stats(&self, name: &str) -> Result<IndexMeta, QueryFailure> {
        let (_, _, meta_name) = table_names(name);
        let meta_def: TableDefinition<&str, &str> = TableDefinition::new(&meta_name);

        let txn = self.db.begin_read()?;
        let meta_table = txn
            .open_table(meta_def)
            .map_err(|e| QueryFailure::from_table_error(e, name))?;
        let guard = meta_table
            .get(META_KEY)?
            .ok_or_else(|| QueryFailure::UnknownIndex(name.to_string()))?;
        serde_json::from_str(guard.value()).map_err(|source| QueryFailure::CorruptMeta {
            name: name.to_string(),
            source,
        })
    }
}

/// The three table names a named index occupies.
fn table_names(name: &str) -> (String, String, String) {
    (
        format!("{name}.docs"),
        format!("{name}.grams"),
        format!("{name}.meta"),
    )
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
