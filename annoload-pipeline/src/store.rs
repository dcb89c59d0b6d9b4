//! Embedded document store for annotated variants.
//!
//! Documents are grouped in named collections and keyed by [`StorageKey`].
//! The whole store can be snapshotted to, and reopened from, a JSON file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use annoload_core::{AnnotationRecord, ConsequenceType, StorageKey, StorageKeyBuilder, Xref};

use crate::errors::{SinkError, StoreError};
use crate::sink::AnnotationSink;

/// Annotation part of a variant document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "ct", default)]
    pub consequence_types: Vec<ConsequenceType>,
    #[serde(default)]
    pub xrefs: Vec<Xref>,
}

///
/// One stored variant with all annotations collected for it.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(rename = "_id")]
    pub id: StorageKey,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub reference: String,
    pub alternate: String,
    pub annot: Annotation,
}

/// What an upsert did to the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

impl AnnotationDocument {
    pub fn from_record(id: StorageKey, record: &AnnotationRecord) -> Self {
        let mut doc = Self {
            id,
            chromosome: record.chromosome.clone(),
            start: record.start,
            end: record.end,
            reference: record.reference.clone(),
            alternate: record.alternate.clone(),
            annot: Annotation::default(),
        };
        doc.merge(record);
        doc
    }

    ///
    /// Add the record's consequence types and xrefs that are not stored yet.
    ///
    /// Returns true if anything was added.
    ///
    pub fn merge(&mut self, record: &AnnotationRecord) -> bool {
        let mut changed = false;
        for ct in &record.consequence_types {
            if !self.annot.consequence_types.contains(ct) {
                self.annot.consequence_types.push(ct.clone());
                changed = true;
            }
        }
        for xref in &record.xrefs {
            if !self.annot.xrefs.contains(xref) {
                self.annot.xrefs.push(xref.clone());
                changed = true;
            }
        }
        changed
    }
}

type Collection = BTreeMap<StorageKey, AnnotationDocument>;

///
/// Thread-safe, cloneable handle to an in-process document store.
///
/// Clones share the same data, so several loads can write into one store
/// concurrently.
///
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    collections: Arc<RwLock<BTreeMap<String, Collection>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Open a store snapshot, or start empty if the file does not exist yet.
    ///
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No store snapshot at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let collections: BTreeMap<String, Collection> =
            serde_json::from_reader(BufReader::new(file))?;
        info!(
            "Opened store snapshot {} with {} collection(s)",
            path.display(),
            collections.len()
        );
        Ok(Self {
            collections: Arc::new(RwLock::new(collections)),
        })
    }

    ///
    /// Write the store to `path`, replacing any previous snapshot.
    ///
    /// Written to a sibling `.tmp` file first, then renamed into place.
    ///
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = path.with_extension("tmp");
        {
            let collections = self.read()?;
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &*collections)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)?;

        debug!("Saved store snapshot to {}", path.display());
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Collection>>, StoreError> {
        self.collections.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Collection>>, StoreError> {
        self.collections.write().map_err(|_| StoreError::Poisoned)
    }

    pub fn upsert(
        &self,
        collection: &str,
        key: StorageKey,
        record: &AnnotationRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut collections = self.write()?;
        let docs = collections.entry(collection.to_string()).or_default();
        Ok(upsert_into(docs, key, record))
    }

    ///
    /// Upsert a whole batch while holding the write lock once.
    ///
    /// Either every record is applied or, if the lock is poisoned, none is.
    ///
    pub fn upsert_batch(
        &self,
        collection: &str,
        keys: &StorageKeyBuilder,
        batch: &[AnnotationRecord],
    ) -> Result<Vec<UpsertOutcome>, StoreError> {
        let mut collections = self.write()?;
        let docs = collections.entry(collection.to_string()).or_default();
        Ok(batch
            .iter()
            .map(|record| upsert_into(docs, record.storage_key(keys), record))
            .collect())
    }

    pub fn get(
        &self,
        collection: &str,
        key: &StorageKey,
    ) -> Result<Option<AnnotationDocument>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    /// Number of documents in a collection; 0 if it does not exist.
    pub fn len(&self, collection: &str) -> Result<usize, StoreError> {
        Ok(self.read()?.get(collection).map_or(0, BTreeMap::len))
    }

    pub fn is_empty(&self, collection: &str) -> Result<bool, StoreError> {
        Ok(self.len(collection)? == 0)
    }

    pub fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

fn upsert_into(docs: &mut Collection, key: StorageKey, record: &AnnotationRecord) -> UpsertOutcome {
    match docs.get_mut(&key) {
        Some(doc) => {
            if doc.merge(record) {
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::Unchanged
            }
        }
        None => {
            let doc = AnnotationDocument::from_record(key.clone(), record);
            docs.insert(key, doc);
            UpsertOutcome::Inserted
        }
    }
}

///
/// Sink that upserts every record into a [`DocumentStore`] collection.
///
pub struct StoreSink {
    store: DocumentStore,
    collection: String,
    keys: StorageKeyBuilder,
}

impl StoreSink {
    pub fn new(store: DocumentStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            keys: StorageKeyBuilder::default(),
        }
    }

    pub fn with_key_builder(mut self, keys: StorageKeyBuilder) -> Self {
        self.keys = keys;
        self
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }
}

impl AnnotationSink for StoreSink {
    fn write(&mut self, batch: &[AnnotationRecord]) -> Result<(), SinkError> {
        let outcomes = self.store.upsert_batch(&self.collection, &self.keys, batch)?;
        let inserted = outcomes
            .iter()
            .filter(|o| **o == UpsertOutcome::Inserted)
            .count();
        debug!(
            "Upserted {} records into `{}` ({} new)",
            outcomes.len(),
            self.collection,
            inserted
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annoload_core::build_storage_key;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn record() -> AnnotationRecord {
        let ct = ConsequenceType {
            so_terms: vec!["intergenic_variant".to_string()],
            ..Default::default()
        };
        AnnotationRecord::new("20", 60343, 60343, "G", "A")
            .with_consequence_type(ct)
            .with_xref(Xref::new("rs1", "dbSNP"))
    }

    #[rstest]
    fn test_same_record_twice_is_one_document(record: AnnotationRecord) {
        let store = DocumentStore::new();
        let key = build_storage_key("20", 60343, "G", "A");

        assert_eq!(store.upsert("variants", key.clone(), &record).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert("variants", key.clone(), &record).unwrap(), UpsertOutcome::Unchanged);

        assert_eq!(store.len("variants").unwrap(), 1);
        let doc = store.get("variants", &key).unwrap().unwrap();
        assert_eq!(doc.annot.consequence_types.len(), 1);
        assert_eq!(doc.annot.xrefs.len(), 1);
    }

    #[rstest]
    fn test_new_consequence_updates_document(record: AnnotationRecord) {
        let store = DocumentStore::new();
        let key = build_storage_key("20", 60343, "G", "A");
        store.upsert("variants", key.clone(), &record).unwrap();

        let other = ConsequenceType {
            ensembl_transcript_id: Some("ENST00000608838".to_string()),
            so_terms: vec!["upstream_gene_variant".to_string()],
            ..Default::default()
        };
        let second = AnnotationRecord::new("20", 60343, 60343, "G", "A").with_consequence_type(other);
        assert_eq!(store.upsert("variants", key.clone(), &second).unwrap(), UpsertOutcome::Updated);

        let doc = store.get("variants", &key).unwrap().unwrap();
        assert_eq!(doc.annot.consequence_types.len(), 2);
    }

    #[rstest]
    fn test_collections_are_separate(record: AnnotationRecord) {
        let store = DocumentStore::new();
        let key = build_storage_key("20", 60343, "G", "A");
        store.upsert("variants", key.clone(), &record).unwrap();

        assert!(store.get("other", &key).unwrap().is_none());
        assert_eq!(store.len("other").unwrap(), 0);
        assert_eq!(store.collection_names().unwrap(), vec!["variants".to_string()]);
    }

    #[rstest]
    fn test_snapshot_round_trip(record: AnnotationRecord) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = DocumentStore::new();
        let mut sink = StoreSink::new(store.clone(), "variants");
        sink.write(&[record]).unwrap();
        store.save(&path).unwrap();

        let reopened = DocumentStore::open(&path).unwrap();
        let key = build_storage_key("20", 60343, "G", "A");
        assert_eq!(
            reopened.get("variants", &key).unwrap(),
            store.get("variants", &key).unwrap()
        );
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_open_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("missing.json")).unwrap();
        assert!(store.collection_names().unwrap().is_empty());
    }

    #[test]
    fn test_open_corrupt_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(DocumentStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_document_uses_mongo_style_field_names() {
        let record = AnnotationRecord::new("1", 5, 5, "A", "T");
        let doc = AnnotationDocument::from_record(build_storage_key("1", 5, "A", "T"), &record);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_id"], "1_5_A_T");
        assert!(json["annot"]["ct"].is_array());
    }
}
