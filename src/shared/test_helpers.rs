use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::features::images::models::ImageRecord;
use crate::modules::metadata::MetadataStore;
use crate::modules::storage::ObjectStore;
use crate::modules::{StoreError, StoreResult};

/// Build a record with a fixed upload time (RFC 3339)
pub fn image_record_at(id: &str, uploaded_at: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        filename: format!("{}.png", id),
        content_type: "image/png".to_string(),
        size: 3,
        uploaded_at: DateTime::parse_from_rfc3339(uploaded_at)
            .unwrap()
            .with_timezone(&Utc),
        url: format!("memory://images/{}-{}.png", id, id),
    }
}

/// Object store fake keeping payloads in memory
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Payload and content type stored under `key`
    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StoreResult<String> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::ObjectStore("put refused".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(format!("memory://images/{}", key))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::ObjectStore("delete refused".to_string()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

enum Entry {
    Record(ImageRecord),
    Malformed,
}

/// Metadata store fake that scans in insertion order
#[derive(Default)]
pub struct InMemoryMetadataStore {
    entries: Mutex<Vec<Entry>>,
    fail_puts: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Seed a record directly, bypassing the upload workflow
    pub fn insert(&self, record: ImageRecord) {
        self.entries.lock().unwrap().push(Entry::Record(record));
    }

    /// Seed an item that cannot be decoded into a record
    pub fn insert_malformed(&self) {
        self.entries.lock().unwrap().push(Entry::Malformed);
    }

    /// Decodable records in insertion order
    pub fn records(&self) -> Vec<ImageRecord> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Record(record) => Some(record.clone()),
                Entry::Malformed => None,
            })
            .collect()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put(&self, record: &ImageRecord) -> StoreResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::MetadataStore("put refused".to_string()));
        }
        let mut entries = self.entries.lock().unwrap();
        let existing = entries
            .iter()
            .position(|entry| matches!(entry, Entry::Record(r) if r.id == record.id));
        match existing {
            Some(pos) => entries[pos] = Entry::Record(record.clone()),
            None => entries.push(Entry::Record(record.clone())),
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<ImageRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::MetadataStore("read refused".to_string()));
        }
        Ok(self
            .records()
            .into_iter()
            .find(|record| record.id == id))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.entries
            .lock()
            .unwrap()
            .retain(|entry| !matches!(entry, Entry::Record(r) if r.id == id));
        Ok(())
    }

    async fn scan_all(&self) -> StoreResult<Vec<StoreResult<ImageRecord>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::MetadataStore("scan refused".to_string()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|entry| match entry {
                Entry::Record(record) => Ok(record.clone()),
                Entry::Malformed => Err(StoreError::MalformedRecord(
                    "missing `filename`".to_string(),
                )),
            })
            .collect())
    }
}
