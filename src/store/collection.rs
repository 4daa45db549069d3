use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::{Record, StorageBackend, StoreError, generate_id};

/// Entry point of the store: owns the backend and opens typed collections.
#[derive(Clone)]
pub struct CollectionStore {
    backend: Arc<dyn StorageBackend>,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Load the named collection from the backend. Call once per collection
    /// during bootstrap and share the returned handle.
    pub async fn open<T: Record>(&self, name: &str) -> Result<Collection<T>, StoreError> {
        let records: Vec<T> = match self.backend.get(name).await? {
            Some(blob) => serde_json::from_slice(&blob)?,
            None => Vec::new(),
        };
        debug!(collection = name, count = records.len(), "loaded collection");

        Ok(Collection {
            name: name.to_string(),
            backend: self.backend.clone(),
            records: RwLock::new(records),
            writer: Mutex::new(()),
        })
    }
}

/// An id-keyed list of records, kept in insertion order.
///
/// Reads share a read guard. Writes are serialized through `writer`, run
/// against a working copy and only become visible after the backend accepted
/// the new blob.
pub struct Collection<T> {
    name: String,
    backend: Arc<dyn StorageBackend>,
    records: RwLock<Vec<T>>,
    writer: Mutex<()>,
}

impl<T: Record> Collection<T> {
    pub async fn get_by_id(&self, id: &str) -> Option<T> {
        self.records.read().await.iter().find(|r| r.id() == id).cloned()
    }

    pub async fn get_all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn query(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }

    pub async fn create(&self, record: T) -> Result<T, StoreError> {
        self.transact(|batch| batch.insert(record)).await
    }

    /// Returns `None` when no record has this id.
    pub async fn update(&self, id: &str, f: impl FnOnce(&mut T)) -> Result<Option<T>, StoreError> {
        self.transact(|batch| Ok::<_, StoreError>(batch.update(id, f))).await
    }

    /// Returns `false` when no record has this id.
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        self.transact(|batch| Ok::<_, StoreError>(batch.retain(|r| r.id() != id) > 0))
            .await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.transact(|batch| {
            batch.retain(|_| false);
            Ok::<_, StoreError>(())
        })
        .await
    }

    /// Run `f` against a working copy of the collection while holding the
    /// write lock. The copy is persisted and swapped in only if `f` succeeds
    /// and the backend write succeeds; otherwise nothing changes.
    pub async fn transact<R, E>(
        &self,
        f: impl FnOnce(&mut Batch<T>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _writer = self.writer.lock().await;

        let mut batch = Batch {
            records: self.records.read().await.clone(),
            now: Utc::now(),
            dirty: false,
        };
        let out = f(&mut batch)?;

        if batch.dirty {
            let blob = serde_json::to_vec(&batch.records).map_err(StoreError::from)?;
            self.backend.set(&self.name, blob).await?;
            debug!(collection = %self.name, count = batch.records.len(), "persisted collection");
            *self.records.write().await = batch.records;
        }

        Ok(out)
    }
}

/// Working copy handed to [`Collection::transact`].
pub struct Batch<T> {
    records: Vec<T>,
    now: DateTime<Utc>,
    dirty: bool,
}

impl<T: Record> Batch<T> {
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Assigns an id and timestamps when absent. Fails if the id is taken.
    pub fn insert(&mut self, mut record: T) -> Result<T, StoreError> {
        if record.id().is_empty() {
            record.set_id(generate_id());
        } else if self.get(record.id()).is_some() {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        let created_at = record.created_at().unwrap_or(self.now);
        record.stamp(created_at, self.now);

        self.records.push(record.clone());
        self.dirty = true;
        Ok(record)
    }

    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut T)) -> Option<T> {
        let now = self.now;
        let record = self.records.iter_mut().find(|r| r.id() == id)?;
        f(record);
        let created_at = record.created_at().unwrap_or(now);
        record.stamp(created_at, now);
        self.dirty = true;
        Some(record.clone())
    }

    /// Keep only records matching `keep`; returns how many were dropped.
    pub fn retain(&mut self, keep: impl Fn(&T) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(|r| keep(r));
        let removed = before - self.records.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }
}
