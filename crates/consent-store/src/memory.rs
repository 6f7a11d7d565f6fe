//! In-memory implementation of the RecordStore trait.
//!
//! This is primarily for testing and for embedding where the host keeps its
//! own persistence. It has the same expiry semantics as SQLite but keeps
//! everything in memory.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use consent_core::ExpiryPolicy;

use crate::error::{Result, StoreError};
use crate::traits::{now_millis, RecordStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<HashMap<String, StoredValue>>,
}

struct StoredValue {
    value: String,
    /// Unix ms deadline, `None` for session-scoped values.
    expires_at: Option<i64>,
}

impl StoredValue {
    fn is_live(&self, now: i64) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored values, including expired ones not yet purged.
    ///
    /// Counts through a poisoned lock.
    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(inner) => inner.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, HashMap<String, StoredValue>>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, StoredValue>>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let inner = self.read_guard()?;
        let now = now_millis();
        Ok(inner
            .get(key)
            .filter(|stored| stored.is_live(now))
            .map(|stored| stored.value.clone()))
    }

    fn write(&self, key: &str, value: &str, expiry: &ExpiryPolicy) -> Result<()> {
        let mut inner = self.write_guard()?;
        inner.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: expiry.deadline(now_millis()),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut inner = self.write_guard()?;
        Ok(inner.remove(key).is_some())
    }

    fn end_session(&self) -> Result<usize> {
        let mut inner = self.write_guard()?;
        let before = inner.len();
        inner.retain(|_, stored| stored.expires_at.is_some());
        Ok(before - inner.len())
    }

    fn purge_expired(&self) -> Result<usize> {
        let mut inner = self.write_guard()?;
        let now = now_millis();
        let before = inner.len();
        inner.retain(|_, stored| stored.is_live(now));
        Ok(before - inner.len())
    }
}
