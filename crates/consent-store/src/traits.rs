//! Store trait: the abstract interface for the persistence medium.
//!
//! A record store behaves like a browser cookie jar: string values under
//! string keys, each with either an absolute deadline or a session scope.
//! Implementations include SQLite (durable) and in-memory (for tests).

use std::sync::Arc;

use consent_core::{Decoded, ExpiryPolicy, PersistedRecord, RecordSchema, SchemaViolation};

use crate::error::Result;

/// Outcome of loading a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing usable under the key (missing, expired or not JSON).
    Absent,
    /// A value was present but violates the record schema.
    Malformed(SchemaViolation),
    /// A well-formed record.
    Loaded(PersistedRecord),
}

/// The RecordStore trait: synchronous key/value persistence with expiry.
///
/// # Design Notes
///
/// - **Expiry**: A value whose deadline has passed reads as absent.
/// - **Session scope**: Values written with [`ExpiryPolicy::Session`] have no
///   deadline and are dropped by [`RecordStore::end_session`].
/// - **Overwrite**: Writing an existing key replaces value and expiry.
pub trait RecordStore: Send + Sync {
    /// Read the raw value under `key`, if present and not expired.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key` with the given expiry policy.
    fn write(&self, key: &str, value: &str, expiry: &ExpiryPolicy) -> Result<()>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Drop every session-scoped value. Returns how many were removed.
    fn end_session(&self) -> Result<usize>;

    /// Drop every value whose deadline has passed. Returns how many were removed.
    fn purge_expired(&self) -> Result<usize>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str, expiry: &ExpiryPolicy) -> Result<()> {
        (**self).write(key, value, expiry)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn end_session(&self) -> Result<usize> {
        (**self).end_session()
    }

    fn purge_expired(&self) -> Result<usize> {
        (**self).purge_expired()
    }
}

/// Extension trait: the record codec on top of raw storage.
pub trait RecordStoreExt: RecordStore {
    /// Load and validate the record under `key`.
    ///
    /// Values that are not JSON are reported as [`LoadOutcome::Absent`].
    fn load_record(&self, key: &str, schema: &RecordSchema) -> Result<LoadOutcome> {
        let Some(raw) = self.read(key)? else {
            return Ok(LoadOutcome::Absent);
        };

        Ok(match PersistedRecord::decode(&raw, schema) {
            Decoded::Valid(record) => LoadOutcome::Loaded(record),
            Decoded::Malformed(violation) => LoadOutcome::Malformed(violation),
            Decoded::Unparseable(reason) => {
                tracing::debug!(key = %key, reason = %reason, "persisted value is not JSON");
                LoadOutcome::Absent
            }
        })
    }

    /// Encode and write `record` under `key`.
    fn save_record(&self, key: &str, record: &PersistedRecord, expiry: &ExpiryPolicy) -> Result<()> {
        let encoded = record.encode()?;
        self.write(key, &encoded, expiry)
    }
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
