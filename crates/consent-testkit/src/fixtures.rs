//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use consent_core::{CategoryDefinition, ConsentOptions, ExpiryPolicy, GrantMap, PersistedRecord};
use consent_store::{MemoryStore, RecordStore, RecordStoreExt, StoreError};

/// Storage key used by fixtures.
pub const FIXTURE_KEY: &str = "consent-test";

/// A shared memory store plus a sample category set.
///
/// Cloning the `store` handle lets several managers read and write the same
/// records, the way several page loads share one cookie jar.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub version: String,
}

impl TestFixture {
    /// Create a fixture at version `"1"`.
    pub fn new() -> Self {
        Self::with_version("1")
    }

    /// Create a fixture at `version`.
    pub fn with_version(version: &str) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            version: version.to_string(),
        }
    }

    /// The sample categories: one required, two optional, one defaulting on.
    pub fn categories() -> Vec<CategoryDefinition> {
        vec![
            CategoryDefinition::required("essential", "Essential", "Needed for the site to work"),
            CategoryDefinition::optional("analytics", "Analytics", "Anonymous usage statistics"),
            CategoryDefinition::optional("marketing", "Marketing", "Personalised advertising"),
            CategoryDefinition::optional("preferences", "Preferences", "Remembered settings")
                .with_default(true),
        ]
    }

    /// Options for the sample categories at the fixture's version and key.
    pub fn options(&self) -> ConsentOptions {
        ConsentOptions::new()
            .version(self.version.clone())
            .storage_key(FIXTURE_KEY)
            .expires(ExpiryPolicy::Days(30))
            .categories(Self::categories())
    }

    /// Another handle to the shared store.
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    /// Write a raw value under the fixture key, bypassing the codec.
    pub fn put_raw(&self, raw: &str) {
        self.store
            .write(FIXTURE_KEY, raw, &ExpiryPolicy::Days(30))
            .expect("memory store write");
    }

    /// Write a well-formed record under the fixture key.
    pub fn put_record(&self, version: &str, grants: &[(&str, bool)]) {
        let grants: GrantMap = grants.iter().map(|&(id, g)| (id, g)).collect();
        self.store
            .save_record(
                FIXTURE_KEY,
                &PersistedRecord::new(version, grants),
                &ExpiryPolicy::Days(30),
            )
            .expect("memory store write");
    }

    /// Raw value under the fixture key.
    pub fn raw(&self) -> Option<String> {
        self.store.read(FIXTURE_KEY).expect("memory store read")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A store whose every operation fails, like a browser with cookies disabled.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn read(&self, _key: &str) -> consent_store::Result<Option<String>> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn write(&self, _key: &str, _value: &str, _expiry: &ExpiryPolicy) -> consent_store::Result<()> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn remove(&self, _key: &str) -> consent_store::Result<bool> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn end_session(&self) -> consent_store::Result<usize> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn purge_expired(&self) -> consent_store::Result<usize> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_core::RecordSchema;
    use consent_store::LoadOutcome;

    #[test]
    fn test_fixture_shares_store() {
        let fixture = TestFixture::new();
        let other = fixture.store();

        fixture.put_record("1", &[("analytics", true)]);

        match other.load_record(FIXTURE_KEY, &RecordSchema::STRICT).unwrap() {
            LoadOutcome::Loaded(record) => assert_eq!(record.grants.get("analytics"), Some(true)),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_options() {
        let config = TestFixture::with_version("7").options().resolve();

        assert_eq!(config.version, "7");
        assert_eq!(config.storage_key, FIXTURE_KEY);
        assert_eq!(config.categories.len(), 4);
    }

    #[test]
    fn test_unavailable_store() {
        let store = UnavailableStore;

        assert!(matches!(store.read("x"), Err(StoreError::Unavailable(_))));
        assert!(store.write("x", "y", &ExpiryPolicy::Session).is_err());
    }
}
