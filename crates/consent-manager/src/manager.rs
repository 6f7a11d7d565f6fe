//! The consent manager.
//!
//! Owns the grant state for one effective configuration, restores it from the
//! record store at construction, and runs the change protocol: apply, notify,
//! mark customized, persist.

use std::cell::{Cell, RefCell};

use consent_core::{
    ConsentDefaults, ConsentOptions, EffectiveConfig, GrantMap, PersistedRecord, RecordSchema,
    SchemaViolation, Target,
};
use consent_events::{Channel, EventDispatcher, Listener};
use consent_grants::{GrantStore, SetOutcome};
use consent_store::{LoadOutcome, RecordStore, RecordStoreExt};
use tracing::{debug, warn};

use crate::error::Result;
use crate::view::ControlRow;

/// What construction found under the storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A current record was applied over the seeded grants.
    Restored {
        /// Grants taken from the record.
        entries: usize,
    },
    /// A well-formed record written for another version; ignored.
    Stale {
        /// Version found in the record.
        found: String,
    },
    /// No usable record.
    Absent,
    /// A record was present but failed validation; ignored.
    Malformed(SchemaViolation),
}

/// A listener registered on a [`ConsentManager`].
///
/// Listeners receive the manager itself and may call back into it, including
/// [`ConsentManager::set_grant`].
pub type ManagerListener<S> = Listener<ConsentManager<S>>;

/// Per-category consent state for one configuration.
///
/// The manager is single-threaded: all methods take `&self`, and listeners run
/// synchronously inside [`ConsentManager::set_grant`].
pub struct ConsentManager<S: RecordStore> {
    /// Effective configuration, fixed at construction.
    config: EffectiveConfig,
    /// Persistence medium.
    store: S,
    /// Authoritative grants.
    grants: RefCell<GrantStore>,
    /// Set once a current record was found or a grant was changed.
    customized: Cell<bool>,
    /// Result of the construction-time restore.
    restore: RestoreOutcome,
    /// Change listeners.
    events: EventDispatcher<ConsentManager<S>>,
}

impl<S: RecordStore> ConsentManager<S> {
    /// Create a manager from caller options and the built-in defaults.
    pub fn new(options: ConsentOptions, store: S) -> Self {
        Self::with_defaults(options, &ConsentDefaults::default(), store)
    }

    /// Create a manager from caller options merged over `defaults`.
    pub fn with_defaults(options: ConsentOptions, defaults: &ConsentDefaults, store: S) -> Self {
        let config = consent_core::resolve(options, defaults);
        Self::from_config(config, store)
    }

    /// Create a manager from JSON options.
    pub fn from_json(options: &str, store: S) -> Result<Self> {
        let options = ConsentOptions::from_json(options)?;
        Ok(Self::new(options, store))
    }

    /// Create a manager from an already resolved configuration.
    pub fn from_config(config: EffectiveConfig, store: S) -> Self {
        let mut grants = GrantStore::seed(&config);
        let restore = restore_grants(&config, &store, &mut grants);
        let customized = matches!(restore, RestoreOutcome::Restored { .. });

        Self {
            config,
            store,
            grants: RefCell::new(grants),
            customized: Cell::new(customized),
            restore,
            events: EventDispatcher::new(),
        }
    }

    /// The effective configuration.
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// The store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of every grant, in category order.
    pub fn grants(&self) -> GrantMap {
        self.grants.borrow().grants().clone()
    }

    /// Grant for `id`, if it names a known category.
    pub fn grant(&self, id: &str) -> Option<bool> {
        self.grants.borrow().get(id)
    }

    /// Whether the visitor's decisions have been recorded.
    pub fn is_customized(&self) -> bool {
        self.customized.get()
    }

    /// Whether a first-visit prompt should be shown.
    pub fn should_prompt(&self) -> bool {
        !self.is_customized()
    }

    /// What construction found in the store.
    pub fn restore_outcome(&self) -> &RestoreOutcome {
        &self.restore
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Changes
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the grant for a category, or for every category with `*`.
    ///
    /// Unknown and required categories are left alone without notification.
    /// Otherwise the grant is written (even if unchanged), `update` and then
    /// `grant` or `revoke` are dispatched, the manager becomes customized and
    /// the full grant map is persisted. Persistence failures are logged, not
    /// returned.
    ///
    /// The wildcard expands to the categories known at the time of the call
    /// and runs the single-category protocol once per category, in order.
    pub fn set_grant<'a>(&self, target: impl Into<Target<'a>>, desired: bool) -> SetOutcome {
        match target.into() {
            Target::Category(id) => self.apply(id, desired),
            Target::All => {
                let ids = self.grants.borrow().ids();
                let mut applied = 0;
                for id in &ids {
                    if self.apply(id, desired).is_applied() {
                        applied += 1;
                    }
                }
                SetOutcome::Wildcard { applied }
            }
        }
    }

    fn apply(&self, id: &str, desired: bool) -> SetOutcome {
        let outcome = self.grants.borrow_mut().apply(id, desired);
        if !outcome.is_applied() {
            debug!(category = %id, ?outcome, "grant change ignored");
            return outcome;
        }

        self.events.dispatch(Channel::Update, self, id);
        self.events.dispatch(Channel::for_grant(desired), self, id);
        self.customized.set(true);

        if let Err(e) = self.flush() {
            warn!(key = %self.config.storage_key, error = %e, "failed to persist consent record");
        }

        outcome
    }

    /// Write the current grants to the store.
    pub fn flush(&self) -> Result<()> {
        let record = PersistedRecord::new(self.config.version.clone(), self.grants());
        self.store
            .save_record(&self.config.storage_key, &record, &self.config.expires)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listeners
    // ─────────────────────────────────────────────────────────────────────────

    /// Register `listener` on `channel`.
    pub fn on(&self, channel: Channel, listener: ManagerListener<S>) {
        self.events.on(channel, listener);
    }

    /// Remove the first registration of `listener` on `channel`.
    pub fn off(&self, channel: Channel, listener: &ManagerListener<S>) -> bool {
        self.events.off(channel, listener)
    }

    /// Number of listeners on `channel`.
    pub fn listener_count(&self, channel: Channel) -> usize {
        self.events.listener_count(channel)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────

    /// One control row per category, in category order.
    pub fn controls(&self) -> Vec<ControlRow> {
        let grants = self.grants.borrow();
        grants
            .grants()
            .iter()
            .filter_map(|(id, granted)| {
                let category = self.config.category(id)?;
                Some(ControlRow {
                    id: id.to_string(),
                    label: category.label.clone(),
                    description: category.description.clone(),
                    checked: category.required || granted,
                    disabled: category.required,
                })
            })
            .collect()
    }
}

/// Overlay a current record from `store` onto the seeded `grants`.
fn restore_grants<S: RecordStore>(
    config: &EffectiveConfig,
    store: &S,
    grants: &mut GrantStore,
) -> RestoreOutcome {
    let key = &config.storage_key;

    match store.load_record(key, &RecordSchema::STRICT) {
        Ok(LoadOutcome::Loaded(record)) if record.is_current(&config.version) => {
            let entries = grants.restore(&record);
            debug!(key = %key, entries, "restored consent record");
            RestoreOutcome::Restored { entries }
        }
        Ok(LoadOutcome::Loaded(record)) => {
            debug!(key = %key, found = %record.version, expected = %config.version, "ignoring stale consent record");
            RestoreOutcome::Stale {
                found: record.version,
            }
        }
        Ok(LoadOutcome::Malformed(violation)) => {
            warn!(key = %key, reason = %violation, "persisted consent record is invalid, using defaults");
            RestoreOutcome::Malformed(violation)
        }
        Ok(LoadOutcome::Absent) => RestoreOutcome::Absent,
        Err(e) => {
            warn!(key = %key, error = %e, "failed to read consent record, using defaults");
            RestoreOutcome::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_core::{CategoryDefinition, ExpiryPolicy};
    use consent_events::listener;
    use consent_store::MemoryStore;
    use std::rc::Rc;

    fn options() -> ConsentOptions {
        ConsentOptions::new()
            .category(CategoryDefinition::required("essential", "Essential", "Always on"))
            .category(CategoryDefinition::optional("stats", "Statistics", "Usage metrics"))
            .category(CategoryDefinition::optional("ads", "Advertising", "Personalised ads"))
    }

    #[test]
    fn test_fresh_manager() {
        let manager = ConsentManager::new(options(), MemoryStore::new());

        assert_eq!(manager.grants().len(), 3);
        assert_eq!(manager.grant("essential"), Some(true));
        assert_eq!(manager.grant("stats"), Some(false));
        assert!(!manager.is_customized());
        assert!(manager.should_prompt());
        assert_eq!(manager.restore_outcome(), &RestoreOutcome::Absent);
        assert!(manager.store().is_empty());
    }

    #[test]
    fn test_set_grant_persists() {
        let manager = ConsentManager::new(options(), MemoryStore::new());

        let outcome = manager.set_grant("stats", true);

        assert_eq!(outcome, SetOutcome::Applied { previous: false });
        assert!(manager.is_customized());
        let raw = manager.store().read("consent-manager").unwrap().unwrap();
        assert_eq!(
            raw,
            r#"{"version":"1","grants":{"essential":true,"stats":true,"ads":false}}"#
        );
    }

    #[test]
    fn test_ignored_changes_write_nothing() {
        let manager = ConsentManager::new(options(), MemoryStore::new());

        assert_eq!(manager.set_grant("essential", false), SetOutcome::Required);
        assert_eq!(manager.set_grant("nope", true), SetOutcome::Unknown);

        assert!(!manager.is_customized());
        assert!(manager.store().is_empty());
    }

    #[test]
    fn test_wildcard_counts() {
        let manager = ConsentManager::new(options(), MemoryStore::new());

        assert_eq!(manager.set_grant("*", true), SetOutcome::Wildcard { applied: 2 });
        assert_eq!(manager.grant("ads"), Some(true));
        assert_eq!(manager.grant("stats"), Some(true));
    }

    #[test]
    fn test_wildcard_without_categories() {
        let manager = ConsentManager::new(ConsentOptions::new(), MemoryStore::new());

        let outcome = manager.set_grant(Target::All, true);

        assert_eq!(outcome, SetOutcome::Wildcard { applied: 0 });
        assert!(!outcome.is_applied());
        assert!(!manager.is_customized());
    }

    #[test]
    fn test_listener_sees_new_value() {
        let manager = ConsentManager::new(options(), MemoryStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&seen);
        manager.on(
            Channel::Update,
            listener(move |m: &ConsentManager<MemoryStore>, id: &str| {
                s.borrow_mut().push((id.to_string(), m.grant(id)));
            }),
        );
        manager.set_grant("ads", true);

        assert_eq!(*seen.borrow(), vec![("ads".to_string(), Some(true))]);
    }

    #[test]
    fn test_controls() {
        let manager = ConsentManager::new(options(), MemoryStore::new());
        manager.set_grant("ads", true);

        let rows = manager.controls();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].checked && rows[0].disabled);
        assert!(!rows[1].checked && !rows[1].disabled);
        assert!(rows[2].checked);
        assert_eq!(rows[2].label, "Advertising");
    }

    #[test]
    fn test_session_scoped_record() {
        let store = MemoryStore::new();
        let manager = ConsentManager::new(options().expires(ExpiryPolicy::Session), store);
        manager.set_grant("stats", true);

        assert_eq!(manager.store().end_session().unwrap(), 1);
        assert!(manager.store().is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ConsentManager::from_json("{nope", MemoryStore::new()).is_err());
    }
}
