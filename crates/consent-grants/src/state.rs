//! Grant state.
//!
//! The grant store is seeded from the effective configuration and can be
//! overlaid once with a persisted record. After that, the only way to change a
//! grant is [`GrantStore::apply`], which refuses unknown and required
//! categories.

use std::collections::BTreeSet;

use consent_core::{EffectiveConfig, GrantMap, PersistedRecord};

/// Result of applying a single grant change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The grant was written (possibly to the value it already had).
    Applied {
        /// Value before the change.
        previous: bool,
    },
    /// No category with this identifier.
    Unknown,
    /// The category is required and stays granted.
    Required,
    /// The wildcard target was expanded to every known category.
    Wildcard {
        /// Number of categories the change was applied to.
        applied: usize,
    },
}

impl SetOutcome {
    /// Whether at least one grant was written.
    pub fn is_applied(&self) -> bool {
        match self {
            SetOutcome::Applied { .. } => true,
            SetOutcome::Wildcard { applied } => *applied > 0,
            SetOutcome::Unknown | SetOutcome::Required => false,
        }
    }
}

/// Authoritative category identifier to grant mapping.
///
/// Invariants:
/// - The key set equals the configuration's category identifiers.
/// - Every required category is `true`.
#[derive(Debug, Clone, Default)]
pub struct GrantStore {
    /// Grants in category order.
    grants: GrantMap,

    /// Identifiers whose effective definition is required.
    required: BTreeSet<String>,
}

impl GrantStore {
    /// Seed every category with `required || default || false`.
    ///
    /// With duplicate identifiers the last definition decides both the value
    /// and whether the category is required.
    pub fn seed(config: &EffectiveConfig) -> Self {
        let mut grants = GrantMap::new();
        for category in &config.categories {
            grants.insert(category.id.clone(), category.seed_value());
        }

        let required = grants
            .ids()
            .filter(|id| config.is_required(id))
            .map(String::from)
            .collect();

        Self { grants, required }
    }

    /// Overlay a persisted record onto the seeded grants.
    ///
    /// Only non-required categories present in both the store and the record
    /// are overwritten; entries for unknown categories are ignored. Returns the
    /// number of grants taken from the record.
    pub fn restore(&mut self, record: &PersistedRecord) -> usize {
        let mut restored = 0;
        let ids: Vec<String> = self.grants.ids().map(String::from).collect();

        for id in ids {
            if self.required.contains(&id) {
                continue;
            }
            if let Some(granted) = record.grants.get(&id) {
                self.grants.update(&id, granted);
                restored += 1;
            }
        }

        restored
    }

    /// Set the grant for `id`.
    pub fn apply(&mut self, id: &str, desired: bool) -> SetOutcome {
        if self.required.contains(id) {
            return SetOutcome::Required;
        }

        match self.grants.update(id, desired) {
            Some(previous) => SetOutcome::Applied { previous },
            None => SetOutcome::Unknown,
        }
    }

    /// Grant for `id`, if known.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.grants.get(id)
    }

    /// Whether `id` is a required category.
    pub fn is_required(&self, id: &str) -> bool {
        self.required.contains(id)
    }

    /// Whether `id` is a known category.
    pub fn contains(&self, id: &str) -> bool {
        self.grants.contains(id)
    }

    /// All grants in category order.
    pub fn grants(&self) -> &GrantMap {
        &self.grants
    }

    /// Identifiers in category order.
    pub fn ids(&self) -> Vec<String> {
        self.grants.ids().map(String::from).collect()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_core::{CategoryDefinition, ConsentOptions};
    use proptest::prelude::*;

    fn config() -> EffectiveConfig {
        ConsentOptions::new()
            .category(CategoryDefinition::required("essential", "Essential", ""))
            .category(CategoryDefinition::optional("stats", "Statistics", "").with_default(true))
            .category(CategoryDefinition::optional("ads", "Advertising", ""))
            .resolve()
    }

    #[test]
    fn test_seed() {
        let store = GrantStore::seed(&config());

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("essential"), Some(true));
        assert_eq!(store.get("stats"), Some(true));
        assert_eq!(store.get("ads"), Some(false));
        assert_eq!(store.ids(), vec!["essential", "stats", "ads"]);
    }

    #[test]
    fn test_restore_skips_required_and_missing() {
        let mut store = GrantStore::seed(&config());
        let grants: GrantMap = [("essential", false), ("ads", true), ("ghost", true)]
            .into_iter()
            .collect();

        let restored = store.restore(&PersistedRecord::new("1", grants));

        assert_eq!(restored, 1);
        assert_eq!(store.get("essential"), Some(true));
        assert_eq!(store.get("stats"), Some(true)); // missing from record, seed kept
        assert_eq!(store.get("ads"), Some(true));
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn test_apply() {
        let mut store = GrantStore::seed(&config());

        assert_eq!(store.apply("ads", true), SetOutcome::Applied { previous: false });
        assert_eq!(store.apply("ads", true), SetOutcome::Applied { previous: true });
        assert_eq!(store.apply("essential", false), SetOutcome::Required);
        assert_eq!(store.apply("missing", true), SetOutcome::Unknown);

        assert_eq!(store.get("essential"), Some(true));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_duplicate_identifiers_last_wins() {
        let config = ConsentOptions::new()
            .category(CategoryDefinition::required("x", "X", ""))
            .category(CategoryDefinition::optional("y", "Y", ""))
            .category(CategoryDefinition::optional("x", "X", ""))
            .resolve();
        let mut store = GrantStore::seed(&config);

        assert_eq!(store.ids(), vec!["x", "y"]);
        assert_eq!(store.get("x"), Some(false));
        assert!(!store.is_required("x"));
        assert!(store.apply("x", true).is_applied());
    }

    #[test]
    fn test_outcome_is_applied() {
        assert!(SetOutcome::Wildcard { applied: 2 }.is_applied());
        assert!(!SetOutcome::Wildcard { applied: 0 }.is_applied());
        assert!(!SetOutcome::Required.is_applied());
    }

    proptest! {
        #[test]
        fn test_required_never_changes(ops in prop::collection::vec(("[a-z]{1,3}|essential", any::<bool>()), 0..32)) {
            let mut store = GrantStore::seed(&config());
            for (id, desired) in ops {
                store.apply(&id, desired);
                prop_assert_eq!(store.get("essential"), Some(true));
                prop_assert_eq!(store.len(), 3);
            }
        }
    }
}
