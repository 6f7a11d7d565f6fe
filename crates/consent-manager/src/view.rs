//! Framework-neutral view helpers.
//!
//! Page integrations mark elements with `data-cm-*` metadata and toggle one
//! attribute on them depending on the current grants. [`ElementGate`] holds
//! that metadata and decides what to do; applying the decision to a real
//! element is up to the caller.

use consent_core::GrantMap;
use tracing::warn;

/// Comma-separated categories that unlock the element.
pub const ATTR_CATEGORIES: &str = "data-cm-categories";
/// Presence flips the decision.
pub const ATTR_INVERTED: &str = "data-cm-inverted";
/// Name of the attribute to toggle.
pub const ATTR_ATTRIBUTE: &str = "data-cm-attribute";
/// Value to set when unlocked.
pub const ATTR_VALUE: &str = "data-cm-value";

/// One row of a category settings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRow {
    pub id: String,
    pub label: String,
    pub description: String,
    /// Required or granted.
    pub checked: bool,
    /// Required categories cannot be toggled.
    pub disabled: bool,
}

/// What to do with a gated element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    /// Metadata incomplete; leave the element untouched.
    Skip,
    /// Set `attribute` to `value`.
    Set { attribute: String, value: String },
    /// Remove `attribute`.
    Remove { attribute: String },
}

/// Consent metadata of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementGate {
    pub categories: Option<String>,
    pub inverted: bool,
    pub attribute: Option<String>,
    pub value: Option<String>,
}

impl ElementGate {
    /// Read the gate from an element's attributes.
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut gate = Self::default();
        for (name, value) in attributes {
            match name.as_ref() {
                ATTR_CATEGORIES => gate.categories = Some(value.into()),
                ATTR_INVERTED => gate.inverted = true,
                ATTR_ATTRIBUTE => gate.attribute = Some(value.into()),
                ATTR_VALUE => gate.value = Some(value.into()),
                _ => {}
            }
        }
        gate
    }

    /// Whether any listed category is granted, after inversion.
    ///
    /// An element without categories is never granted, inverted or not.
    pub fn is_granted(&self, grants: &GrantMap) -> bool {
        let Some(list) = &self.categories else {
            warn!("element is missing {}", ATTR_CATEGORIES);
            return false;
        };

        let granted = list
            .split(',')
            .map(str::trim)
            .any(|id| grants.get(id).unwrap_or(false));

        granted != self.inverted
    }

    /// Decide the attribute change for the current grants.
    pub fn evaluate(&self, grants: &GrantMap) -> GateAction {
        let Some(attribute) = non_empty(&self.attribute) else {
            warn!("element is missing {}", ATTR_ATTRIBUTE);
            return GateAction::Skip;
        };
        let Some(value) = non_empty(&self.value) else {
            warn!(attribute = %attribute, "element is missing {}", ATTR_VALUE);
            return GateAction::Skip;
        };

        if self.is_granted(grants) {
            GateAction::Set {
                attribute: attribute.to_string(),
                value: value.to_string(),
            }
        } else {
            GateAction::Remove {
                attribute: attribute.to_string(),
            }
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grants() -> GrantMap {
        [("essential", true), ("stats", false), ("ads", true)]
            .into_iter()
            .collect()
    }

    fn gate(categories: &str) -> ElementGate {
        ElementGate {
            categories: Some(categories.to_string()),
            inverted: false,
            attribute: Some("src".to_string()),
            value: Some("https://example.com/tracker.js".to_string()),
        }
    }

    #[test]
    fn test_any_category_unlocks() {
        assert_eq!(
            gate("stats, ads").evaluate(&grants()),
            GateAction::Set {
                attribute: "src".into(),
                value: "https://example.com/tracker.js".into()
            }
        );
        assert_eq!(
            gate("stats,unknown").evaluate(&grants()),
            GateAction::Remove { attribute: "src".into() }
        );
    }

    #[test]
    fn test_inverted() {
        let mut fallback = gate("stats");
        fallback.inverted = true;

        assert!(fallback.is_granted(&grants()));
        assert!(matches!(fallback.evaluate(&grants()), GateAction::Set { .. }));
    }

    #[test]
    fn test_missing_metadata() {
        let mut no_value = gate("ads");
        no_value.value = Some(String::new());
        assert_eq!(no_value.evaluate(&grants()), GateAction::Skip);

        let mut no_attribute = gate("ads");
        no_attribute.attribute = None;
        assert_eq!(no_attribute.evaluate(&grants()), GateAction::Skip);

        let mut no_categories = gate("ads");
        no_categories.categories = None;
        assert_eq!(
            no_categories.evaluate(&grants()),
            GateAction::Remove { attribute: "src".into() }
        );
    }

    #[test]
    fn test_inverted_without_categories_stays_locked() {
        let mut orphan = gate("ads");
        orphan.categories = None;
        orphan.inverted = true;

        assert!(!orphan.is_granted(&grants()));
        assert_eq!(
            orphan.evaluate(&grants()),
            GateAction::Remove { attribute: "src".into() }
        );
    }

    #[test]
    fn test_from_attributes() {
        let gate = ElementGate::from_attributes([
            ("data-cm-categories", "ads"),
            ("data-cm-inverted", ""),
            ("data-cm-attribute", "class"),
            ("data-cm-value", "blocked"),
            ("id", "banner"),
        ]);

        assert_eq!(gate.categories.as_deref(), Some("ads"));
        assert!(gate.inverted);
        assert_eq!(
            gate.evaluate(&grants()),
            GateAction::Remove { attribute: "class".into() }
        );
    }
}
