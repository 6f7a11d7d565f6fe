//! Record validation: structural checks on untrusted persisted input.
//!
//! Persisted records come back from a medium the visitor controls, so they
//! are parsed into a loose JSON value first and only trusted once they pass
//! [`RecordSchema::check`].

use serde_json::Value;

use crate::error::SchemaViolation;

/// Key holding the configuration version a record was written under.
pub const VERSION_KEY: &str = "version";

/// Key holding the grant map.
pub const GRANTS_KEY: &str = "grants";

/// The schema a persisted record must satisfy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordSchema;

impl RecordSchema {
    /// The schema applied when restoring grants.
    pub const STRICT: Self = RecordSchema;

    /// Validate a parsed record.
    ///
    /// This performs:
    /// - Object check
    /// - Exact key set (`version`, `grants`)
    /// - Version type check
    /// - Grants type, emptiness and member checks
    pub fn check(&self, value: &Value) -> Result<(), SchemaViolation> {
        // 1. Must be a plain object
        let object = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

        // 2. No extras
        if let Some(extra) = object
            .keys()
            .find(|k| k.as_str() != VERSION_KEY && k.as_str() != GRANTS_KEY)
        {
            return Err(SchemaViolation::UnexpectedKey(extra.clone()));
        }

        // 3. Version
        match object.get(VERSION_KEY) {
            None => return Err(SchemaViolation::MissingKey(VERSION_KEY)),
            Some(Value::String(_)) => {}
            Some(_) => return Err(SchemaViolation::VersionNotString),
        }

        // 4. Grants
        let grants = match object.get(GRANTS_KEY) {
            None => return Err(SchemaViolation::MissingKey(GRANTS_KEY)),
            Some(Value::Object(grants)) => grants,
            Some(_) => return Err(SchemaViolation::GrantsNotObject),
        };

        if grants.is_empty() {
            return Err(SchemaViolation::EmptyGrants);
        }

        if let Some((id, _)) = grants.iter().find(|(_, v)| !v.is_boolean()) {
            return Err(SchemaViolation::NonBooleanGrant(id.clone()));
        }

        Ok(())
    }

    /// Whether `value` satisfies the schema.
    pub fn validate(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_valid_record() {
        let value = json!({ "version": "1", "grants": { "analytics": true, "ads": false } });
        assert!(RecordSchema::STRICT.validate(&value));
    }

    #[test]
    fn test_not_an_object() {
        for value in [json!([1, 2]), json!("text"), json!(null), json!(3)] {
            assert_eq!(
                RecordSchema::STRICT.check(&value),
                Err(SchemaViolation::NotAnObject)
            );
        }
    }

    #[test]
    fn test_extra_key() {
        let value = json!({ "version": "1", "grants": { "a": true }, "extra": 1 });
        assert_eq!(
            RecordSchema::STRICT.check(&value),
            Err(SchemaViolation::UnexpectedKey("extra".into()))
        );
    }

    #[test]
    fn test_missing_keys() {
        let value = json!({ "grants": { "a": true } });
        assert_eq!(
            RecordSchema::STRICT.check(&value),
            Err(SchemaViolation::MissingKey(VERSION_KEY))
        );

        let value = json!({ "version": "1" });
        assert_eq!(
            RecordSchema::STRICT.check(&value),
            Err(SchemaViolation::MissingKey(GRANTS_KEY))
        );
    }

    #[test]
    fn test_version_must_be_string() {
        let value = json!({ "version": 1, "grants": { "a": true } });
        assert_eq!(
            RecordSchema::STRICT.check(&value),
            Err(SchemaViolation::VersionNotString)
        );
    }

    #[test]
    fn test_grants_must_be_object() {
        let value = json!({ "version": "1", "grants": [true] });
        assert_eq!(
            RecordSchema::STRICT.check(&value),
            Err(SchemaViolation::GrantsNotObject)
        );
    }

    #[test]
    fn test_empty_grants() {
        let value = json!({ "version": "1", "grants": {} });
        assert_eq!(
            RecordSchema::STRICT.check(&value),
            Err(SchemaViolation::EmptyGrants)
        );
    }

    proptest! {
        #[test]
        fn test_boolean_grants_always_valid(
            version in ".*",
            grants in prop::collection::btree_map("[a-z]{1,12}", any::<bool>(), 1..8),
        ) {
            let value = json!({ "version": version, "grants": grants });
            prop_assert!(RecordSchema::STRICT.validate(&value));
        }

        #[test]
        fn test_numeric_grant_always_rejected(id in "[a-z]{1,12}", n in any::<i64>()) {
            let value = json!({ "version": "1", "grants": { id.clone(): n } });
            prop_assert_eq!(
                RecordSchema::STRICT.check(&value),
                Err(SchemaViolation::NonBooleanGrant(id))
            );
        }
    }

    #[test]
    fn test_non_boolean_grant() {
        let value = json!({ "version": "1", "grants": { "a": true, "b": "yes" } });
        assert_eq!(
            RecordSchema::STRICT.check(&value),
            Err(SchemaViolation::NonBooleanGrant("b".into()))
        );
    }
}
