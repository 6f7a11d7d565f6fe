//! Persisted record: the external snapshot of a visitor's decisions.
//!
//! The wire form is the JSON object `{"version": "...", "grants": {...}}`.
//! Decoding never fails hard: input that does not parse is reported as
//! [`Decoded::Unparseable`], and input that parses but breaks the schema is
//! reported as [`Decoded::Malformed`].

use serde::Serialize;
use serde_json::Value;

use crate::error::{CoreError, Result, SchemaViolation};
use crate::types::GrantMap;
use crate::validation::{RecordSchema, GRANTS_KEY, VERSION_KEY};

/// The `{version, grants}` snapshot written to the persistence medium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedRecord {
    /// Configuration version the grants were recorded under.
    pub version: String,

    /// Grants by category identifier.
    pub grants: GrantMap,
}

/// Result of decoding a raw persisted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The raw value is not JSON.
    Unparseable(String),
    /// The raw value is JSON but violates the record schema.
    Malformed(SchemaViolation),
    /// The raw value is a well-formed record.
    Valid(PersistedRecord),
}

impl PersistedRecord {
    /// Create a record.
    pub fn new(version: impl Into<String>, grants: GrantMap) -> Self {
        Self {
            version: version.into(),
            grants,
        }
    }

    /// Whether the record was written under `version`.
    pub fn is_current(&self, version: &str) -> bool {
        self.version == version
    }

    /// Encode to the JSON wire form.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Decode and validate a raw value against `schema`.
    pub fn decode(raw: &str, schema: &RecordSchema) -> Decoded {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => return Decoded::Unparseable(e.to_string()),
        };

        if let Err(violation) = schema.check(&value) {
            return Decoded::Malformed(violation);
        }

        match Self::from_checked(&value) {
            Some(record) => Decoded::Valid(record),
            // check() guarantees the shape; keep the failure non-fatal anyway
            None => Decoded::Malformed(SchemaViolation::NotAnObject),
        }
    }

    fn from_checked(value: &Value) -> Option<Self> {
        let version = value.get(VERSION_KEY)?.as_str()?;
        let grants = value
            .get(GRANTS_KEY)?
            .as_object()?
            .iter()
            .map(|(id, granted)| granted.as_bool().map(|g| (id.clone(), g)))
            .collect::<Option<Vec<_>>>()?;

        Some(Self::new(version, grants.into_iter().collect()))
    }
}

impl Decoded {
    /// The record, if decoding succeeded.
    pub fn into_record(self) -> Option<PersistedRecord> {
        match self {
            Decoded::Valid(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedRecord {
        let grants = [("essential", true), ("analytics", false)].into_iter().collect();
        PersistedRecord::new("3", grants)
    }

    #[test]
    fn test_encode_wire_form() {
        let encoded = sample().encode().unwrap();
        assert_eq!(
            encoded,
            r#"{"version":"3","grants":{"essential":true,"analytics":false}}"#
        );
    }

    #[test]
    fn test_decode_encoded_record() {
        let encoded = sample().encode().unwrap();
        let decoded = PersistedRecord::decode(&encoded, &RecordSchema::STRICT);

        let record = decoded.into_record().unwrap();
        assert_eq!(record.version, "3");
        assert_eq!(record.grants.get("essential"), Some(true));
        assert_eq!(record.grants.get("analytics"), Some(false));
    }

    #[test]
    fn test_decode_garbage_is_unparseable() {
        let decoded = PersistedRecord::decode("{not json", &RecordSchema::STRICT);
        assert!(matches!(decoded, Decoded::Unparseable(_)));
    }

    #[test]
    fn test_decode_schema_violation() {
        let decoded = PersistedRecord::decode(
            r#"{"version":"1","grants":{"a":1}}"#,
            &RecordSchema::STRICT,
        );
        assert_eq!(
            decoded,
            Decoded::Malformed(SchemaViolation::NonBooleanGrant("a".into()))
        );
    }

    #[test]
    fn test_is_current() {
        assert!(sample().is_current("3"));
        assert!(!sample().is_current("4"));
    }
}
