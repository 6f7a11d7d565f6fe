//! Golden record vectors.
//!
//! Raw persisted values with the verdict every record decoder must reach.
//! They pin down the schema: exact key set, string version, non-empty
//! boolean grants.

use consent_core::{Decoded, PersistedRecord, RecordSchema};

/// How a raw value must decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Well-formed record.
    Valid,
    /// JSON that violates the record schema.
    Malformed,
    /// Not JSON at all; treated like a missing record.
    Unparseable,
}

/// A golden record vector.
#[derive(Debug, Clone)]
pub struct GoldenRecord {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Raw stored value.
    pub raw: &'static str,
    /// Expected verdict under the strict schema.
    pub verdict: Verdict,
}

/// Get all golden record vectors.
pub fn all_records() -> Vec<GoldenRecord> {
    vec![
        GoldenRecord {
            name: "minimal record",
            raw: r#"{"version":"1","grants":{"analytics":true}}"#,
            verdict: Verdict::Valid,
        },
        GoldenRecord {
            name: "keys in either order",
            raw: r#"{"grants":{"essential":true,"marketing":false},"version":"2"}"#,
            verdict: Verdict::Valid,
        },
        GoldenRecord {
            name: "empty version string",
            raw: r#"{"version":"","grants":{"a":false}}"#,
            verdict: Verdict::Valid,
        },
        GoldenRecord {
            name: "extra top-level key",
            raw: r#"{"version":"1","grants":{"a":true},"expires":123}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "missing grants",
            raw: r#"{"version":"1"}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "missing version",
            raw: r#"{"grants":{"a":true}}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "numeric version",
            raw: r#"{"version":1,"grants":{"a":true}}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "empty grants",
            raw: r#"{"version":"1","grants":{}}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "grants as array",
            raw: r#"{"version":"1","grants":[true]}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "string grant",
            raw: r#"{"version":"1","grants":{"a":"true"}}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "null grant",
            raw: r#"{"version":"1","grants":{"a":true,"b":null}}"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "top-level array",
            raw: r#"[{"version":"1","grants":{"a":true}}]"#,
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "top-level null",
            raw: "null",
            verdict: Verdict::Malformed,
        },
        GoldenRecord {
            name: "truncated",
            raw: r#"{"version":"1","grants":{"a":tr"#,
            verdict: Verdict::Unparseable,
        },
        GoldenRecord {
            name: "empty value",
            raw: "",
            verdict: Verdict::Unparseable,
        },
    ]
}

/// Decode a raw value and classify the result.
pub fn classify(raw: &str) -> Verdict {
    match PersistedRecord::decode(raw, &RecordSchema::STRICT) {
        Decoded::Valid(_) => Verdict::Valid,
        Decoded::Malformed(_) => Verdict::Malformed,
        Decoded::Unparseable(_) => Verdict::Unparseable,
    }
}

/// Check every golden record. Returns `(name, passed, actual)` per vector.
pub fn verify_all_records() -> Vec<(String, bool, Verdict)> {
    all_records()
        .iter()
        .map(|v| {
            let actual = classify(v.raw);
            (v.name.to_string(), actual == v.verdict, actual)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_records_pass() {
        for (name, passed, actual) in verify_all_records() {
            assert!(passed, "Vector '{}' decoded as {:?}", name, actual);
        }
    }

    #[test]
    fn test_valid_records_reencode_canonically() {
        let raw = r#"{"grants":{"essential":true},"version":"2"}"#;
        let record = PersistedRecord::decode(raw, &RecordSchema::STRICT)
            .into_record()
            .unwrap();

        assert_eq!(
            record.encode().unwrap(),
            r#"{"version":"2","grants":{"essential":true}}"#
        );
    }
}
