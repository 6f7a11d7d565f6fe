//! Error types for the Consent Kernel Core.

use thiserror::Error;

/// Core errors that can occur while handling configuration and records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Reasons a persisted record fails the record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("record is not an object")]
    NotAnObject,

    #[error("missing key `{0}`")]
    MissingKey(&'static str),

    #[error("unexpected key `{0}`")]
    UnexpectedKey(String),

    #[error("`version` is not a string")]
    VersionNotString,

    #[error("`grants` is not an object")]
    GrantsNotObject,

    #[error("`grants` is empty")]
    EmptyGrants,

    #[error("grant `{0}` is not a boolean")]
    NonBooleanGrant(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
