//! # Consent Kernel Core
//!
//! Pure primitives for the Consent Kernel: categories, configuration and the
//! persisted record format.
//!
//! This crate contains no I/O and no shared state. It is pure computation over
//! configuration values and untrusted record input.
//!
//! ## Key Types
//!
//! - [`CategoryDefinition`] - A consent category declared by the site
//! - [`GrantMap`] - Ordered category identifier to grant mapping
//! - [`ConsentOptions`] / [`EffectiveConfig`] - Caller options and their resolution
//! - [`PersistedRecord`] - The `{version, grants}` snapshot
//! - [`RecordSchema`] - Structural validation of untrusted records
//!
//! ## Wire Format
//!
//! Records are encoded as JSON. See [`record`] module.

pub mod config;
pub mod error;
pub mod record;
pub mod types;
pub mod validation;

pub use config::{
    resolve, ConsentDefaults, ConsentOptions, EffectiveConfig, DEFAULT_EXPIRY_DAYS,
    DEFAULT_STORAGE_KEY, DEFAULT_VERSION,
};
pub use error::{CoreError, Result, SchemaViolation};
pub use record::{Decoded, PersistedRecord};
pub use types::{CategoryDefinition, ExpiryPolicy, GrantMap, Target, DAY_MILLIS, WILDCARD};
pub use validation::{RecordSchema, GRANTS_KEY, VERSION_KEY};
