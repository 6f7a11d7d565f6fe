//! # Consent Kernel Grants
//!
//! The authoritative in-memory grant state.
//!
//! ## Overview
//!
//! A [`GrantStore`] maps every configured category to a boolean grant. It is
//! seeded from the configuration, optionally overlaid with a persisted record,
//! and then changed one category at a time through [`GrantStore::apply`].
//!
//! ## Key Concepts
//!
//! - **Required**: a category that is permanently granted
//! - **Seed**: `required || default || false`, the value before any record
//! - **Restore**: overlay of a version-matched record onto the seed
//!
//! Event dispatch and persistence are the manager's business; this crate only
//! guards the invariants on the map itself.

pub mod state;

pub use state::{GrantStore, SetOutcome};
