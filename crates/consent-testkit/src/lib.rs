//! # Consent Kernel Testkit
//!
//! Testing utilities for the Consent Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden records**: Raw persisted values with their expected verdicts
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A shared store, sample categories and a failing store
//!
//! ## Golden Records
//!
//! ```rust
//! use consent_testkit::vectors::{all_records, classify};
//!
//! for vector in all_records() {
//!     assert_eq!(classify(vector.raw), vector.verdict, "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use consent_testkit::generators::{options_from_params, OptionsParams};
//!
//! proptest! {
//!     #[test]
//!     fn seeded_grants_cover_every_category(params: OptionsParams) {
//!         let config = options_from_params(&params).resolve();
//!         prop_assert_eq!(config.categories.len(), params.categories.len());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use consent_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.put_record("1", &[("analytics", true)]);
//! assert!(fixture.raw().is_some());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{TestFixture, UnavailableStore, FIXTURE_KEY};
pub use generators::{options_from_params, OptionsParams};
pub use vectors::{all_records, classify, verify_all_records, GoldenRecord, Verdict};
