//! # Consent Kernel Store
//!
//! Storage abstraction for the Consent Kernel. Provides a trait-based interface
//! for the persistence medium with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts record storage behind the [`RecordStore`] trait,
//! allowing the manager to be storage-agnostic. The durable implementation is
//! [`SqliteStore`], with [`MemoryStore`] for testing and embedding.
//!
//! ## Key Types
//!
//! - [`RecordStore`] - The trait for raw key/value persistence with expiry
//! - [`RecordStoreExt`] - Record encoding and validated loading on top of it
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage
//! - [`LoadOutcome`] - Result of loading a persisted record
//!
//! ## Usage
//!
//! ```rust,no_run
//! use consent_core::{ExpiryPolicy, RecordSchema};
//! use consent_store::{LoadOutcome, RecordStoreExt, SqliteStore};
//!
//! let store = SqliteStore::open("consent.db").unwrap();
//!
//! match store.load_record("consent-manager", &RecordSchema::STRICT).unwrap() {
//!     LoadOutcome::Loaded(record) => println!("version {}", record.version),
//!     LoadOutcome::Malformed(reason) => println!("rejected: {}", reason),
//!     LoadOutcome::Absent => println!("first visit"),
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Cookie semantics**: values carry a deadline or a session scope
//! - **Lenient parsing**: values that are not JSON load as absent
//! - **Shared stores**: `Arc<S>` is itself a store, so managers can share one

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{LoadOutcome, RecordStore, RecordStoreExt};
