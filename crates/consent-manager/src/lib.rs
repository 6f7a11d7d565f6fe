//! # Consent Kernel
//!
//! Per-category consent state for a site: which categories a visitor has
//! granted, persisted across visits and observable through change listeners.
//!
//! ## Overview
//!
//! A [`ConsentManager`] is built from caller options and a record store:
//!
//! 1. Options are merged over the defaults into an effective configuration.
//! 2. Every category is seeded with `required || default || false`.
//! 3. A well-formed record of the current version overlays the seed and marks
//!    the manager customized. Stale and malformed records are ignored.
//!
//! After that, [`ConsentManager::set_grant`] is the only mutator.
//!
//! ## Key Concepts
//!
//! - **Required**: permanently granted, never changed by `set_grant`
//! - **Customized**: a decision was recorded, now or on an earlier visit
//! - **Wildcard**: `*` applies a change to every category, one at a time
//!
//! ## Usage
//!
//! ```rust
//! use consent_manager::{CategoryDefinition, Channel, ConsentManager, ConsentOptions};
//! use consent_manager::store::MemoryStore;
//!
//! let options = ConsentOptions::new()
//!     .version("2")
//!     .category(CategoryDefinition::required("essential", "Essential", "Site operation"))
//!     .category(CategoryDefinition::optional("analytics", "Analytics", "Usage statistics"));
//!
//! let manager = ConsentManager::new(options, MemoryStore::new());
//! assert!(manager.should_prompt());
//!
//! manager.on(
//!     Channel::Update,
//!     consent_manager::listener(|m: &ConsentManager<MemoryStore>, id: &str| {
//!         println!("{} is now {:?}", id, m.grant(id));
//!     }),
//! );
//!
//! manager.set_grant("*", true);
//! assert_eq!(manager.grant("analytics"), Some(true));
//! assert!(manager.is_customized());
//! ```
//!
//! ## Re-exports
//!
//! - `consent_manager::core` - Categories, configuration, record format
//! - `consent_manager::store` - Record stores
//! - `consent_manager::grants` - Grant state
//! - `consent_manager::events` - Channels and dispatch

pub mod error;
pub mod manager;
pub mod view;

// Re-export component crates
pub use consent_core as core;
pub use consent_events as events;
pub use consent_grants as grants;
pub use consent_store as store;

// Re-export main types for convenience
pub use error::{ConsentError, Result};
pub use manager::{ConsentManager, ManagerListener, RestoreOutcome};
pub use view::{ControlRow, ElementGate, GateAction};

pub use consent_core::{
    CategoryDefinition, ConsentDefaults, ConsentOptions, EffectiveConfig, ExpiryPolicy, GrantMap,
    Target,
};
pub use consent_events::{listener, Channel};
pub use consent_grants::SetOutcome;
