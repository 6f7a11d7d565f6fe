//! Error types for the manager.

use consent_core::CoreError;
use consent_store::StoreError;
use thiserror::Error;

/// Errors surfaced by explicit manager operations.
///
/// Grant changes never return these; persistence there is best-effort and
/// failures are only logged.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Options or record encoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for manager operations.
pub type Result<T> = std::result::Result<T, ConsentError>;
