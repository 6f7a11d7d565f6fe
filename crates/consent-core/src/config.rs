//! Configuration resolution.
//!
//! Callers describe what they want with [`ConsentOptions`]; every field they
//! leave out is taken from an explicit [`ConsentDefaults`] value. The result,
//! [`EffectiveConfig`], is fixed for the lifetime of a manager.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{CategoryDefinition, ExpiryPolicy};

/// Storage key used when the caller does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "consent-manager";

/// Record lifetime used when the caller does not set one.
pub const DEFAULT_EXPIRY_DAYS: u32 = 365;

/// Configuration version used when the caller does not set one.
pub const DEFAULT_VERSION: &str = "1";

/// Caller-supplied configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentOptions {
    /// Version of the category set. Changing it discards earlier decisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Key of the persisted record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,

    /// Lifetime of the persisted record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<ExpiryPolicy>,

    /// Categories, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryDefinition>>,
}

impl ConsentOptions {
    /// Empty options: everything comes from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| CoreError::InvalidOptions(e.to_string()))
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    pub fn expires(mut self, expires: ExpiryPolicy) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Replace the category list.
    pub fn categories(mut self, categories: Vec<CategoryDefinition>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Append one category.
    pub fn category(mut self, category: CategoryDefinition) -> Self {
        self.categories.get_or_insert_with(Vec::new).push(category);
        self
    }

    /// Resolve against the built-in defaults.
    pub fn resolve(self) -> EffectiveConfig {
        resolve(self, &ConsentDefaults::default())
    }
}

/// Values used for anything the caller leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentDefaults {
    pub version: String,
    pub storage_key: String,
    pub expires: ExpiryPolicy,
    pub categories: Vec<CategoryDefinition>,
}

impl Default for ConsentDefaults {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            expires: ExpiryPolicy::Days(DEFAULT_EXPIRY_DAYS),
            categories: Vec::new(),
        }
    }
}

/// The configuration a manager runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub version: String,
    pub storage_key: String,
    pub expires: ExpiryPolicy,
    pub categories: Vec<CategoryDefinition>,
}

impl EffectiveConfig {
    /// Definition for `id`. With duplicate identifiers the last one wins.
    pub fn category(&self, id: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().rev().find(|c| c.id == id)
    }

    /// Whether `id` names a required category.
    pub fn is_required(&self, id: &str) -> bool {
        self.category(id).map(|c| c.required).unwrap_or(false)
    }
}

/// Merge caller options over defaults.
///
/// Scalars take the caller's value when present. The category list is taken
/// whole from the caller when provided, never merged element by element.
pub fn resolve(options: ConsentOptions, defaults: &ConsentDefaults) -> EffectiveConfig {
    EffectiveConfig {
        version: options.version.unwrap_or_else(|| defaults.version.clone()),
        storage_key: options
            .storage_key
            .unwrap_or_else(|| defaults.storage_key.clone()),
        expires: options.expires.unwrap_or(defaults.expires),
        categories: options
            .categories
            .unwrap_or_else(|| defaults.categories.clone()),
    }
}
