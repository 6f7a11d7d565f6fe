//! Strong type definitions for consent state.
//!
//! Categories are addressed by plain string identifiers; the grant map keeps
//! them in declaration order so that wildcard updates and persisted records
//! follow the configuration.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Identifier that addresses every known category at once.
pub const WILDCARD: &str = "*";

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 86_400_000;

/// A consent category as declared by the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Identifier, unique within a configuration.
    pub id: String,

    /// Human-readable label.
    pub label: String,

    /// Human-readable description.
    pub description: String,

    /// Required categories are permanently granted.
    #[serde(default)]
    pub required: bool,

    /// Initial grant for optional categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

impl CategoryDefinition {
    /// An optional category that starts denied.
    pub fn optional(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
            required: false,
            default: None,
        }
    }

    /// A required category.
    pub fn required(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: true,
            ..Self::optional(id, label, description)
        }
    }

    /// Set the initial grant.
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = Some(default);
        self
    }

    /// The value this category holds before any persisted record is applied.
    pub fn seed_value(&self) -> bool {
        self.required || self.default.unwrap_or(false)
    }
}

/// Addressee of a grant change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Every known category.
    All,
    /// A single category by identifier.
    Category(&'a str),
}

impl<'a> Target<'a> {
    /// Parse an identifier, recognising the `*` wildcard.
    pub fn parse(id: &'a str) -> Self {
        if id == WILDCARD {
            Target::All
        } else {
            Target::Category(id)
        }
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(id: &'a str) -> Self {
        Self::parse(id)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(id: &'a String) -> Self {
        Self::parse(id.as_str())
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str(WILDCARD),
            Target::Category(id) => f.write_str(id),
        }
    }
}

/// How long a persisted record stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// A number of days from the moment of writing.
    Days(u32),
    /// An absolute deadline in Unix milliseconds.
    At(i64),
    /// No deadline; the record lives until the session ends.
    Session,
}

impl ExpiryPolicy {
    /// Resolve to an absolute deadline, or `None` for session-scoped records.
    pub fn deadline(&self, now: i64) -> Option<i64> {
        match *self {
            ExpiryPolicy::Days(days) => Some(now.saturating_add(i64::from(days) * DAY_MILLIS)),
            ExpiryPolicy::At(at) => Some(at),
            ExpiryPolicy::Session => None,
        }
    }
}

/// Ordered mapping from category identifier to grant.
///
/// Inserting an existing identifier updates its value in place, so the key
/// keeps the position of its first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantMap {
    entries: Vec<(String, bool)>,
}

impl GrantMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no categories.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grant for `id`, if the category is known.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| *v)
    }

    /// Whether `id` is a known category.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }

    /// Insert or update a grant. Returns the previous value.
    pub fn insert(&mut self, id: impl Into<String>, granted: bool) -> Option<bool> {
        let id = id.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, value)) => Some(std::mem::replace(value, granted)),
            None => {
                self.entries.push((id, granted));
                None
            }
        }
    }

    /// Update an existing grant. Unknown identifiers are left out.
    pub fn update(&mut self, id: &str, granted: bool) -> Option<bool> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == id)
            .map(|(_, value)| std::mem::replace(value, granted))
    }

    /// Identifiers in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(identifier, grant)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Identifiers currently granted.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, v)| *v).map(|(k, _)| k)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for GrantMap {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        let mut map = GrantMap::new();
        for (id, granted) in iter {
            map.insert(id, granted);
        }
        map
    }
}

impl Serialize for GrantMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, granted) in &self.entries {
            map.serialize_entry(id, granted)?;
        }
        map.end()
    }
}
