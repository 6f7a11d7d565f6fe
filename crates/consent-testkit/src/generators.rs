//! Proptest generators for property-based testing.

use std::collections::BTreeSet;

use proptest::prelude::*;

use consent_core::{CategoryDefinition, ConsentOptions, ExpiryPolicy, GrantMap};

/// Generate a category identifier.
pub fn category_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}".prop_map(String::from)
}

/// Generate a category definition with the given identifier.
pub fn category_with_id(id: String) -> impl Strategy<Value = CategoryDefinition> {
    (any::<bool>(), any::<Option<bool>>(), "[A-Za-z ]{0,16}").prop_map(
        move |(required, default, label)| CategoryDefinition {
            id: id.clone(),
            description: format!("{} description", label),
            label,
            required,
            default,
        },
    )
}

/// Generate up to `max` categories with distinct identifiers.
pub fn categories(max: usize) -> impl Strategy<Value = Vec<CategoryDefinition>> {
    prop::collection::btree_set(category_id(), 0..=max).prop_flat_map(|ids: BTreeSet<String>| {
        ids.into_iter()
            .map(category_with_id)
            .collect::<Vec<_>>()
    })
}

/// Generate an expiry policy.
pub fn expiry_policy() -> impl Strategy<Value = ExpiryPolicy> {
    prop_oneof![
        (0u32..=730).prop_map(ExpiryPolicy::Days),
        (0i64..=4_102_444_800_000i64).prop_map(ExpiryPolicy::At),
        Just(ExpiryPolicy::Session),
    ]
}

/// Generate a version string.
pub fn version() -> impl Strategy<Value = String> {
    "[0-9]{1,3}(\\.[0-9]{1,2})?".prop_map(String::from)
}

/// Generate a grant map over arbitrary identifiers.
pub fn grant_map(max: usize) -> impl Strategy<Value = GrantMap> {
    prop::collection::vec((category_id(), any::<bool>()), 0..=max)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Parameters for building consent options.
#[derive(Debug, Clone)]
pub struct OptionsParams {
    pub version: Option<String>,
    pub storage_key: Option<String>,
    pub expires: Option<ExpiryPolicy>,
    pub categories: Vec<CategoryDefinition>,
}

impl Arbitrary for OptionsParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::option::of(version()),
            prop::option::of("[a-z][a-z-]{0,15}"),
            prop::option::of(expiry_policy()),
            categories(8),
        )
            .prop_map(|(version, storage_key, expires, categories)| OptionsParams {
                version,
                storage_key,
                expires,
                categories,
            })
            .boxed()
    }
}

/// Build consent options from parameters.
pub fn options_from_params(params: &OptionsParams) -> ConsentOptions {
    let mut options = ConsentOptions::new().categories(params.categories.clone());

    if let Some(version) = &params.version {
        options = options.version(version.clone());
    }
    if let Some(key) = &params.storage_key {
        options = options.storage_key(key.clone());
    }
    if let Some(expires) = params.expires {
        options = options.expires(expires);
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_core::{Decoded, PersistedRecord, RecordSchema};

    proptest! {
        #[test]
        fn test_categories_have_unique_ids(categories in categories(8)) {
            let ids: BTreeSet<_> = categories.iter().map(|c| c.id.as_str()).collect();
            prop_assert_eq!(ids.len(), categories.len());
        }

        #[test]
        fn test_options_resolve_scalars(params: OptionsParams) {
            let config = options_from_params(&params).resolve();

            if let Some(version) = &params.version {
                prop_assert_eq!(&config.version, version);
            }
            prop_assert_eq!(config.categories.len(), params.categories.len());
        }

        #[test]
        fn test_nonempty_grants_decode(grants in grant_map(8), version in version()) {
            prop_assume!(!grants.is_empty());

            let encoded = PersistedRecord::new(version.clone(), grants.clone()).encode().unwrap();
            let decoded = PersistedRecord::decode(&encoded, &RecordSchema::STRICT);

            match decoded {
                Decoded::Valid(record) => {
                    prop_assert_eq!(record.version, version);
                    prop_assert_eq!(record.grants.len(), grants.len());
                }
                other => prop_assert!(false, "unexpected decode: {:?}", other),
            }
        }
    }
}
