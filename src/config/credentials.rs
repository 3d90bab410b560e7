//! Credential discovery from the environment
//!
//! Each provider family exposes its API keys under a base variable name
//! (`GEMINI_API_KEY`) plus optional numbered suffixes (`GEMINI_API_KEY_1`,
//! `GEMINI_API_KEY_2`, ...). Discovery stops at the first gap, so a hole in
//! the numbering hides everything after it.

use std::env;

use crate::core::providers::ProviderFamily;

/// One discovered credential with its family and 1-based ordinal.
#[derive(Debug, Clone)]
pub struct DiscoveredKey {
    /// Provider family the key belongs to
    pub family: ProviderFamily,
    /// Position within the family, 1-based, in discovery order
    pub ordinal: usize,
    /// The API key itself
    pub key: String,
}

/// Collect the keys configured for one base variable name.
///
/// Returns the value of `base` itself if set, followed by `base_1`,
/// `base_2`, ... for as long as consecutive suffixes resolve to non-empty
/// values. Empty values count as unset.
pub fn keys_from_env(base: &str) -> Vec<String> {
    let mut keys = Vec::new();

    if let Ok(value) = env::var(base) {
        if !value.is_empty() {
            keys.push(value);
        }
    }

    let mut index = 1;
    loop {
        match env::var(format!("{}_{}", base, index)) {
            Ok(value) if !value.is_empty() => keys.push(value),
            _ => break,
        }
        index += 1;
    }

    keys
}

/// Discover credentials for every supported family, in fixed family order.
pub fn discover_all() -> Vec<DiscoveredKey> {
    let mut discovered = Vec::new();

    for family in ProviderFamily::all() {
        for (i, key) in keys_from_env(family.env_base()).into_iter().enumerate() {
            discovered.push(DiscoveredKey {
                family: *family,
                ordinal: i + 1,
                key,
            });
        }
    }

    discovered
}

/// Render a short non-reversible prefix of a credential for diagnostics.
///
/// Keys are never logged in full.
pub fn masked(credential: &str) -> String {
    let prefix: String = credential.chars().take(8).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_from_env_stops_at_gap() {
        env::set_var("PG_TEST_FOO_API_KEY", "a");
        env::set_var("PG_TEST_FOO_API_KEY_1", "b");
        env::set_var("PG_TEST_FOO_API_KEY_3", "d");

        let keys = keys_from_env("PG_TEST_FOO_API_KEY");
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        env::remove_var("PG_TEST_FOO_API_KEY");
        env::remove_var("PG_TEST_FOO_API_KEY_1");
        env::remove_var("PG_TEST_FOO_API_KEY_3");
    }

    #[test]
    fn test_keys_from_env_numbered_only() {
        env::set_var("PG_TEST_BAR_API_KEY_1", "x");
        env::set_var("PG_TEST_BAR_API_KEY_2", "y");

        let keys = keys_from_env("PG_TEST_BAR_API_KEY");
        assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);

        env::remove_var("PG_TEST_BAR_API_KEY_1");
        env::remove_var("PG_TEST_BAR_API_KEY_2");
    }

    #[test]
    fn test_keys_from_env_empty() {
        assert!(keys_from_env("PG_TEST_MISSING_API_KEY").is_empty());
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        env::set_var("PG_TEST_BLANK_API_KEY", "");
        assert!(keys_from_env("PG_TEST_BLANK_API_KEY").is_empty());
        env::remove_var("PG_TEST_BLANK_API_KEY");
    }

    #[test]
    fn test_masked_prefix() {
        assert_eq!(masked("sk-1234567890abcdef"), "sk-12345...");
        assert_eq!(masked("abc"), "abc...");
    }
}
