//! Configuration Module
//!
//! Loads cache sizing and TTL defaults from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default maximum entries per store
pub const DEFAULT_MAX_ENTRIES: usize = 500;
/// Default TTL for scoped list views
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(30);
/// Default TTL for single-resource detail views
pub const DEFAULT_ITEM_TTL: Duration = Duration::from_secs(120);
/// Default TTL for the aggregate dashboard view
pub const DEFAULT_AGGREGATE_TTL: Duration = Duration::from_secs(15);
/// Role whose holders all share one cached list view
pub const DEFAULT_PRIVILEGED_ROLE: &str = "admin";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries each store can hold
    pub max_entries: usize,
    /// TTL applied to list views when the caller passes none
    pub list_ttl: Duration,
    /// TTL applied to by-identifier views when the caller passes none
    pub item_ttl: Duration,
    /// TTL applied to the aggregate view when the caller passes none
    pub aggregate_ttl: Duration,
    /// Role name (case-insensitive) that collapses onto the shared list key
    pub privileged_role: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum entries per store (default: 500)
    /// - `LIST_TTL_MS` - List view TTL in milliseconds (default: 30000)
    /// - `ITEM_TTL_MS` - By-identifier TTL in milliseconds (default: 120000)
    /// - `AGGREGATE_TTL_MS` - Aggregate TTL in milliseconds (default: 15000)
    /// - `PRIVILEGED_ROLE` - Shared-scope role name (default: admin)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    ///
    /// Unset variables fall back to their defaults; set but unparseable
    /// ones are reported rather than ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES")?.unwrap_or(DEFAULT_MAX_ENTRIES),
            list_ttl: parse_var(&lookup, "LIST_TTL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_LIST_TTL),
            item_ttl: parse_var(&lookup, "ITEM_TTL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_ITEM_TTL),
            aggregate_ttl: parse_var(&lookup, "AGGREGATE_TTL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_AGGREGATE_TTL),
            privileged_role: lookup("PRIVILEGED_ROLE")
                .map(|role| role.trim().to_string())
                .unwrap_or_else(|| DEFAULT_PRIVILEGED_ROLE.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the stores cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be at least 1".to_string(),
            ));
        }
        if self.privileged_role.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "privileged_role cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            list_ttl: DEFAULT_LIST_TTL,
            item_ttl: DEFAULT_ITEM_TTL,
            aggregate_ttl: DEFAULT_AGGREGATE_TTL,
            privileged_role: DEFAULT_PRIVILEGED_ROLE.to_string(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidEnv { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 500);
        assert_eq!(config.list_ttl, Duration::from_secs(30));
        assert_eq!(config.item_ttl, Duration::from_secs(120));
        assert_eq!(config.aggregate_ttl, Duration::from_secs(15));
        assert_eq!(config.privileged_role, "admin");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_MAX_ENTRIES", "64"),
            ("LIST_TTL_MS", "250"),
            ("ITEM_TTL_MS", " 1000 "),
            ("AGGREGATE_TTL_MS", "25"),
            ("PRIVILEGED_ROLE", "Owner"),
        ]))
        .unwrap();

        assert_eq!(config.max_entries, 64);
        assert_eq!(config.list_ttl, Duration::from_millis(250));
        assert_eq!(config.item_ttl, Duration::from_millis(1000));
        assert_eq!(config.aggregate_ttl, Duration::from_millis(25));
        assert_eq!(config.privileged_role, "Owner");
    }

    #[test]
    fn test_config_trims_privileged_role() {
        let config = Config::from_lookup(lookup_from(&[("PRIVILEGED_ROLE", " admin ")])).unwrap();
        assert_eq!(config.privileged_role, "admin");

        let blank = Config::from_lookup(lookup_from(&[("PRIVILEGED_ROLE", "   ")]));
        assert!(matches!(blank, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_unparseable_value() {
        let result = Config::from_lookup(lookup_from(&[("LIST_TTL_MS", "soon")]));
        assert_eq!(
            result,
            Err(CacheError::InvalidEnv {
                name: "LIST_TTL_MS",
                value: "soon".to_string(),
            })
        );
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_MAX_ENTRIES", "0")]));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_blank_role() {
        let config = Config {
            privileged_role: "  ".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::InvalidConfig(_))));
    }
}
