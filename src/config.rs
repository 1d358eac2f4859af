//! Configuration Module
//!
//! Settings for both cache tiers. A `Config` is a plain value: build it from
//! defaults, merge named overrides or environment variables into it, then hand
//! it to the cache constructors, which copy what they need.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Prefix for environment variable overrides, e.g. `LAYER_CACHE_STORE_HOST`.
pub const ENV_PREFIX: &str = "LAYER_CACHE_";

/// Names accepted by [`Config::merge`].
pub const SETTING_NAMES: &[&str] = &[
    "store_host",
    "store_port",
    "store_db_index",
    "store_entry_ttl",
    "disk_path",
    "disk_retention_days",
    "cleanup_interval",
];

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote store host
    pub store_host: String,
    /// Remote store port
    pub store_port: u16,
    /// Remote store database index
    pub store_db_index: i64,
    /// Expiry in seconds applied to every remote set
    pub store_entry_ttl: u64,
    /// Root directory of the disk tier; must already exist
    pub disk_path: PathBuf,
    /// Partitions older than this many days are removed by cleanup
    pub disk_retention_days: u32,
    /// Seconds between cleanup runs of the daemon
    pub cleanup_interval: u64,
}

impl Config {
    // == Merge ==
    /// Applies named overrides on top of this config.
    ///
    /// Each value is parsed into the type of the setting it names. Names that
    /// match no setting are skipped with a warning.
    ///
    /// # Errors
    /// Returns `CacheError::Config` if a value cannot be parsed, or if
    /// `cleanup_interval` is 0.
    pub fn merge<I, K, V>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in overrides {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                "store_host" => self.store_host = value.to_string(),
                "store_port" => self.store_port = parse_setting(name, value)?,
                "store_db_index" => self.store_db_index = parse_setting(name, value)?,
                "store_entry_ttl" => self.store_entry_ttl = parse_setting(name, value)?,
                "disk_path" => self.disk_path = PathBuf::from(value),
                "disk_retention_days" => {
                    self.disk_retention_days = parse_setting(name, value)?
                }
                "cleanup_interval" => {
                    let interval: u64 = parse_setting(name, value)?;
                    if interval == 0 {
                        return Err(CacheError::Config(
                            "cleanup_interval must be at least 1 second".to_string(),
                        ));
                    }
                    self.cleanup_interval = interval;
                }
                _ => warn!("Ignoring unknown config option '{}'", name),
            }
        }
        Ok(self)
    }

    // == From Env ==
    /// Loads defaults overridden by `LAYER_CACHE_*` environment variables.
    ///
    /// # Environment Variables
    /// - `LAYER_CACHE_STORE_HOST` - Store host (default: localhost)
    /// - `LAYER_CACHE_STORE_PORT` - Store port (default: 6379)
    /// - `LAYER_CACHE_STORE_DB_INDEX` - Store database index (default: 0)
    /// - `LAYER_CACHE_STORE_ENTRY_TTL` - Remote entry TTL in seconds (default: 1800)
    /// - `LAYER_CACHE_DISK_PATH` - Disk tier root (default: ./)
    /// - `LAYER_CACHE_DISK_RETENTION_DAYS` - Partition retention (default: 7)
    /// - `LAYER_CACHE_CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = SETTING_NAMES.iter().filter_map(|name| {
            lookup(&format!("{}{}", ENV_PREFIX, name.to_uppercase())).map(|value| (*name, value))
        });
        Self::default().merge(overrides)
    }

    /// Connection URL for the remote store.
    pub fn store_url(&self) -> String {
        format!(
            "redis://{}:{}/{}",
            self.store_host, self.store_port, self.store_db_index
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_host: "localhost".to_string(),
            store_port: 6379,
            store_db_index: 0,
            store_entry_ttl: 1800,
            disk_path: PathBuf::from("./"),
            disk_retention_days: 7,
            cleanup_interval: 3600,
        }
    }
}

fn parse_setting<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CacheError::Config(format!("invalid value '{}' for {}: {}", value, name, e)))
}
