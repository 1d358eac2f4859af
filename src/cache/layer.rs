//! Layered Cache Module
//!
//! Read-through facade over the remote and disk tiers.

use tracing::debug;

use crate::cache::{
    validate_key, CacheStats, DiskCache, KvStore, PartitionDate, RedisStore, RemoteCache,
};
use crate::config::Config;
use crate::error::Result;

// == Layer Cache ==
/// Remote tier in front of the disk tier.
///
/// Writes go to both tiers. Reads try the remote tier first and fall back to
/// the disk partition the caller names. A disk hit does not repopulate the
/// remote tier.
pub struct LayerCache<S = RedisStore> {
    remote: RemoteCache<S>,
    disk: DiskCache,
    stats: CacheStats,
}

impl LayerCache<RedisStore> {
    // == Constructor ==
    /// Connects to Redis and opens the disk root described by `config`.
    ///
    /// # Errors
    /// `CacheError::Connection` if Redis is unreachable, `CacheError::Config`
    /// if the disk root does not exist.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_store(RedisStore::open(config)?, config)
    }
}

impl<S: KvStore> LayerCache<S> {
    /// Builds both tiers, with `store` backing the remote one.
    pub fn with_store(store: S, config: &Config) -> Result<Self> {
        let remote = RemoteCache::with_store(store, config)?;
        let disk = DiskCache::new(config)?;
        Ok(Self::from_tiers(remote, disk))
    }

    pub fn from_tiers(remote: RemoteCache<S>, disk: DiskCache) -> Self {
        Self {
            remote,
            disk,
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Writes `value` to the remote tier, then to today's disk partition.
    ///
    /// There is no rollback: if the disk write fails the remote copy stays.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.remote.set(key, value)?;
        self.disk.set(key, value)
    }

    // == Get ==
    /// Returns the remote value for `key` if it is present and non-empty,
    /// otherwise whatever the disk tier holds for `key` on `date`.
    pub fn get(&mut self, key: &str, date: &PartitionDate) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;

        if let Some(value) = self.remote.get(key)?.filter(|v| !v.is_empty()) {
            self.stats.record_remote_hit();
            return Ok(Some(value));
        }

        let value = self.disk.get(key, date)?;
        if value.is_some() {
            debug!("Remote miss for '{}', served from partition {}", key, date);
            self.stats.record_disk_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(value)
    }

    // == Clean ==
    /// Removes expired disk partitions. The remote tier expires on its own.
    pub fn clean(&self) -> Result<usize> {
        self.disk.clean()
    }

    // == Stats ==
    /// Returns current lookup statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn remote(&mut self) -> &mut RemoteCache<S> {
        &mut self.remote
    }

    pub fn disk(&self) -> &DiskCache {
        &self.disk
    }
}
