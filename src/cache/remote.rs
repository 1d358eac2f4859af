//! Remote Tier Module
//!
//! Fast, volatile tier. Every entry is written with the configured TTL and is
//! expired by the store itself.

use tracing::debug;

use crate::config::Config;
use crate::error::{CacheError, Result};

// == Store Capability ==
/// Key-value store operations the remote tier relies on.
///
/// Implemented by [`RedisStore`] and [`crate::cache::MemoryStore`]. Wrappers
/// adding reconnects or retries can implement it without touching callers.
pub trait KvStore {
    /// Liveness check.
    fn ping(&mut self) -> Result<()>;

    /// Returns the value under `key`, or `None` if absent or expired.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, expiring `ttl_seconds` from now.
    fn set_ex(&mut self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()>;
}

// == Redis Store ==
/// A single blocking connection to a Redis server.
pub struct RedisStore {
    conn: redis::Connection,
}

impl RedisStore {
    /// Opens a connection to the store described by `config`.
    ///
    /// # Errors
    /// Returns `CacheError::Connection` if the URL is invalid or the server
    /// cannot be reached.
    pub fn open(config: &Config) -> Result<Self> {
        let url = config.store_url();
        let client = redis::Client::open(url.as_str()).map_err(CacheError::Connection)?;
        let conn = client.get_connection().map_err(CacheError::Connection)?;
        debug!("Connected to remote store at {}", url);
        Ok(Self { conn })
    }
}

impl KvStore for RedisStore {
    fn ping(&mut self) -> Result<()> {
        redis::cmd("PING").query::<String>(&mut self.conn)?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(redis::cmd("GET").arg(key).query(&mut self.conn)?)
    }

    fn set_ex(&mut self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl_seconds)
            .arg(value)
            .query::<()>(&mut self.conn)?;
        Ok(())
    }
}

// == Remote Cache ==
/// TTL-based cache tier over a [`KvStore`].
pub struct RemoteCache<S = RedisStore> {
    store: S,
    /// TTL in seconds captured from the config at construction
    ttl: u64,
}

impl RemoteCache<RedisStore> {
    /// Connects to Redis using the host, port and database index in `config`.
    pub fn connect(config: &Config) -> Result<Self> {
        Self::with_store(RedisStore::open(config)?, config)
    }
}

impl<S: KvStore> RemoteCache<S> {
    // == Constructor ==
    /// Wraps `store`, failing fast if it does not answer a ping.
    pub fn with_store(mut store: S, config: &Config) -> Result<Self> {
        store.ping().map_err(|e| match e {
            CacheError::Store(source) => CacheError::Connection(source),
            other => other,
        })?;
        Ok(Self {
            store,
            ttl: config.store_entry_ttl,
        })
    }

    // == Set ==
    /// Stores `value` under `key` with the captured TTL.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        debug!("Remote set '{}' ({} bytes, ttl {}s)", key, value.len(), self.ttl);
        self.store.set_ex(key, value, self.ttl)
    }

    // == Get ==
    /// Returns the value under `key`, or `None` on a miss.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key)
    }

    /// TTL applied to every set.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use std::thread::sleep;
    use std::time::Duration;

    /// Store whose every command fails as if the server went away.
    struct DownStore;

    fn io_error() -> redis::RedisError {
        redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    impl KvStore for DownStore {
        fn ping(&mut self) -> Result<()> {
            Err(io_error().into())
        }

        fn get(&mut self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(io_error().into())
        }

        fn set_ex(&mut self, _key: &str, _value: &[u8], _ttl_seconds: u64) -> Result<()> {
            Err(io_error().into())
        }
    }

    #[test]
    fn test_with_store_captures_ttl() {
        let config = Config::default().merge([("store_entry_ttl", "60")]).unwrap();
        let remote = RemoteCache::with_store(MemoryStore::new(), &config).unwrap();
        assert_eq!(remote.ttl(), 60);
    }

    #[test]
    fn test_unreachable_store_fails_fast() {
        let result = RemoteCache::with_store(DownStore, &Config::default());
        assert!(matches!(result, Err(CacheError::Connection(_))));
    }

    #[test]
    fn test_set_and_get() {
        let mut remote = RemoteCache::with_store(MemoryStore::new(), &Config::default()).unwrap();

        remote.set("artifact", b"\x00\x01binary").unwrap();

        assert_eq!(remote.get("artifact").unwrap(), Some(b"\x00\x01binary".to_vec()));
        assert_eq!(remote.get("missing").unwrap(), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let config = Config::default().merge([("store_entry_ttl", "1")]).unwrap();
        let mut remote = RemoteCache::with_store(MemoryStore::new(), &config).unwrap();

        remote.set("k", b"v").unwrap();
        assert_eq!(remote.get("k").unwrap(), Some(b"v".to_vec()));

        sleep(Duration::from_millis(1100));

        assert_eq!(remote.get("k").unwrap(), None);
    }
}
