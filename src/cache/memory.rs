//! In-Process Store Module
//!
//! A `KvStore` backed by a HashMap with per-entry TTL, for running the
//! remote tier without a Redis server.

use std::collections::HashMap;

use crate::cache::{CacheEntry, KvStore};
use crate::error::Result;

// == Memory Store ==
/// HashMap storage with lazy TTL expiration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, CacheEntry>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn ping(&mut self) -> Result<()> {
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    fn set_ex(&mut self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value.to_vec(), ttl_seconds));
        Ok(())
    }
}
