//! Cache Module
//!
//! Two tiers and the facade combining them: a TTL-based remote tier and a
//! date-partitioned disk tier.

mod disk;
mod entry;
mod layer;
mod memory;
mod partition;
mod remote;
mod stats;


// Re-export public types
pub use disk::DiskCache;
pub use entry::CacheEntry;
pub use layer::LayerCache;
pub use memory::MemoryStore;
pub use partition::{PartitionDate, PARTITION_FORMAT};
pub use remote::{KvStore, RedisStore, RemoteCache};
pub use stats::CacheStats;

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Maximum allowed key length in bytes (common file name limit)
pub const MAX_KEY_LENGTH: usize = 255;

// == Key Validation ==
/// Checks that `key` can be used as a file name inside a partition.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key == "." || key == ".." || key.contains(['/', '\\', '\0']) {
        return Err(CacheError::InvalidKey(format!("'{}' is not a valid file name", key)));
    }
    Ok(())
}
