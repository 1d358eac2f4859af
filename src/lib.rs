//! Layer Cache - A two-tier read-through cache
//!
//! A Redis tier with per-entry TTL in front of a date-partitioned disk tier
//! with age-based cleanup.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{DiskCache, KvStore, LayerCache, MemoryStore, PartitionDate, RemoteCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
