//! Disk Tier Module
//!
//! Persistent tier laid out as `<root>/<YYYYMMDD>/<key>`: one directory per
//! day of writes, one file per key. Partitions are dropped whole once they
//! fall outside the retention window.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::cache::{validate_key, PartitionDate};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Disk Cache ==
/// Date-partitioned file storage.
#[derive(Debug, Clone)]
pub struct DiskCache {
    /// Root directory holding the partitions
    root: PathBuf,
    /// Retention window in days
    retention_days: u32,
}

impl DiskCache {
    // == Constructor ==
    /// Creates a disk tier rooted at `config.disk_path`.
    ///
    /// # Errors
    /// Returns `CacheError::Config` if the root directory does not exist. The
    /// root is never created here.
    pub fn new(config: &Config) -> Result<Self> {
        if !config.disk_path.is_dir() {
            return Err(CacheError::Config(format!(
                "path {} not found",
                config.disk_path.display()
            )));
        }
        Ok(Self {
            root: config.disk_path.clone(),
            retention_days: config.disk_retention_days,
        })
    }

    /// Directory holding the entries written on `date`.
    pub fn partition_path(&self, date: &PartitionDate) -> PathBuf {
        self.root.join(date.to_string())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Set ==
    /// Writes `value` to today's partition, replacing any previous file for
    /// `key` there.
    ///
    /// The write is not atomic: a crash mid-write can leave a partial file.
    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;

        let dir = self.partition_path(&PartitionDate::today());
        fs::create_dir_all(&dir).map_err(|e| CacheError::io("create", &dir, e))?;

        let file = dir.join(key);
        fs::write(&file, value).map_err(|e| CacheError::io("write", &file, e))?;
        debug!("Disk set '{}' ({} bytes) at {}", key, value.len(), file.display());
        Ok(())
    }

    // == Get ==
    /// Reads `key` from the partition written on `date`.
    ///
    /// Returns `None` if the partition or the file does not exist.
    pub fn get(&self, key: &str, date: &PartitionDate) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;

        let dir = self.partition_path(date);
        if !dir.is_dir() {
            return Ok(None);
        }
        let file = dir.join(key);
        if !file.is_file() {
            return Ok(None);
        }
        fs::read(&file)
            .map(Some)
            .map_err(|e| CacheError::io("read", &file, e))
    }

    // == Clean ==
    /// Deletes every partition older than the retention window.
    ///
    /// Non-directory entries in the root are left alone. A directory whose
    /// name is not a `YYYYMMDD` date aborts the pass with
    /// `CacheError::InvalidPartition`; partitions removed before the failure
    /// stay removed.
    ///
    /// Returns the number of partitions removed.
    pub fn clean(&self) -> Result<usize> {
        let now = Local::now().naive_local();
        let entries = fs::read_dir(&self.root).map_err(|e| CacheError::io("list", &self.root, e))?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io("list", &self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let name = entry.file_name();
            let partition: PartitionDate = name
                .to_str()
                .ok_or_else(|| {
                    CacheError::InvalidPartition(format!("{} is not valid UTF-8", path.display()))
                })?
                .parse()?;
            if !partition.is_expired(now, self.retention_days) {
                continue;
            }

            remove_partition(&path)?;
            info!("Removed expired partition {}", partition);
            removed += 1;
        }
        Ok(removed)
    }
}

fn remove_partition(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::io("remove", path, e)),
    }
}
