//! Partition Cleanup Task
//!
//! Background task that periodically removes expired disk partitions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::{KvStore, LayerCache};

/// Spawns a background task that runs [`LayerCache::clean`] every
/// `cleanup_interval_secs` seconds.
///
/// An interval of 0 is treated as 1 second.
///
/// Each pass holds the cache lock for its whole duration and runs on tokio's
/// blocking pool, since cleanup is synchronous filesystem work. A failed pass
/// is logged and the next one runs on schedule.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Mutex::new(LayerCache::new(&config)?));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 3600);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<S>(
    cache: Arc<Mutex<LayerCache<S>>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    S: KvStore + Send + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting partition cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let cache = cache.clone();
            let result = tokio::task::spawn_blocking(move || {
                let guard = cache.blocking_lock();
                guard.clean()
            })
            .await;

            match result {
                Ok(Ok(0)) => debug!("Partition cleanup: no expired partitions found"),
                Ok(Ok(removed)) => info!("Partition cleanup: removed {} expired partitions", removed),
                Ok(Err(e)) => error!("Partition cleanup failed: {}", e),
                Err(e) => error!("Partition cleanup task panicked: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, PartitionDate};
    use crate::config::Config;
    use std::time::Duration;
    use tempfile::TempDir;

    fn shared_cache(dir: &TempDir) -> Arc<Mutex<LayerCache<MemoryStore>>> {
        let config = Config {
            disk_path: dir.path().to_path_buf(),
            disk_retention_days: 7,
            ..Config::default()
        };
        Arc::new(Mutex::new(
            LayerCache::with_store(MemoryStore::new(), &config).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_partitions() {
        let dir = TempDir::new().unwrap();
        let cache = shared_cache(&dir);
        let old = dir.path().join("20240101");
        std::fs::create_dir(&old).unwrap();

        let handle = spawn_cleanup_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!old.exists(), "Expired partition should have been removed");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_current_partition() {
        let dir = TempDir::new().unwrap();
        let cache = shared_cache(&dir);
        cache.lock().await.set("fresh", b"value").unwrap();

        let handle = spawn_cleanup_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let today = PartitionDate::today();
        let value = cache.lock().await.disk().get("fresh", &today).unwrap();
        assert_eq!(value, Some(b"value".to_vec()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_survives_failed_pass() {
        let dir = TempDir::new().unwrap();
        let cache = shared_cache(&dir);
        std::fs::create_dir(dir.path().join("not-a-date")).unwrap();

        let handle = spawn_cleanup_task(cache, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!handle.is_finished(), "Task should keep running after an error");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let dir = TempDir::new().unwrap();
        let handle = spawn_cleanup_task(shared_cache(&dir), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
