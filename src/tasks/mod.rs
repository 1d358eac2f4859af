//! Background Tasks Module
//!
//! # Tasks
//! - Partition Cleanup: Removes expired disk partitions at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
