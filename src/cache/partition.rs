//! Partition Date Module
//!
//! The disk tier groups entries into one directory per calendar day, named
//! `YYYYMMDD`. `PartitionDate` is the validated form of that name.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::CacheError;

/// strftime format of a partition directory name.
pub const PARTITION_FORMAT: &str = "%Y%m%d";

// == Partition Date ==
/// Calendar date identifying a disk-tier partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionDate(NaiveDate);

impl PartitionDate {
    /// Partition for the current local date.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Midnight at the start of this partition's day.
    pub fn start(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::default())
    }

    // == Is Expired ==
    /// Checks whether the partition falls outside the retention window.
    ///
    /// A partition is kept while its midnight is at or after
    /// `now - retention_days`. A window reaching past the earliest
    /// representable date keeps everything.
    pub fn is_expired(&self, now: NaiveDateTime, retention_days: u32) -> bool {
        match now.checked_sub_signed(chrono::Duration::days(i64::from(retention_days))) {
            Some(cutoff) => self.start() < cutoff,
            None => false,
        }
    }
}

impl fmt::Display for PartitionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(PARTITION_FORMAT))
    }
}

impl FromStr for PartitionDate {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // %Y alone would accept signed and short years
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CacheError::InvalidPartition(format!(
                "'{}' is not an 8-digit YYYYMMDD date",
                s
            )));
        }
        NaiveDate::parse_from_str(s, PARTITION_FORMAT)
            .map(Self)
            .map_err(|e| CacheError::InvalidPartition(format!("'{}': {}", s, e)))
    }
}

impl TryFrom<&str> for PartitionDate {
    type Error = CacheError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NaiveDate> for PartitionDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for PartitionDate {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for PartitionDate {
    fn from(datetime: DateTime<Tz>) -> Self {
        Self(datetime.date_naive())
    }
}
