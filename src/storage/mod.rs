// src/storage/mod.rs

//! Persistence of the last observed reading.
//!
//! Only one value survives between runs: the reading that was last
//! recorded as the baseline.
//!
//! ## File format
//!
//! ```text
//! {"current": 9, "limit": 10, "observed_at": "2026-10-16T08:00:00Z"}
//! ```
//!
//! A file holding a bare integer (`9`) is also accepted; it is read as the
//! account count with an unknown limit.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Reading;

// Re-export for convenience
pub use local::FileStateStore;

/// The reading kept across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReading {
    pub current: u64,
    /// Unknown for state written in the legacy integer format
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl StoredReading {
    /// Stamp a reading with the current time.
    pub fn new(reading: Reading) -> Self {
        Self {
            current: reading.current,
            limit: Some(reading.limit),
            observed_at: Some(Utc::now()),
        }
    }

    /// Reconstruct the baseline reading, borrowing the limit from `fresh`
    /// when none was stored.
    pub fn baseline(&self, fresh: &Reading) -> Reading {
        Reading::new(self.current, self.limit.unwrap_or(fresh.limit))
    }

    /// The stored reading, if its limit is known.
    pub fn reading(&self) -> Option<Reading> {
        self.limit.map(|limit| Reading::new(self.current, limit))
    }
}

/// Trait for state backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last recorded reading; `None` when nothing was recorded yet.
    async fn load(&self) -> Result<Option<StoredReading>>;

    /// Record `reading` as the new baseline.
    async fn save(&self, reading: &Reading) -> Result<()>;
}
