//! Shared constants, pure calculation helpers and snapshot bookkeeping.

pub mod constants;
pub mod math;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Freshness bookkeeping for a snapshot holder.
///
/// A failed load keeps the previous snapshot in place and flips `stale`;
/// a committed load clears it and records the success time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Whether the held snapshot is known to be out of date
    pub stale: bool,
    /// When the last successful load committed
    pub last_success: Option<DateTime<Utc>>,
}

impl SnapshotMeta {
    /// Record a successful commit
    pub fn committed(&mut self) {
        self.stale = false;
        self.last_success = Some(Utc::now());
    }

    /// Record a failed load
    pub fn failed(&mut self) {
        self.stale = true;
    }
}
