//! Per-kind commit health tracking.
//!
//! A queue that keeps failing never shrinks. Tracking consecutive
//! failures per kind lets operators spot a systemic index outage
//! without scraping logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::queue::OperationKind;

/// Commit history of one operation kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindHealth {
    /// Kind this record tracks
    pub kind: OperationKind,

    /// Failed commits since the last success
    pub consecutive_failures: u32,

    /// Items committed since engine construction
    pub committed_total: u64,

    /// Last successful commit (milliseconds since epoch for JSON compatibility)
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_success_at: Option<DateTime<Utc>>,

    /// Last failed commit (milliseconds since epoch)
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_failure_at: Option<DateTime<Utc>>,
}

impl KindHealth {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            consecutive_failures: 0,
            committed_total: 0,
            last_success_at: None,
            last_failure_at: None,
        }
    }

    /// Record a successful bulk call of `count` items.
    pub fn record_success(&mut self, count: usize) {
        self.consecutive_failures = 0;
        self.committed_total += count as u64;
        self.last_success_at = Some(Utc::now());
    }

    /// Record a failed bulk call.
    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure_at = Some(Utc::now());
    }

    /// Whether the last attempt for this kind failed.
    pub fn is_failing(&self) -> bool {
        self.consecutive_failures > 0
    }
}

/// Health of all three kinds, in commit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncHealth {
    pub insert: KindHealth,
    pub update: KindHealth,
    pub delete: KindHealth,
}

impl Default for SyncHealth {
    fn default() -> Self {
        Self {
            insert: KindHealth::new(OperationKind::Insert),
            update: KindHealth::new(OperationKind::Update),
            delete: KindHealth::new(OperationKind::Delete),
        }
    }
}

impl SyncHealth {
    pub fn get(&self, kind: OperationKind) -> &KindHealth {
        match kind {
            OperationKind::Insert => &self.insert,
            OperationKind::Update => &self.update,
            OperationKind::Delete => &self.delete,
        }
    }

    pub fn get_mut(&mut self, kind: OperationKind) -> &mut KindHealth {
        match kind {
            OperationKind::Insert => &mut self.insert,
            OperationKind::Update => &mut self.update,
            OperationKind::Delete => &mut self.delete,
        }
    }

    /// Serialize to JSON bytes for status export.
    pub fn to_bytes(&self) -> Result<Vec<u8>, crate::SyncError> {
        serde_json::to_vec(self).map_err(crate::SyncError::from)
    }
}
