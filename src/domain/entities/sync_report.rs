use serde::{Deserialize, Serialize};

/// Counts from one reconciliation pass over the scan queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub synced: u32,
    pub failed: u32,
    pub total: u32,
}

impl SyncReport {
    pub fn new(synced: u32, failed: u32, total: u32) -> Self {
        Self {
            synced,
            failed,
            total,
        }
    }
}
