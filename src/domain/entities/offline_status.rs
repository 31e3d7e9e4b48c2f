use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the device's offline readiness for one event, for the
/// operator status banner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflineStatus {
    pub cached: bool,
    pub cached_at: Option<DateTime<Utc>>,
    pub ticket_count: u32,
    pub pending_scans: u32,
    pub online: bool,
}
