use crate::domain::value_objects::{RedemptionToken, SyncState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scan accepted while offline, queued for replay against the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingScan {
    pub id: i64,
    pub redemption_token: RedemptionToken,
    pub scanned_at: DateTime<Utc>,
    pub sync_state: SyncState,
    pub sync_error: Option<String>,
    pub attempts: u32,
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PendingScan {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        redemption_token: RedemptionToken,
        scanned_at: DateTime<Utc>,
        sync_state: SyncState,
        sync_error: Option<String>,
        attempts: u32,
        synced_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            redemption_token,
            scanned_at,
            sync_state,
            sync_error,
            attempts,
            synced_at,
            created_at,
        }
    }
}
