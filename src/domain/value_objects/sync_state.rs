use serde::{Deserialize, Serialize};

/// Lifecycle state of a queued scan.
///
/// `Pending` entries are replayed by the reconciler, `Synced` entries are
/// pruned after a pass, `Failed` entries are retained for inspection and
/// manual retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncState {
    Pending,
    Synced,
    Failed,
    Unknown(String),
}

impl SyncState {
    pub fn as_str(&self) -> &str {
        match self {
            SyncState::Pending => "pending",
            SyncState::Synced => "synced",
            SyncState::Failed => "failed",
            SyncState::Unknown(value) => value.as_str(),
        }
    }
}

impl From<&str> for SyncState {
    fn from(value: &str) -> Self {
        match value {
            "pending" => SyncState::Pending,
            "synced" => SyncState::Synced,
            "failed" => SyncState::Failed,
            other => SyncState::Unknown(other.to_string()),
        }
    }
}
