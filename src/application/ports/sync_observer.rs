use crate::domain::entities::SyncReport;

/// Receives the outcome of automatic reconciliation passes so an embedding
/// application can surface them to the operator.
pub trait SyncObserver: Send + Sync {
    fn sync_completed(&self, report: &SyncReport) -> Result<(), String>;
    fn sync_failed(&self, message: &str) -> Result<(), String>;
}
