use crate::domain::entities::{CachedTicket, EventCacheMetadata, PendingScan, RemoteTicket};
use crate::domain::value_objects::{EventId, RedemptionToken};
use crate::shared::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Outcome of an atomic local redemption attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalRedemption {
    /// Flag set and scan enqueued in one transaction.
    Accepted {
        ticket: CachedTicket,
        scan: PendingScan,
    },
    NotCached,
    AlreadyRedeemedLocally(CachedTicket),
    AlreadyRedeemedRemotely(CachedTicket),
}

/// Durable local storage for cached tickets and the offline scan queue.
///
/// Contents survive process restarts. Writes must be visible to subsequent
/// reads on the same store.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Upserts the event's tickets keyed by redemption token and overwrites
    /// the event metadata snapshot. A re-download refreshes registry-side
    /// fields but never clears a set `local_redeemed` flag.
    async fn put_tickets(&self, event_id: &EventId, tickets: &[RemoteTicket]) -> Result<u32>;

    async fn ticket_by_token(&self, token: &RedemptionToken) -> Result<Option<CachedTicket>>;

    /// Atomic check-then-set: marks the ticket locally redeemed and enqueues
    /// the pending scan in a single transaction. Concurrent duplicate scans
    /// of one token yield exactly one `Accepted`.
    async fn redeem_locally(
        &self,
        token: &RedemptionToken,
        at: DateTime<Utc>,
    ) -> Result<LocalRedemption>;

    /// Records an authoritative registry verdict in the cache so a later
    /// offline scan of the same token is rejected. No-op for tokens that are
    /// not cached.
    async fn record_remote_redemption(&self, token: &RedemptionToken) -> Result<()>;

    /// Pending scans in replay order (scan time, then insertion order).
    async fn pending_scans(&self) -> Result<Vec<PendingScan>>;

    async fn mark_scan_synced(&self, id: i64) -> Result<()>;

    async fn mark_scan_failed(&self, id: i64, error: &str) -> Result<()>;

    /// Deletes settled (synced) queue entries, returning how many were
    /// removed. Failed entries are never pruned here.
    async fn prune_synced_scans(&self) -> Result<u32>;

    /// Queue entries not yet settled: pending plus failed.
    async fn pending_count(&self) -> Result<u32>;

    async fn event_metadata(&self, event_id: &EventId) -> Result<Option<EventCacheMetadata>>;

    /// Removes the event's cached tickets and metadata row, returning the
    /// number of tickets dropped.
    async fn clear_event_cache(&self, event_id: &EventId) -> Result<u32>;
}
