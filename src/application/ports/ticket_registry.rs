use crate::domain::entities::{RemoteTicket, TicketSummary};
use crate::domain::value_objects::{EventId, RedemptionToken};
use crate::shared::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Registry verdict for one redemption attempt.
///
/// Redeeming is idempotent on the registry side: a second attempt for the
/// same token reports `AlreadyUsed` instead of erroring, which is what lets
/// the reconciler treat it as settled.
#[derive(Debug, Clone, PartialEq)]
pub enum RedeemOutcome {
    Accepted(TicketSummary),
    AlreadyUsed { used_at: Option<DateTime<Utc>> },
    NotFound,
}

/// The remote source of truth for tickets and redemptions.
#[async_trait]
pub trait TicketRegistry: Send + Sync {
    /// Full ticket list for one event, for offline caching.
    async fn fetch_event_tickets(&self, event_id: &EventId) -> Result<Vec<RemoteTicket>>;

    /// Attempts to redeem the token. Transport-level failures surface as
    /// `ScanError::Remote`; redemption conflicts are `RedeemOutcome` values.
    async fn redeem(&self, token: &RedemptionToken) -> Result<RedeemOutcome>;
}
