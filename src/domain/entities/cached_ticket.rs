use crate::domain::entities::TicketSummary;
use crate::domain::value_objects::{EventId, RedemptionToken, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A ticket held in the durable local cache.
///
/// `remote_redeemed` is the registry-side redemption state as of the last
/// cache download. `local_redeemed` is set by this device when it accepts the
/// ticket offline; the two stay distinct until the scan queue is reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedTicket {
    pub ticket_id: TicketId,
    pub event_id: EventId,
    pub redemption_token: RedemptionToken,
    pub summary: TicketSummary,
    pub remote_redeemed: bool,
    pub local_redeemed: bool,
    pub local_redeemed_at: Option<DateTime<Utc>>,
    pub cached_at: DateTime<Utc>,
}

impl CachedTicket {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticket_id: TicketId,
        event_id: EventId,
        redemption_token: RedemptionToken,
        summary: TicketSummary,
        remote_redeemed: bool,
        local_redeemed: bool,
        local_redeemed_at: Option<DateTime<Utc>>,
        cached_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket_id,
            event_id,
            redemption_token,
            summary,
            remote_redeemed,
            local_redeemed,
            local_redeemed_at,
            cached_at,
        }
    }

    /// True when either side already considers the ticket used.
    pub fn is_redeemed(&self) -> bool {
        self.remote_redeemed || self.local_redeemed
    }
}
