use crate::domain::entities::TicketSummary;
use crate::domain::value_objects::{EventId, RedemptionToken, TicketId};
use serde::{Deserialize, Serialize};

/// A ticket record as served by the remote registry, before caching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteTicket {
    pub ticket_id: TicketId,
    pub event_id: EventId,
    pub redemption_token: RedemptionToken,
    pub summary: TicketSummary,
    pub redeemed: bool,
}

impl RemoteTicket {
    pub fn new(
        ticket_id: TicketId,
        event_id: EventId,
        redemption_token: RedemptionToken,
        summary: TicketSummary,
        redeemed: bool,
    ) -> Self {
        Self {
            ticket_id,
            event_id,
            redemption_token,
            summary,
            redeemed,
        }
    }
}
