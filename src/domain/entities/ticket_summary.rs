use serde::{Deserialize, Serialize};

/// Operator-facing display fields for a ticket. Carried on cached tickets
/// and returned with scan outcomes so staff can confirm who they admitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TicketSummary {
    pub holder_name: Option<String>,
    pub holder_phone: Option<String>,
    pub ticket_type: Option<String>,
}

impl TicketSummary {
    pub fn new(
        holder_name: Option<String>,
        holder_phone: Option<String>,
        ticket_type: Option<String>,
    ) -> Self {
        Self {
            holder_name,
            holder_phone,
            ticket_type,
        }
    }
}
