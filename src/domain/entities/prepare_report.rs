use crate::domain::value_objects::EventId;
use serde::{Deserialize, Serialize};

/// Result of caching one event's ticket list for offline use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrepareReport {
    pub event_id: EventId,
    pub ticket_count: u32,
}
