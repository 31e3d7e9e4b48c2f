use crate::domain::value_objects::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one cached event snapshot. Overwritten whole on re-download,
/// never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventCacheMetadata {
    pub event_id: EventId,
    pub cached_at: DateTime<Utc>,
    pub ticket_count: u32,
}

impl EventCacheMetadata {
    pub fn new(event_id: EventId, cached_at: DateTime<Utc>, ticket_count: u32) -> Self {
        Self {
            event_id,
            cached_at,
            ticket_count,
        }
    }
}
