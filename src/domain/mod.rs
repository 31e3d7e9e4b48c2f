pub mod entities;
pub mod value_objects;

pub use entities::{
    CachedTicket, EventCacheMetadata, OfflineStatus, PendingScan, PrepareReport, RemoteTicket,
    ScanOutcome, ScanReason, SyncReport, TicketSummary,
};
pub use value_objects::{EventId, RedemptionToken, SyncState, TicketId};
