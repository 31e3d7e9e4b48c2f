pub mod cached_ticket;
pub mod event_cache;
pub mod offline_status;
pub mod pending_scan;
pub mod prepare_report;
pub mod remote_ticket;
pub mod scan_outcome;
pub mod sync_report;
pub mod ticket_summary;

pub use cached_ticket::CachedTicket;
pub use event_cache::EventCacheMetadata;
pub use offline_status::OfflineStatus;
pub use pending_scan::PendingScan;
pub use prepare_report::PrepareReport;
pub use remote_ticket::RemoteTicket;
pub use scan_outcome::{ScanOutcome, ScanReason};
pub use sync_report::SyncReport;
pub use ticket_summary::TicketSummary;
