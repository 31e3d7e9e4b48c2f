//! Offline-capable ticket validation engine.
//!
//! An operator device caches an event's ticket list while online, then keeps
//! scanning through network loss: validation runs against the local replica,
//! accepted scans are queued durably, and the queue is reconciled against the
//! remote registry once connectivity returns. At-most-once redemption per
//! device is enforced by an atomic check-then-set in the store; the registry
//! stays the cross-device source of truth.
//!
//! Entry point is [`ScanEngine`], which wires the SQLite store, the HTTP
//! registry adapter and the connectivity signal together. The individual
//! services and ports are public for hosts that bring their own adapters.

pub mod application;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{
    Connectivity, ConnectivityEvent, LocalRedemption, RedeemOutcome, SyncObserver, TicketRegistry,
    TicketStore,
};
pub use application::services::{AutoSync, CacheLoader, SyncReconciler, ValidationService};
pub use domain::entities::{
    CachedTicket, EventCacheMetadata, OfflineStatus, PendingScan, PrepareReport, RemoteTicket,
    ScanOutcome, ScanReason, SyncReport, TicketSummary,
};
pub use domain::value_objects::{EventId, RedemptionToken, SyncState, TicketId};
pub use engine::ScanEngine;
pub use infrastructure::connectivity::SharedConnectivity;
pub use infrastructure::database::{ConnectionPool, SqliteTicketStore};
pub use infrastructure::registry::HttpTicketRegistry;
pub use shared::logging::init_logging;
pub use shared::{EngineConfig, Result, ScanError};
