use crate::application::ports::connectivity::Connectivity;
use crate::application::ports::ticket_registry::TicketRegistry;
use crate::application::ports::ticket_store::TicketStore;
use crate::domain::entities::{OfflineStatus, PrepareReport};
use crate::domain::value_objects::EventId;
use crate::shared::error::{Result, ScanError};
use std::sync::Arc;
use tracing::info;

/// Downloads an event's ticket list into the local store and answers
/// offline-readiness questions about it.
pub struct CacheLoader {
    store: Arc<dyn TicketStore>,
    registry: Arc<dyn TicketRegistry>,
    connectivity: Arc<dyn Connectivity>,
}

impl CacheLoader {
    pub fn new(
        store: Arc<dyn TicketStore>,
        registry: Arc<dyn TicketRegistry>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            store,
            registry,
            connectivity,
        }
    }

    /// Fetches the event's full ticket list and replaces the local snapshot.
    /// Requires connectivity; an event with zero tickets is rejected so the
    /// operator notices a wrong event id before going offline with an empty
    /// cache.
    pub async fn prepare(&self, event_id: &EventId) -> Result<PrepareReport> {
        if !self.connectivity.is_online().await {
            return Err(ScanError::Offline);
        }

        let tickets = self.registry.fetch_event_tickets(event_id).await?;
        if tickets.is_empty() {
            return Err(ScanError::EmptyEvent(event_id.to_string()));
        }

        let ticket_count = self.store.put_tickets(event_id, &tickets).await?;

        info!(
            target: "mogiri::cache",
            event_id = %event_id,
            tickets = ticket_count,
            "event tickets cached for offline validation"
        );

        Ok(PrepareReport {
            event_id: event_id.clone(),
            ticket_count,
        })
    }

    /// Snapshot for the operator status banner: cache freshness, ticket
    /// count, unsettled scans, current connectivity.
    pub async fn offline_status(&self, event_id: &EventId) -> Result<OfflineStatus> {
        let metadata = self.store.event_metadata(event_id).await?;
        let pending_scans = self.store.pending_count().await?;
        let online = self.connectivity.is_online().await;

        Ok(match metadata {
            Some(meta) => OfflineStatus {
                cached: true,
                cached_at: Some(meta.cached_at),
                ticket_count: meta.ticket_count,
                pending_scans,
                online,
            },
            None => OfflineStatus {
                cached: false,
                cached_at: None,
                ticket_count: 0,
                pending_scans,
                online,
            },
        })
    }

    /// Drops the event's cached tickets and metadata. Queued scans are not
    /// touched; they still need to reach the registry.
    pub async fn clear(&self, event_id: &EventId) -> Result<u32> {
        let removed = self.store.clear_event_cache(event_id).await?;
        info!(
            target: "mogiri::cache",
            event_id = %event_id,
            removed = removed,
            "event cache cleared"
        );
        Ok(removed)
    }
}
