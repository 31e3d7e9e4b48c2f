use crate::domain::entities::{CachedTicket, EventCacheMetadata, PendingScan, TicketSummary};
use crate::domain::value_objects::{EventId, RedemptionToken, SyncState, TicketId};
use crate::shared::error::ScanError;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub(super) struct TicketRow {
    #[allow(dead_code)]
    pub id: i64,
    pub ticket_id: String,
    pub event_id: String,
    pub redemption_token: String,
    pub holder_name: Option<String>,
    pub holder_phone: Option<String>,
    pub ticket_type: Option<String>,
    pub remote_redeemed: bool,
    pub local_redeemed: bool,
    pub local_redeemed_at: Option<i64>,
    pub cached_at: i64,
}

impl TicketRow {
    pub(super) fn into_domain(self) -> Result<CachedTicket, ScanError> {
        let ticket_id = TicketId::new(self.ticket_id).map_err(ScanError::Storage)?;
        let event_id = EventId::new(self.event_id).map_err(ScanError::Storage)?;
        let redemption_token =
            RedemptionToken::new(self.redemption_token).map_err(ScanError::Storage)?;
        let summary = TicketSummary::new(self.holder_name, self.holder_phone, self.ticket_type);
        let local_redeemed_at = self
            .local_redeemed_at
            .map(millis_to_datetime)
            .transpose()?;
        let cached_at = millis_to_datetime(self.cached_at)?;

        Ok(CachedTicket::new(
            ticket_id,
            event_id,
            redemption_token,
            summary,
            self.remote_redeemed,
            self.local_redeemed,
            local_redeemed_at,
            cached_at,
        ))
    }
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct ScanRow {
    pub id: i64,
    pub redemption_token: String,
    pub scanned_at: i64,
    pub sync_state: String,
    pub sync_error: Option<String>,
    pub attempts: i32,
    pub synced_at: Option<i64>,
    pub created_at: i64,
}

impl ScanRow {
    pub(super) fn into_domain(self) -> Result<PendingScan, ScanError> {
        let redemption_token =
            RedemptionToken::new(self.redemption_token).map_err(ScanError::Storage)?;
        let scanned_at = millis_to_datetime(self.scanned_at)?;
        let synced_at = self.synced_at.map(millis_to_datetime).transpose()?;
        let created_at = millis_to_datetime(self.created_at)?;

        Ok(PendingScan::new(
            self.id,
            redemption_token,
            scanned_at,
            SyncState::from(self.sync_state.as_str()),
            self.sync_error,
            try_i32_to_u32(self.attempts, "attempts")?,
            synced_at,
            created_at,
        ))
    }
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct EventMetadataRow {
    pub event_id: String,
    pub cached_at: i64,
    pub ticket_count: i64,
}

impl EventMetadataRow {
    pub(super) fn into_domain(self) -> Result<EventCacheMetadata, ScanError> {
        let event_id = EventId::new(self.event_id).map_err(ScanError::Storage)?;
        let cached_at = millis_to_datetime(self.cached_at)?;
        let ticket_count = try_i64_to_u32(self.ticket_count, "ticket_count")?;

        Ok(EventCacheMetadata::new(event_id, cached_at, ticket_count))
    }
}

pub(super) fn millis_to_datetime(ts: i64) -> Result<DateTime<Utc>, ScanError> {
    Utc.timestamp_millis_opt(ts)
        .single()
        .ok_or_else(|| ScanError::Storage(format!("Invalid timestamp: {ts}")))
}

fn try_i32_to_u32(value: i32, label: &str) -> Result<u32, ScanError> {
    value
        .try_into()
        .map_err(|_| ScanError::Storage(format!("{label} cannot be negative")))
}

fn try_i64_to_u32(value: i64, label: &str) -> Result<u32, ScanError> {
    value
        .try_into()
        .map_err(|_| ScanError::Storage(format!("{label} out of range")))
}
