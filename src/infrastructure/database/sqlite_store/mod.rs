use super::connection_pool::ConnectionPool;
use crate::application::ports::ticket_store::{LocalRedemption, TicketStore};
use crate::domain::entities::{CachedTicket, EventCacheMetadata, PendingScan, RemoteTicket};
use crate::domain::value_objects::{EventId, RedemptionToken, SyncState};
use crate::shared::error::{Result, ScanError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

mod queries;
mod rows;

use queries::{
    COUNT_UNSETTLED_SCANS, DELETE_EVENT_METADATA, DELETE_EVENT_TICKETS,
    DELETE_EVENT_TICKETS_UNREDEEMED, INSERT_PENDING_SCAN, MARK_SCAN_FAILED, MARK_SCAN_SYNCED,
    PRUNE_SYNCED_SCANS, RECORD_REMOTE_REDEMPTION, REDEEM_TICKET_LOCALLY, SELECT_EVENT_METADATA,
    SELECT_PENDING_SCANS, SELECT_TICKET_BY_TOKEN, UPSERT_EVENT_METADATA, UPSERT_TICKET,
};
use rows::{EventMetadataRow, ScanRow, TicketRow};

pub struct SqliteTicketStore {
    pool: ConnectionPool,
}

impl SqliteTicketStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn put_tickets(&self, event_id: &EventId, tickets: &[RemoteTicket]) -> Result<u32> {
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool.get_pool().begin().await?;

        sqlx::query(DELETE_EVENT_TICKETS_UNREDEEMED)
            .bind(event_id.as_str())
            .execute(&mut *tx)
            .await?;

        for ticket in tickets {
            sqlx::query(UPSERT_TICKET)
                .bind(ticket.ticket_id.as_str())
                .bind(ticket.event_id.as_str())
                .bind(ticket.redemption_token.as_str())
                .bind(ticket.summary.holder_name.as_deref())
                .bind(ticket.summary.holder_phone.as_deref())
                .bind(ticket.summary.ticket_type.as_deref())
                .bind(ticket.redeemed)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(UPSERT_EVENT_METADATA)
            .bind(event_id.as_str())
            .bind(now)
            .bind(tickets.len() as i64)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(tickets.len() as u32)
    }

    async fn ticket_by_token(&self, token: &RedemptionToken) -> Result<Option<CachedTicket>> {
        let row = sqlx::query_as::<_, TicketRow>(SELECT_TICKET_BY_TOKEN)
            .bind(token.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;

        row.map(TicketRow::into_domain).transpose()
    }

    async fn redeem_locally(
        &self,
        token: &RedemptionToken,
        at: DateTime<Utc>,
    ) -> Result<LocalRedemption> {
        let mut tx = self.pool.get_pool().begin().await?;

        let updated = sqlx::query(REDEEM_TICKET_LOCALLY)
            .bind(token.as_str())
            .bind(at.timestamp_millis())
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            let row = sqlx::query_as::<_, TicketRow>(SELECT_TICKET_BY_TOKEN)
                .bind(token.as_str())
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;

            return match row {
                None => Ok(LocalRedemption::NotCached),
                Some(row) => {
                    let ticket = row.into_domain()?;
                    if ticket.local_redeemed {
                        Ok(LocalRedemption::AlreadyRedeemedLocally(ticket))
                    } else {
                        Ok(LocalRedemption::AlreadyRedeemedRemotely(ticket))
                    }
                }
            };
        }

        let created_at = Utc::now();
        let inserted = sqlx::query(INSERT_PENDING_SCAN)
            .bind(token.as_str())
            .bind(at.timestamp_millis())
            .bind(created_at.timestamp_millis())
            .execute(&mut *tx)
            .await?;
        let scan_id = inserted.last_insert_rowid();

        let row = sqlx::query_as::<_, TicketRow>(SELECT_TICKET_BY_TOKEN)
            .bind(token.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let ticket = row.into_domain()?;
        let scan = PendingScan::new(
            scan_id,
            token.clone(),
            at,
            SyncState::Pending,
            None,
            0,
            None,
            created_at,
        );

        Ok(LocalRedemption::Accepted { ticket, scan })
    }

    async fn record_remote_redemption(&self, token: &RedemptionToken) -> Result<()> {
        sqlx::query(RECORD_REMOTE_REDEMPTION)
            .bind(token.as_str())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn pending_scans(&self) -> Result<Vec<PendingScan>> {
        let rows = sqlx::query_as::<_, ScanRow>(SELECT_PENDING_SCANS)
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(ScanRow::into_domain).collect()
    }

    async fn mark_scan_synced(&self, id: i64) -> Result<()> {
        let result = sqlx::query(MARK_SCAN_SYNCED)
            .bind(id)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ScanError::Storage(format!("Scan {id} not found")));
        }
        Ok(())
    }

    async fn mark_scan_failed(&self, id: i64, error: &str) -> Result<()> {
        let result = sqlx::query(MARK_SCAN_FAILED)
            .bind(id)
            .bind(error)
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ScanError::Storage(format!("Scan {id} not found")));
        }
        Ok(())
    }

    async fn prune_synced_scans(&self) -> Result<u32> {
        let result = sqlx::query(PRUNE_SYNCED_SCANS)
            .execute(self.pool.get_pool())
            .await?;

        Ok(result.rows_affected() as u32)
    }

    async fn pending_count(&self) -> Result<u32> {
        let row = sqlx::query(COUNT_UNSETTLED_SCANS)
            .fetch_one(self.pool.get_pool())
            .await?;
        let count: i64 = row.try_get("count")?;

        Ok(count as u32)
    }

    async fn event_metadata(&self, event_id: &EventId) -> Result<Option<EventCacheMetadata>> {
        let row = sqlx::query_as::<_, EventMetadataRow>(SELECT_EVENT_METADATA)
            .bind(event_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;

        row.map(EventMetadataRow::into_domain).transpose()
    }

    async fn clear_event_cache(&self, event_id: &EventId) -> Result<u32> {
        let mut tx = self.pool.get_pool().begin().await?;

        let deleted = sqlx::query(DELETE_EVENT_TICKETS)
            .bind(event_id.as_str())
            .execute(&mut *tx)
            .await?;
        sqlx::query(DELETE_EVENT_METADATA)
            .bind(event_id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(deleted.rows_affected() as u32)
    }
}
