use crate::application::ports::connectivity::Connectivity;
use crate::application::ports::ticket_registry::{RedeemOutcome, TicketRegistry};
use crate::application::ports::ticket_store::{LocalRedemption, TicketStore};
use crate::domain::entities::{ScanOutcome, ScanReason};
use crate::domain::value_objects::RedemptionToken;
use crate::shared::error::{Result, ScanError};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Decides accept/reject for one scanned payload.
///
/// Decision order is fixed: the device's own prior offline redemption wins
/// over everything, including a live registry answer, because the registry
/// has not heard about queued scans yet. After that the online path defers
/// to the registry, and the offline path runs against the local cache.
pub struct ValidationService {
    store: Arc<dyn TicketStore>,
    registry: Arc<dyn TicketRegistry>,
    connectivity: Arc<dyn Connectivity>,
}

impl ValidationService {
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

    /// Validates a raw decoded scan payload (`TICKET:<token>` or a bare
    /// token). Rejected outcomes never mutate local state.
    pub async fn validate(&self, payload: &str) -> Result<ScanOutcome> {
        let token = RedemptionToken::from_scan_payload(payload).map_err(ScanError::InvalidInput)?;
        self.validate_token(&token).await
    }

    pub async fn validate_token(&self, token: &RedemptionToken) -> Result<ScanOutcome> {
        // A scan this device already accepted offline is rejected before the
        // registry is consulted; the queued redemption may not have reached
        // the registry yet and a live "valid" answer would double-admit.
        if let Some(ticket) = self.store.ticket_by_token(token).await? {
            if ticket.local_redeemed {
                return Ok(ScanOutcome::rejected_with_ticket(
                    ScanReason::AlreadyUsedOffline,
                    ticket.summary,
                    true,
                ));
            }
        }

        if self.connectivity.is_online().await {
            match self.registry.redeem(token).await {
                Ok(outcome) => return self.from_remote_verdict(token, outcome).await,
                Err(err) => {
                    // Connectivity said online but the request still failed.
                    // The operator gets an offline verdict, not an error.
                    warn!(
                        target: "mogiri::validation",
                        error = %err,
                        "registry redeem failed, falling back to offline validation"
                    );
                }
            }
        }

        self.validate_offline(token).await
    }

    /// Folds an authoritative registry verdict into the local cache so a
    /// later offline rescan of the same token is rejected instead of queued.
    async fn from_remote_verdict(
        &self,
        token: &RedemptionToken,
        outcome: RedeemOutcome,
    ) -> Result<ScanOutcome> {
        match outcome {
            RedeemOutcome::Accepted(summary) => {
                self.remember_remote_redemption(token).await;
                info!(
                    target: "mogiri::validation",
                    holder = summary.holder_name.as_deref().unwrap_or(""),
                    "ticket accepted online"
                );
                Ok(ScanOutcome::accepted(summary, false))
            }
            RedeemOutcome::AlreadyUsed { used_at } => {
                self.remember_remote_redemption(token).await;
                Ok(ScanOutcome::rejected(
                    ScanReason::AlreadyUsed { used_at },
                    false,
                ))
            }
            RedeemOutcome::NotFound => Ok(ScanOutcome::rejected(ScanReason::NotFound, false)),
        }
    }

    /// Best-effort cache update. The registry has already settled the
    /// redemption; losing the cache note costs at worst one queued duplicate
    /// on a later offline rescan, which the registry settles idempotently.
    async fn remember_remote_redemption(&self, token: &RedemptionToken) {
        if let Err(err) = self.store.record_remote_redemption(token).await {
            warn!(
                target: "mogiri::validation",
                error = %err,
                "failed to record remote redemption in the local cache"
            );
        }
    }

    async fn validate_offline(&self, token: &RedemptionToken) -> Result<ScanOutcome> {
        // Single atomic check-then-set in the store; two rapid scans of one
        // physical ticket cannot both see "unused".
        match self.store.redeem_locally(token, Utc::now()).await? {
            LocalRedemption::Accepted { ticket, scan } => {
                info!(
                    target: "mogiri::validation",
                    scan_id = scan.id,
                    "ticket accepted offline, scan queued"
                );
                Ok(ScanOutcome::accepted(ticket.summary, true))
            }
            LocalRedemption::NotCached => Ok(ScanOutcome::rejected(ScanReason::NotCached, true)),
            LocalRedemption::AlreadyRedeemedLocally(ticket) => Ok(
                ScanOutcome::rejected_with_ticket(ScanReason::AlreadyUsedOffline, ticket.summary, true),
            ),
            LocalRedemption::AlreadyRedeemedRemotely(ticket) => {
                Ok(ScanOutcome::rejected_with_ticket(
                    ScanReason::AlreadyUsed { used_at: None },
                    ticket.summary,
                    true,
                ))
            }
        }
    }
}
