use crate::application::ports::connectivity::Connectivity;
use crate::application::ports::ticket_registry::{RedeemOutcome, TicketRegistry};
use crate::application::ports::ticket_store::TicketStore;
use crate::domain::entities::SyncReport;
use crate::shared::error::{Result, ScanError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Drains the offline scan queue against the registry.
///
/// Runs are serialized through an in-flight gate: `sync_pending` waits its
/// turn, `try_sync_pending` coalesces with a run already in progress. One
/// entry's failure never aborts the batch.
pub struct SyncReconciler {
    store: Arc<dyn TicketStore>,
    registry: Arc<dyn TicketRegistry>,
    connectivity: Arc<dyn Connectivity>,
    gate: Mutex<()>,
}

impl SyncReconciler {
    pub fn new(
        store: Arc<dyn TicketStore>,
        registry: Arc<dyn TicketRegistry>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            store,
            registry,
            connectivity,
            gate: Mutex::new(()),
        }
    }

    /// Replays every pending scan in FIFO order and prunes the settled ones.
    /// Fails fast with [`ScanError::Offline`] when there is no connectivity.
    pub async fn sync_pending(&self) -> Result<SyncReport> {
        let _guard = self.gate.lock().await;
        self.run_locked().await
    }

    /// Connectivity-triggered variant: if a pass is already in flight the
    /// trigger is dropped and `None` is returned instead of queueing a
    /// second pass behind it.
    pub async fn try_sync_pending(&self) -> Result<Option<SyncReport>> {
        match self.gate.try_lock() {
            Ok(_guard) => self.run_locked().await.map(Some),
            Err(_) => Ok(None),
        }
    }

    async fn run_locked(&self) -> Result<SyncReport> {
        if !self.connectivity.is_online().await {
            return Err(ScanError::Offline);
        }

        let scans = self.store.pending_scans().await?;
        let total = scans.len() as u32;
        let mut synced = 0u32;
        let mut failed = 0u32;

        for scan in scans {
            match self.registry.redeem(&scan.redemption_token).await {
                // The registry reporting "already used" means this entry
                // reached it before (a retried request, or the ticket was
                // redeemed elsewhere). Either way the scan is settled.
                Ok(RedeemOutcome::Accepted(_)) | Ok(RedeemOutcome::AlreadyUsed { .. }) => {
                    self.store.mark_scan_synced(scan.id).await?;
                    synced += 1;
                }
                Ok(RedeemOutcome::NotFound) => {
                    warn!(
                        target: "mogiri::sync",
                        scan_id = scan.id,
                        "queued scan references a ticket the registry does not know"
                    );
                    self.store
                        .mark_scan_failed(scan.id, "Ticket not found on registry")
                        .await?;
                    failed += 1;
                }
                Err(err) => {
                    warn!(
                        target: "mogiri::sync",
                        scan_id = scan.id,
                        error = %err,
                        "scan sync failed, continuing with remaining entries"
                    );
                    self.store
                        .mark_scan_failed(scan.id, &err.to_string())
                        .await?;
                    failed += 1;
                }
            }
        }

        let pruned = self.store.prune_synced_scans().await?;

        info!(
            target: "mogiri::sync",
            synced = synced,
            failed = failed,
            total = total,
            pruned = pruned,
            "scan queue reconciliation finished"
        );

        Ok(SyncReport::new(synced, failed, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::connectivity::ConnectivityEvent;
    use crate::domain::entities::{RemoteTicket, TicketSummary};
    use crate::domain::value_objects::{EventId, RedemptionToken, TicketId};
    use crate::infrastructure::database::{ConnectionPool, SqliteTicketStore};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::broadcast;

    struct FixedConnectivity {
        online: bool,
        events: broadcast::Sender<ConnectivityEvent>,
    }

    impl FixedConnectivity {
        fn new(online: bool) -> Self {
            let (events, _) = broadcast::channel(4);
            Self { online, events }
        }
    }

    #[async_trait]
    impl Connectivity for FixedConnectivity {
        async fn is_online(&self) -> bool {
            self.online
        }

        fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
            self.events.subscribe()
        }
    }

    /// Registry double tracking redeemed tokens, with scripted transport
    /// failures and registry-side pre-redemptions.
    struct FakeRegistry {
        redeemed: StdMutex<HashSet<String>>,
        fail_tokens: StdMutex<HashSet<String>>,
        calls: StdMutex<Vec<String>>,
    }

    impl FakeRegistry {
        fn new() -> Self {
            Self {
                redeemed: StdMutex::new(HashSet::new()),
                fail_tokens: StdMutex::new(HashSet::new()),
                calls: StdMutex::new(Vec::new()),
            }
        }

        fn fail_for(&self, token: &str) {
            self.fail_tokens.lock().unwrap().insert(token.to_string());
        }

        fn heal(&self, token: &str) {
            self.fail_tokens.lock().unwrap().remove(token);
        }

        fn mark_redeemed(&self, token: &str) {
            self.redeemed.lock().unwrap().insert(token.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TicketRegistry for FakeRegistry {
        async fn fetch_event_tickets(&self, _event_id: &EventId) -> Result<Vec<RemoteTicket>> {
            Ok(vec![])
        }

        async fn redeem(&self, token: &RedemptionToken) -> Result<RedeemOutcome> {
            self.calls.lock().unwrap().push(token.as_str().to_string());
            if self.fail_tokens.lock().unwrap().contains(token.as_str()) {
                return Err(ScanError::Remote("connection reset".to_string()));
            }
            let mut redeemed = self.redeemed.lock().unwrap();
            if redeemed.contains(token.as_str()) {
                return Ok(RedeemOutcome::AlreadyUsed { used_at: None });
            }
            redeemed.insert(token.as_str().to_string());
            Ok(RedeemOutcome::Accepted(TicketSummary::default()))
        }
    }

    async fn setup_store() -> Arc<SqliteTicketStore> {
        let pool = ConnectionPool::from_memory().await.expect("pool");
        pool.migrate().await.expect("migrations");
        Arc::new(SqliteTicketStore::new(pool))
    }

    fn token(value: &str) -> RedemptionToken {
        RedemptionToken::new(value.to_string()).unwrap()
    }

    fn remote_ticket(tok: &str) -> RemoteTicket {
        RemoteTicket::new(
            TicketId::new(format!("id-{tok}")).unwrap(),
            EventId::new("ev1".to_string()).unwrap(),
            token(tok),
            TicketSummary::default(),
            false,
        )
    }

    async fn cache_and_scan(store: &SqliteTicketStore, tokens: &[&str]) {
        let ev = EventId::new("ev1".to_string()).unwrap();
        let tickets: Vec<_> = tokens.iter().map(|t| remote_ticket(t)).collect();
        store.put_tickets(&ev, &tickets).await.unwrap();
        for t in tokens {
            store.redeem_locally(&token(t), Utc::now()).await.unwrap();
        }
    }

    fn reconciler(
        store: Arc<SqliteTicketStore>,
        registry: Arc<FakeRegistry>,
        online: bool,
    ) -> SyncReconciler {
        SyncReconciler::new(store, registry, Arc::new(FixedConnectivity::new(online)))
    }

    #[tokio::test]
    async fn syncs_all_pending_in_scan_order_and_prunes() {
        let store = setup_store().await;
        cache_and_scan(&store, &["tok-a", "tok-b"]).await;
        let registry = Arc::new(FakeRegistry::new());
        let sync = reconciler(store.clone(), registry.clone(), true);

        let report = sync.sync_pending().await.unwrap();
        assert_eq!(report, SyncReport::new(2, 0, 2));
        assert_eq!(registry.calls(), vec!["tok-a", "tok-b"]);
        assert_eq!(store.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_pass_with_nothing_queued_is_empty() {
        let store = setup_store().await;
        cache_and_scan(&store, &["tok-a"]).await;
        let registry = Arc::new(FakeRegistry::new());
        let sync = reconciler(store, registry, true);

        let first = sync.sync_pending().await.unwrap();
        assert_eq!(first, SyncReport::new(1, 0, 1));

        let second = sync.sync_pending().await.unwrap();
        assert_eq!(second, SyncReport::new(0, 0, 0));
    }

    #[tokio::test]
    async fn fails_fast_when_offline() {
        let store = setup_store().await;
        cache_and_scan(&store, &["tok-a"]).await;
        let registry = Arc::new(FakeRegistry::new());
        let sync = reconciler(store.clone(), registry, false);

        let err = sync.sync_pending().await.unwrap_err();
        assert!(matches!(err, ScanError::Offline));
        assert_eq!(store.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let store = setup_store().await;
        cache_and_scan(&store, &["tok-a", "tok-b", "tok-c"]).await;
        let registry = Arc::new(FakeRegistry::new());
        registry.fail_for("tok-b");
        let sync = reconciler(store.clone(), registry.clone(), true);

        let report = sync.sync_pending().await.unwrap();
        assert_eq!(report, SyncReport::new(2, 1, 3));
        // All three were attempted despite the middle failure.
        assert_eq!(registry.calls().len(), 3);
        // Only the failed entry remains unsettled.
        assert_eq!(store.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn registry_side_redemption_counts_as_synced() {
        let store = setup_store().await;
        cache_and_scan(&store, &["tok-c"]).await;
        let registry = Arc::new(FakeRegistry::new());
        // Redeemed by another channel while this device was offline.
        registry.mark_redeemed("tok-c");
        let sync = reconciler(store.clone(), registry, true);

        let report = sync.sync_pending().await.unwrap();
        assert_eq!(report, SyncReport::new(1, 0, 1));
        assert_eq!(store.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_entries_are_kept_out_of_the_automatic_replay() {
        let store = setup_store().await;
        cache_and_scan(&store, &["tok-a"]).await;
        let registry = Arc::new(FakeRegistry::new());
        registry.fail_for("tok-a");
        let sync = reconciler(store.clone(), registry.clone(), true);

        let report = sync.sync_pending().await.unwrap();
        assert_eq!(report, SyncReport::new(0, 1, 1));
        assert_eq!(store.pending_count().await.unwrap(), 1);

        // The next pass sees an empty pending set; the failed entry waits
        // for an explicit retry.
        registry.heal("tok-a");
        let report = sync.sync_pending().await.unwrap();
        assert_eq!(report, SyncReport::new(0, 0, 0));
        assert_eq!(store.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn overlapping_trigger_is_coalesced() {
        let store = setup_store().await;
        let registry = Arc::new(FakeRegistry::new());
        let sync = Arc::new(reconciler(store, registry, true));

        // Hold the gate and confirm a trigger backs off instead of queueing.
        let guard = sync.gate.lock().await;
        let coalesced = sync.try_sync_pending().await.unwrap();
        assert!(coalesced.is_none());
        drop(guard);

        let report = sync.try_sync_pending().await.unwrap();
        assert_eq!(report, Some(SyncReport::new(0, 0, 0)));
    }
}
