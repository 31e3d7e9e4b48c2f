use crate::application::ports::connectivity::{Connectivity, ConnectivityEvent};
use crate::application::ports::sync_observer::SyncObserver;
use crate::application::services::reconciler::SyncReconciler;
use crate::domain::entities::SyncReport;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Background task that reconciles the scan queue whenever connectivity
/// comes back.
///
/// Listens for online transitions and fires a coalesced reconciler pass;
/// during rapid flapping the in-flight pass absorbs the extra triggers.
/// Results are forwarded to the registered observer, if any.
pub struct AutoSync {
    handle: tokio::task::JoinHandle<()>,
}

impl AutoSync {
    pub fn spawn(
        connectivity: &dyn Connectivity,
        reconciler: Arc<SyncReconciler>,
        observer: Option<Arc<dyn SyncObserver>>,
    ) -> Self {
        let mut events = connectivity.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ConnectivityEvent::Online) => {
                        run_pass(&reconciler, observer.as_deref()).await;
                    }
                    Ok(ConnectivityEvent::Offline) => {}
                    // A missed burst of transitions collapses to "state may
                    // have changed"; the next Online event catches up.
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(
                            target: "mogiri::auto_sync",
                            skipped = skipped,
                            "connectivity events lagged"
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Self { handle }
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for AutoSync {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_pass(reconciler: &SyncReconciler, observer: Option<&dyn SyncObserver>) {
    match reconciler.try_sync_pending().await {
        Ok(Some(report)) => notify_completed(observer, &report),
        Ok(None) => {
            debug!(target: "mogiri::auto_sync", "sync already in flight, trigger dropped");
        }
        Err(err) => {
            warn!(target: "mogiri::auto_sync", error = %err, "automatic sync failed");
            notify_failed(observer, &err.to_string());
        }
    }
}

fn notify_completed(observer: Option<&dyn SyncObserver>, report: &SyncReport) {
    if let Some(observer) = observer {
        if let Err(err) = observer.sync_completed(report) {
            warn!(
                target: "mogiri::auto_sync",
                error = %err,
                "sync observer rejected completion report"
            );
        }
    }
}

fn notify_failed(observer: Option<&dyn SyncObserver>, message: &str) {
    if let Some(observer) = observer {
        if let Err(err) = observer.sync_failed(message) {
            warn!(
                target: "mogiri::auto_sync",
                error = %err,
                "sync observer rejected failure report"
            );
        }
    }
}
