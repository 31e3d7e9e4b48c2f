use crate::application::ports::connectivity::Connectivity;
use crate::application::ports::sync_observer::SyncObserver;
use crate::application::ports::ticket_store::TicketStore;
use crate::application::services::{AutoSync, CacheLoader, SyncReconciler, ValidationService};
use crate::domain::entities::{OfflineStatus, PrepareReport, ScanOutcome, SyncReport};
use crate::domain::value_objects::EventId;
use crate::infrastructure::connectivity::SharedConnectivity;
use crate::infrastructure::database::{ConnectionPool, SqliteTicketStore};
use crate::infrastructure::registry::HttpTicketRegistry;
use crate::shared::config::EngineConfig;
use crate::shared::error::{Result, ScanError};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Fully wired validation engine: SQLite store, HTTP registry adapter,
/// shared connectivity signal and the services on top of them.
///
/// The embedding application feeds reachability changes through
/// [`set_online`](ScanEngine::set_online) / [`set_offline`](ScanEngine::set_offline);
/// everything else reacts to that signal.
pub struct ScanEngine {
    pool: ConnectionPool,
    store: Arc<SqliteTicketStore>,
    connectivity: Arc<SharedConnectivity>,
    cache_loader: CacheLoader,
    validation: ValidationService,
    reconciler: Arc<SyncReconciler>,
    _auto_sync: Option<AutoSync>,
}

impl ScanEngine {
    pub async fn new(config: EngineConfig) -> Result<Self> {
        Self::with_observer(config, None).await
    }

    /// Builds the engine and registers an observer for automatic sync
    /// results. The device starts offline until the host reports otherwise.
    pub async fn with_observer(
        config: EngineConfig,
        observer: Option<Arc<dyn SyncObserver>>,
    ) -> Result<Self> {
        config.validate().map_err(ScanError::Configuration)?;
        ensure_database_dir(&config.database.url)?;

        let pool =
            ConnectionPool::new(&config.database.url, config.database.max_connections).await?;
        pool.migrate().await?;

        let store = Arc::new(SqliteTicketStore::new(pool.clone()));
        let registry = Arc::new(HttpTicketRegistry::new(&config.registry)?);
        let connectivity = Arc::new(SharedConnectivity::new(false));

        let cache_loader = CacheLoader::new(store.clone(), registry.clone(), connectivity.clone());
        let validation =
            ValidationService::new(store.clone(), registry.clone(), connectivity.clone());
        let reconciler = Arc::new(SyncReconciler::new(
            store.clone(),
            registry,
            connectivity.clone(),
        ));

        let auto_sync = if config.sync.auto_sync {
            Some(AutoSync::spawn(
                connectivity.as_ref(),
                reconciler.clone(),
                observer,
            ))
        } else {
            None
        };

        info!(
            target: "mogiri::engine",
            registry = %config.registry.base_url,
            auto_sync = config.sync.auto_sync,
            "scan engine ready"
        );

        Ok(Self {
            pool,
            store,
            connectivity,
            cache_loader,
            validation,
            reconciler,
            _auto_sync: auto_sync,
        })
    }

    /// Downloads the event's ticket list for offline validation.
    pub async fn prepare(&self, event_id: &EventId) -> Result<PrepareReport> {
        self.cache_loader.prepare(event_id).await
    }

    /// Validates one decoded scan payload.
    pub async fn validate(&self, payload: &str) -> Result<ScanOutcome> {
        self.validation.validate(payload).await
    }

    /// Replays the queued offline scans against the registry.
    pub async fn sync_pending(&self) -> Result<SyncReport> {
        self.reconciler.sync_pending().await
    }

    pub async fn offline_status(&self, event_id: &EventId) -> Result<OfflineStatus> {
        self.cache_loader.offline_status(event_id).await
    }

    pub async fn pending_count(&self) -> Result<u32> {
        self.store.pending_count().await
    }

    pub async fn clear_event_cache(&self, event_id: &EventId) -> Result<u32> {
        self.cache_loader.clear(event_id).await
    }

    /// Reports network reachability. An offline-to-online transition kicks
    /// off an automatic sync pass when auto-sync is enabled.
    pub async fn set_online(&self) {
        self.connectivity.set_online().await;
    }

    pub async fn set_offline(&self) {
        self.connectivity.set_offline().await;
    }

    pub async fn is_online(&self) -> bool {
        self.connectivity.is_online().await
    }

    pub async fn shutdown(&self) {
        if let Some(auto_sync) = &self._auto_sync {
            auto_sync.abort();
        }
        self.pool.close().await;
    }
}

fn ensure_database_dir(database_url: &str) -> Result<()> {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    if path.starts_with(":memory:") || path.contains("mode=memory") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                ScanError::Storage(format!(
                    "Cannot create database directory {}: {err}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}
