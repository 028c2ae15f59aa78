//! Application context - dependency injection container
//!
//! Builds the database, the HTTP adapters, and the reconciliation services,
//! then owns the two background pieces: the session listener applying
//! identity events to the session context, and the sweep worker watching
//! connectivity transitions.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use slipway_core::connectivity::ConnectivityProbe;
use slipway_core::identity::ports::IdentityPort;
use slipway_core::productivity::ports::{ProductivityLocalStore, ProductivityStore};
use slipway_core::records::ports::ProgressStore;
use slipway_core::user::ports::{ProfileCache, RemoteUserStore};
use slipway_core::{
    PendingProfileSync, ProductivityService, ProgressLedger, RegistrationService, SessionContext,
    SessionService, UserDirectory,
};
use slipway_domain::{Result, SlipwayError};
use slipway_infra::{
    load_config, Config, DbManager, DocStoreClient, HttpIdentityClient, HttpProductivityStore,
    HttpProgressStore, HttpUserStore, NetworkStatus, SqliteProductivityStore, SqliteProfileCache,
    SweepWorker, SweepWorkerConfig,
};
use tokio::sync::Mutex as TokioMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

const SESSION_TASK_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// External adapters the context is assembled from.
///
/// Production wiring fills these with the HTTP implementations; tests pass
/// mocks.
pub struct ContextAdapters {
    pub connectivity: Arc<dyn ConnectivityProbe>,
    pub identity: Arc<dyn IdentityPort>,
    pub user_store: Arc<dyn RemoteUserStore>,
    pub progress_store: Arc<dyn ProgressStore>,
    pub productivity_store: Arc<dyn ProductivityStore>,
}

/// Application context - holds all services and dependencies.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub connectivity: Arc<dyn ConnectivityProbe>,
    pub identity: Arc<dyn IdentityPort>,
    pub directory: Arc<UserDirectory>,
    pub registration: Arc<RegistrationService>,
    pub ledger: Arc<ProgressLedger>,
    /// Direct read access to the `avances` collection for cross-user
    /// dashboard queries; writes always go through the ledger.
    pub progress_store: Arc<dyn ProgressStore>,
    pub productivity: Arc<ProductivityService>,
    pub session: Arc<SessionContext>,
    pub sweep: Arc<PendingProfileSync>,
    pub profile_cache: Arc<dyn ProfileCache>,
    pub productivity_local: Arc<dyn ProductivityLocalStore>,

    sweep_worker: TokioMutex<SweepWorker>,
    session_task: TokioMutex<Option<JoinHandle<()>>>,
    cancellation: CancellationToken,
}

impl AppContext {
    /// Create a context from the default configuration sources.
    pub async fn new() -> Result<Self> {
        let config = load_config(Some(Path::new("slipway.toml")))?;
        Self::new_with_config(config).await
    }

    /// Create a context with the given configuration and production
    /// (HTTP + SQLite) adapters.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);

        let doc_client = Arc::new(DocStoreClient::new(&config.remote)?);
        let identity = Arc::new(HttpIdentityClient::new(&config.identity)?);

        let adapters = ContextAdapters {
            connectivity: Arc::new(NetworkStatus::online()),
            identity,
            user_store: Arc::new(HttpUserStore::new(Arc::clone(&doc_client))),
            progress_store: Arc::new(HttpProgressStore::new(Arc::clone(&doc_client))),
            productivity_store: Arc::new(HttpProductivityStore::new(doc_client)),
        };

        Self::assemble(config, db, adapters).await
    }

    /// Wire services over explicit adapters and start the background tasks.
    pub async fn assemble(
        config: Config,
        db: Arc<DbManager>,
        adapters: ContextAdapters,
    ) -> Result<Self> {
        db.run_migrations()?;

        let profile_cache: Arc<dyn ProfileCache> =
            Arc::new(SqliteProfileCache::new(Arc::clone(&db)));
        let productivity_local: Arc<dyn ProductivityLocalStore> =
            Arc::new(SqliteProductivityStore::new(Arc::clone(&db)));

        let ContextAdapters { connectivity, identity, user_store, progress_store, productivity_store } =
            adapters;

        let directory = Arc::new(UserDirectory::new(
            Arc::clone(&user_store),
            Arc::clone(&profile_cache),
            Arc::clone(&connectivity),
        ));
        let registration = Arc::new(RegistrationService::new(
            Arc::clone(&identity),
            Arc::clone(&directory),
            Arc::clone(&connectivity),
        ));
        let ledger =
            Arc::new(ProgressLedger::new(Arc::clone(&progress_store), Arc::clone(&connectivity)));
        let productivity = Arc::new(ProductivityService::new(
            productivity_store,
            Arc::clone(&productivity_local),
            Arc::clone(&connectivity),
        ));

        let session = Arc::new(SessionContext::new());
        let session_service =
            Arc::new(SessionService::new(Arc::clone(&directory), Arc::clone(&session)));

        let sweep = Arc::new(PendingProfileSync::new(
            user_store,
            Arc::clone(&profile_cache),
            config.sync.retry_strategy(),
        ));

        let mut sweep_worker = SweepWorker::new(
            Arc::clone(&sweep),
            Arc::clone(&connectivity),
            SweepWorkerConfig::default(),
        );
        sweep_worker.start().map_err(SlipwayError::Internal)?;

        let cancellation = CancellationToken::new();
        let session_task =
            spawn_session_listener(Arc::clone(&identity), session_service, cancellation.clone());

        info!("application context assembled");

        Ok(Self {
            config,
            db,
            connectivity,
            identity,
            directory,
            registration,
            ledger,
            progress_store,
            productivity,
            session,
            sweep,
            profile_cache,
            productivity_local,
            sweep_worker: TokioMutex::new(sweep_worker),
            session_task: TokioMutex::new(Some(session_task)),
            cancellation,
        })
    }

    /// Probe the context's components.
    pub async fn health_check(&self) -> HealthStatus {
        let database = match self.db.health_check() {
            Ok(()) => ComponentHealth::ok(),
            Err(err) => ComponentHealth::failed(err.to_string()),
        };

        let healthy = database.ok;
        HealthStatus {
            healthy,
            database,
            online: self.connectivity.is_online(),
            session_active: self.session.current().is_some(),
        }
    }

    /// Stop the background tasks and release the context.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutting down application context");
        self.cancellation.cancel();

        if let Some(handle) = self.session_task.lock().await.take() {
            match tokio::time::timeout(SESSION_TASK_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(error = %err, "session listener panicked"),
                Err(_) => warn!("session listener did not stop within timeout"),
            }
        }

        let mut worker = self.sweep_worker.lock().await;
        if worker.is_running() {
            worker.stop().await.map_err(SlipwayError::Internal)?;
        }

        info!("application context shut down");
        Ok(())
    }
}

/// Apply identity session events to the session service, starting with the
/// state current at subscription time.
fn spawn_session_listener(
    identity: Arc<dyn IdentityPort>,
    service: Arc<SessionService>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut sessions = identity.subscribe_sessions();

    tokio::spawn(async move {
        let initial = sessions.borrow_and_update().clone();
        service.handle_event(initial).await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = sessions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let event = sessions.borrow_and_update().clone();
                    service.handle_event(event).await;
                }
            }
        }
    })
}
