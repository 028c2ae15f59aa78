//! Shared harness for command integration tests.
//!
//! Builds a full application context over a temporary SQLite database and
//! mock remote adapters, keeping handles to everything a test may want to
//! inspect or drive.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use slipway_app::{AppContext, ContextAdapters};
use slipway_core::connectivity::ConnectivityProbe;
use slipway_core::identity::ports::{AuthSession, IdentityPort, SessionEvent};
use slipway_core::productivity::ports::ProductivityStore;
use slipway_core::records::ports::ProgressStore;
use slipway_core::user::ports::RemoteUserStore;
use slipway_domain::{
    IdentityError, IdentityErrorKind, ProductivityEvent, ProgressRecord, RemoteError,
    RemoteErrorCode, ReworkEvent, Role, UserProfile,
};
use slipway_infra::{Config, DbManager, NetworkStatus};
use tempfile::TempDir;
use tokio::sync::{watch, Mutex as TokioMutex};

/// Everything a command test needs: the context plus the raw adapters.
pub struct TestHarness {
    pub context: Arc<AppContext>,
    pub identity: Arc<MockIdentity>,
    pub users: Arc<MockUserStore>,
    pub progress: Arc<MockProgressStore>,
    pub productivity: Arc<MockProductivityStore>,
    pub network: Arc<NetworkStatus>,
    _temp_dir: TempDir,
}

/// Assemble a context with fresh database state and mock remote adapters.
pub async fn harness(online: bool) -> TestHarness {
    let temp_dir = TempDir::new().expect("failed to create temporary test directory");
    let db_path = temp_dir.path().join("slipway.db");
    let db = Arc::new(DbManager::new(&db_path, 4).expect("failed to initialise database"));

    let network = Arc::new(NetworkStatus::new(online));
    let identity = MockIdentity::new();
    let users = MockUserStore::new();
    let progress = MockProgressStore::new();
    let productivity = MockProductivityStore::new();

    let adapters = ContextAdapters {
        connectivity: Arc::clone(&network) as Arc<dyn ConnectivityProbe>,
        identity: Arc::clone(&identity) as Arc<dyn IdentityPort>,
        user_store: Arc::clone(&users) as Arc<dyn RemoteUserStore>,
        progress_store: Arc::clone(&progress) as Arc<dyn ProgressStore>,
        productivity_store: Arc::clone(&productivity) as Arc<dyn ProductivityStore>,
    };

    let context = AppContext::assemble(Config::default(), db, adapters)
        .await
        .expect("failed to assemble test context");

    TestHarness {
        context: Arc::new(context),
        identity,
        users,
        progress,
        productivity,
        network,
        _temp_dir: temp_dir,
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Mock identity provider recording created and deleted accounts and
/// emitting session events like the real client.
pub struct MockIdentity {
    accounts: TokioMutex<HashMap<String, String>>,
    pub created: TokioMutex<Vec<String>>,
    pub deleted: TokioMutex<Vec<String>>,
    pub fail_create: TokioMutex<bool>,
    pub fail_delete: TokioMutex<bool>,
    session_tx: watch::Sender<SessionEvent>,
}

impl MockIdentity {
    pub fn new() -> Arc<Self> {
        let (session_tx, _rx) = watch::channel(SessionEvent::SignedOut);
        Arc::new(Self {
            accounts: TokioMutex::new(HashMap::new()),
            created: TokioMutex::new(Vec::new()),
            deleted: TokioMutex::new(Vec::new()),
            fail_create: TokioMutex::new(false),
            fail_delete: TokioMutex::new(false),
            session_tx,
        })
    }

    pub async fn set_fail_create(&self, fail: bool) {
        *self.fail_create.lock().await = fail;
    }

    pub async fn deleted_accounts(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }

    pub fn emit(&self, event: SessionEvent) {
        let _ = self.session_tx.send(event);
    }
}

#[async_trait]
impl IdentityPort for MockIdentity {
    async fn create_account(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<String, IdentityError> {
        if *self.fail_create.lock().await {
            return Err(IdentityError::new(
                IdentityErrorKind::EmailInUse,
                "email already registered",
            ));
        }
        let mut created = self.created.lock().await;
        let account_id = format!("acct-{}", created.len() + 1);
        created.push(email.to_string());
        self.accounts.lock().await.insert(email.to_string(), account_id.clone());
        Ok(account_id)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthSession, IdentityError> {
        let account_id = self
            .accounts
            .lock()
            .await
            .get(email)
            .cloned()
            .unwrap_or_else(|| "acct-1".to_string());
        let session =
            AuthSession { account_id, email: email.to_string(), display_name: None };
        self.emit(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.emit(SessionEvent::SignedOut);
        Ok(())
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), IdentityError> {
        if *self.fail_delete.lock().await {
            return Err(IdentityError::new(IdentityErrorKind::Internal, "delete rejected"));
        }
        self.deleted.lock().await.push(account_id.to_string());
        Ok(())
    }

    fn subscribe_sessions(&self) -> watch::Receiver<SessionEvent> {
        self.session_tx.subscribe()
    }
}

// =============================================================================
// Remote user store
// =============================================================================

#[derive(Default)]
pub struct MockUserStore {
    pub profiles: TokioMutex<HashMap<String, UserProfile>>,
    pub create_errors: TokioMutex<Vec<RemoteError>>,
    pub merge_errors: TokioMutex<Vec<RemoteError>>,
}

impl MockUserStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn insert_profile(&self, profile: UserProfile) {
        self.profiles.lock().await.insert(profile.id.clone(), profile);
    }

    pub async fn push_create_error(&self, error: RemoteError) {
        self.create_errors.lock().await.push(error);
    }

    pub async fn push_merge_error(&self, error: RemoteError) {
        self.merge_errors.lock().await.push(error);
    }

    pub async fn stored(&self, id: &str) -> Option<UserProfile> {
        self.profiles.lock().await.get(id).cloned()
    }
}

#[async_trait]
impl RemoteUserStore for MockUserStore {
    async fn create_profile(
        &self,
        id: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, RemoteError> {
        if let Some(err) = take_error(&self.create_errors).await {
            return Err(err);
        }
        let mut stored = profile.without_local_flags();
        stored.created_at = Some(chrono::Utc::now());
        stored.updated_at = stored.created_at;
        self.profiles.lock().await.insert(id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn fetch_profile(&self, id: &str) -> Result<Option<UserProfile>, RemoteError> {
        Ok(self.profiles.lock().await.get(id).cloned())
    }

    async fn merge_profile(&self, id: &str, profile: &UserProfile) -> Result<(), RemoteError> {
        if let Some(err) = take_error(&self.merge_errors).await {
            return Err(err);
        }
        let mut stored = profile.clone();
        stored.updated_at = Some(chrono::Utc::now());
        self.profiles.lock().await.insert(id.to_string(), stored);
        Ok(())
    }

    async fn update_role(&self, id: &str, rol: Role) -> Result<(), RemoteError> {
        let mut profiles = self.profiles.lock().await;
        match profiles.get_mut(id) {
            Some(profile) => {
                profile.rol = rol;
                profile.updated_at = Some(chrono::Utc::now());
                Ok(())
            }
            None => Err(RemoteError::new(RemoteErrorCode::NotFound, format!("user {id}"))),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, RemoteError> {
        Ok(self.profiles.lock().await.values().cloned().collect())
    }

    async fn profiles_by_role(&self, rol: Role) -> Result<Vec<UserProfile>, RemoteError> {
        Ok(self.profiles.lock().await.values().filter(|p| p.rol == rol).cloned().collect())
    }
}

async fn take_error(queue: &TokioMutex<Vec<RemoteError>>) -> Option<RemoteError> {
    let mut errors = queue.lock().await;
    if errors.is_empty() {
        None
    } else {
        Some(errors.remove(0))
    }
}

// =============================================================================
// Progress store
// =============================================================================

/// Mock `avances` collection tracking remote invested-hours totals.
#[derive(Default)]
pub struct MockProgressStore {
    pub records: TokioMutex<HashMap<String, ProgressRecord>>,
    pub create_errors: TokioMutex<Vec<RemoteError>>,
    pub append_errors: TokioMutex<Vec<RemoteError>>,
    counter: TokioMutex<u32>,
}

impl MockProgressStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn push_create_error(&self, error: RemoteError) {
        self.create_errors.lock().await.push(error);
    }

    pub async fn push_append_error(&self, error: RemoteError) {
        self.append_errors.lock().await.push(error);
    }

    pub async fn insert_record(&self, record: ProgressRecord) {
        self.records.lock().await.insert(record.id.as_str().to_string(), record);
    }

    pub async fn stored(&self, id: &str) -> Option<ProgressRecord> {
        self.records.lock().await.get(id).cloned()
    }
}

#[async_trait]
impl ProgressStore for MockProgressStore {
    async fn create_record(&self, record: &ProgressRecord) -> Result<String, RemoteError> {
        if let Some(err) = take_error(&self.create_errors).await {
            return Err(err);
        }
        let mut counter = self.counter.lock().await;
        *counter += 1;
        let id = format!("av-{counter}");
        drop(counter);

        let mut stored = record.clone();
        stored.id = slipway_domain::RecordId::Committed(id.clone());
        stored.syncing = false;
        stored.pending_reprocesos.clear();
        self.records.lock().await.insert(id.clone(), stored);
        Ok(id)
    }

    async fn records_by_user(&self, user_id: &str) -> Result<Vec<ProgressRecord>, RemoteError> {
        let records = self.records.lock().await;
        let mut matching: Vec<ProgressRecord> =
            records.values().filter(|r| r.user_id == user_id).cloned().collect();
        matching.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then(a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(matching)
    }

    async fn append_rework(
        &self,
        record_id: &str,
        event: &ReworkEvent,
    ) -> Result<(), RemoteError> {
        if let Some(err) = take_error(&self.append_errors).await {
            return Err(err);
        }
        let mut records = self.records.lock().await;
        let record = records.get_mut(record_id).ok_or_else(|| {
            RemoteError::new(RemoteErrorCode::NotFound, format!("record {record_id}"))
        })?;
        // Both effects together, like the remote store's atomic update
        record.reprocesos.push(event.clone());
        record.horas_invertidas += event.horas_adicionales;
        Ok(())
    }
}

// =============================================================================
// Productivity store
// =============================================================================

#[derive(Default)]
pub struct MockProductivityStore {
    pub events: TokioMutex<Vec<ProductivityEvent>>,
    pub create_errors: TokioMutex<Vec<RemoteError>>,
}

impl MockProductivityStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn push_create_error(&self, error: RemoteError) {
        self.create_errors.lock().await.push(error);
    }

    pub async fn stored_events(&self) -> Vec<ProductivityEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl ProductivityStore for MockProductivityStore {
    async fn create_event(&self, event: &ProductivityEvent) -> Result<String, RemoteError> {
        if let Some(err) = take_error(&self.create_errors).await {
            return Err(err);
        }
        let mut stored = event.clone();
        stored.pending_sync = false;
        stored.synced = true;
        let mut events = self.events.lock().await;
        events.push(stored);
        Ok(format!("prod-{}", events.len()))
    }

    async fn list_events(&self) -> Result<Vec<ProductivityEvent>, RemoteError> {
        Ok(self.events.lock().await.clone())
    }
}

/// Connectivity-class remote error.
pub fn unavailable() -> RemoteError {
    RemoteError::new(RemoteErrorCode::Unavailable, "store unreachable")
}

/// Data-class remote error.
pub fn internal() -> RemoteError {
    RemoteError::new(RemoteErrorCode::Internal, "store rejected the write")
}
