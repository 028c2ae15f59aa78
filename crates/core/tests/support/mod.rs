//! Shared mock adapters for workflow integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use slipway_core::connectivity::ConnectivityProbe;
use slipway_core::identity::ports::{AuthSession, IdentityPort, SessionEvent};
use slipway_core::productivity::ports::{ProductivityLocalStore, ProductivityStore};
use slipway_core::records::ports::ProgressStore;
use slipway_core::user::ports::{PendingProfile, ProfileCache, RemoteUserStore};
use slipway_domain::{
    IdentityError, IdentityErrorKind, ProductivityEvent, ProgressRecord, RemoteError,
    RemoteErrorCode, ReworkEvent, Role, UserProfile,
};
use tokio::sync::{watch, Mutex as TokioMutex, Notify};

// =============================================================================
// Connectivity
// =============================================================================

/// Watch-backed connectivity flag tests can flip at will.
pub struct TestConnectivity {
    tx: watch::Sender<bool>,
}

impl TestConnectivity {
    pub fn online() -> Arc<Self> {
        Self::with_state(true)
    }

    pub fn offline() -> Arc<Self> {
        Self::with_state(false)
    }

    pub fn with_state(online: bool) -> Arc<Self> {
        let (tx, _rx) = watch::channel(online);
        Arc::new(Self { tx })
    }

    pub fn set_online(&self, online: bool) {
        let _ = self.tx.send(online);
    }
}

impl ConnectivityProbe for TestConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Mock identity provider recording created and deleted accounts.
pub struct MockIdentity {
    pub created: TokioMutex<Vec<String>>,
    pub deleted: TokioMutex<Vec<String>>,
    pub fail_create: bool,
    pub fail_delete: bool,
    session_tx: watch::Sender<SessionEvent>,
}

impl MockIdentity {
    pub fn new() -> Arc<Self> {
        let (session_tx, _rx) = watch::channel(SessionEvent::SignedOut);
        Arc::new(Self {
            created: TokioMutex::new(Vec::new()),
            deleted: TokioMutex::new(Vec::new()),
            fail_create: false,
            fail_delete: false,
            session_tx,
        })
    }

    pub fn failing_create() -> Arc<Self> {
        let (session_tx, _rx) = watch::channel(SessionEvent::SignedOut);
        Arc::new(Self {
            created: TokioMutex::new(Vec::new()),
            deleted: TokioMutex::new(Vec::new()),
            fail_create: true,
            fail_delete: false,
            session_tx,
        })
    }

    pub fn failing_delete() -> Arc<Self> {
        let (session_tx, _rx) = watch::channel(SessionEvent::SignedOut);
        Arc::new(Self {
            created: TokioMutex::new(Vec::new()),
            deleted: TokioMutex::new(Vec::new()),
            fail_create: false,
            fail_delete: true,
            session_tx,
        })
    }

    pub async fn created_accounts(&self) -> Vec<String> {
        self.created.lock().await.clone()
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
        if self.fail_create {
            return Err(IdentityError::new(
                IdentityErrorKind::EmailInUse,
                "email already registered",
            ));
        }
        let account_id = format!("acct-{}", self.created.lock().await.len() + 1);
        self.created.lock().await.push(email.to_string());
        Ok(account_id)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthSession, IdentityError> {
        Ok(AuthSession {
            account_id: "acct-1".to_string(),
            email: email.to_string(),
            display_name: None,
        })
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.emit(SessionEvent::SignedOut);
        Ok(())
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), IdentityError> {
        if self.fail_delete {
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
    /// Errors handed out by `create_profile`, consumed front-first.
    pub create_errors: TokioMutex<Vec<RemoteError>>,
    /// Errors handed out by `merge_profile`, consumed front-first.
    pub merge_errors: TokioMutex<Vec<RemoteError>>,
    /// Errors handed out by `fetch_profile`, consumed front-first.
    pub fetch_errors: TokioMutex<Vec<RemoteError>>,
}

impl MockUserStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn with_profile(self: &Arc<Self>, profile: UserProfile) -> Arc<Self> {
        self.profiles.lock().await.insert(profile.id.clone(), profile);
        Arc::clone(self)
    }

    pub async fn push_create_error(&self, error: RemoteError) {
        self.create_errors.lock().await.push(error);
    }

    pub async fn push_merge_error(&self, error: RemoteError) {
        self.merge_errors.lock().await.push(error);
    }

    pub async fn push_fetch_error(&self, error: RemoteError) {
        self.fetch_errors.lock().await.push(error);
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
        if let Some(err) = take_error(&self.fetch_errors).await {
            return Err(err);
        }
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
        Ok(self
            .profiles
            .lock()
            .await
            .values()
            .filter(|p| p.rol == rol)
            .cloned()
            .collect())
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
// Profile cache
// =============================================================================

#[derive(Default)]
pub struct MemoryProfileCache {
    entries: TokioMutex<HashMap<String, (UserProfile, u32)>>,
}

impl MemoryProfileCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn attempts(&self, id: &str) -> u32 {
        self.entries.lock().await.get(id).map_or(0, |(_, attempts)| *attempts)
    }
}

#[async_trait]
impl ProfileCache for MemoryProfileCache {
    async fn get(&self, id: &str) -> Option<UserProfile> {
        self.entries.lock().await.get(id).map(|(profile, _)| profile.clone())
    }

    async fn put(&self, profile: &UserProfile) {
        let mut entries = self.entries.lock().await;
        let attempts = entries.get(&profile.id).map_or(0, |(_, attempts)| *attempts);
        entries.insert(profile.id.clone(), (profile.clone(), attempts));
    }

    async fn pending_profiles(&self) -> Vec<PendingProfile> {
        self.entries
            .lock()
            .await
            .values()
            .filter(|(profile, _)| profile.pending_sync)
            .map(|(profile, attempts)| PendingProfile {
                profile: profile.clone(),
                attempts: *attempts,
            })
            .collect()
    }

    async fn record_failed_attempt(&self, id: &str) -> u32 {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(id) {
            Some((_, attempts)) => {
                *attempts += 1;
                *attempts
            }
            None => 0,
        }
    }

    async fn mark_synced(&self, profile: &UserProfile) {
        let mut synced = profile.clone();
        synced.pending_sync = false;
        synced.offline = false;
        self.entries.lock().await.insert(synced.id.clone(), (synced, 0));
    }

    async fn abandon_pending(&self, id: &str) {
        let mut entries = self.entries.lock().await;
        if let Some((profile, _)) = entries.get_mut(id) {
            profile.pending_sync = false;
        }
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
    /// When set, `create_record` blocks until `release_create` is called.
    create_gate: Option<Arc<Notify>>,
}

impl MockProgressStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store whose `create_record` waits for an explicit release, letting
    /// tests interleave work while a create is in flight.
    pub fn gated() -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(Self { create_gate: Some(Arc::clone(&gate)), ..Self::default() });
        (store, gate)
    }

    pub async fn push_create_error(&self, error: RemoteError) {
        self.create_errors.lock().await.push(error);
    }

    pub async fn push_append_error(&self, error: RemoteError) {
        self.append_errors.lock().await.push(error);
    }

    pub async fn stored(&self, id: &str) -> Option<ProgressRecord> {
        self.records.lock().await.get(id).cloned()
    }
}

#[async_trait]
impl ProgressStore for MockProgressStore {
    async fn create_record(&self, record: &ProgressRecord) -> Result<String, RemoteError> {
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
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
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.as_str().cmp(b.id.as_str())));
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
// Productivity stores
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

#[derive(Default)]
pub struct MemoryProductivityLocal {
    events: TokioMutex<Vec<ProductivityEvent>>,
}

impl MemoryProductivityLocal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ProductivityLocalStore for MemoryProductivityLocal {
    async fn save(&self, event: &ProductivityEvent) {
        let mut events = self.events.lock().await;
        if let Some(existing) = events.iter_mut().find(|e| e.id == event.id) {
            *existing = event.clone();
        } else {
            events.push(event.clone());
        }
    }

    async fn pending(&self) -> Vec<ProductivityEvent> {
        self.events.lock().await.iter().filter(|e| e.pending_sync).cloned().collect()
    }

    async fn mark_synced(&self, id: &str) {
        let mut events = self.events.lock().await;
        if let Some(event) = events.iter_mut().find(|e| e.id == id) {
            event.pending_sync = false;
            event.synced = true;
        }
    }

    async fn all(&self) -> Vec<ProductivityEvent> {
        self.events.lock().await.clone()
    }
}
