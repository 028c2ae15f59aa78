//! Session context and reconciliation
//!
//! The session context is an explicitly scoped object with a defined
//! lifecycle: initialized at app start, updated on every session-change
//! notification, cleared at sign-out. Consumers receive it by injection,
//! never through ambient globals.
//!
//! Profile reconciliation on sign-in is best-effort throughout: every
//! failure is logged and the flow proceeds with whatever profile data is
//! available. Sign-in is never blocked on reconciliation success.

use std::sync::Arc;

use slipway_domain::{Role, UserProfile};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::identity::ports::{AuthSession, SessionEvent};
use crate::user::service::{NewProfile, UserDirectory};

/// Resolved session state handed to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    pub nombre: String,
    pub rol: Role,
    /// Profile served from the local cache, not confirmed against remote.
    pub offline: bool,
}

impl SessionUser {
    /// Whether this session grants lead privileges.
    pub fn is_lider(&self) -> bool {
        self.rol == Role::Lider
    }
}

/// Scoped holder for the current session.
pub struct SessionContext {
    tx: watch::Sender<Option<SessionUser>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Create an empty (signed-out) context.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Current session, if any.
    pub fn current(&self) -> Option<SessionUser> {
        self.tx.borrow().clone()
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.tx.subscribe()
    }

    fn set(&self, user: SessionUser) {
        let _ = self.tx.send(Some(user));
    }

    fn clear(&self) {
        let _ = self.tx.send(None);
    }
}

/// Applies session-change notifications to the context, self-healing the
/// profile along the way.
pub struct SessionService {
    directory: Arc<UserDirectory>,
    context: Arc<SessionContext>,
}

impl SessionService {
    /// Create a new session service.
    pub fn new(directory: Arc<UserDirectory>, context: Arc<SessionContext>) -> Self {
        Self { directory, context }
    }

    /// Handle one session-change notification.
    pub async fn handle_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::SignedOut => {
                info!("session closed");
                self.context.clear();
            }
            SessionEvent::SignedIn(auth) => {
                let user = self.reconcile(&auth).await;
                self.context.set(user);
            }
        }
    }

    /// Fetch the profile for an authenticated session, creating or
    /// promoting it as needed. Never fails; the worst case is a synthesized
    /// offline placeholder.
    async fn reconcile(&self, auth: &AuthSession) -> SessionUser {
        let mut profile = match self.directory.get_user(&auth.account_id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(uid = %auth.account_id, error = %err, "profile fetch failed at sign-in");
                let mut fallback = UserProfile::placeholder(&auth.account_id);
                fallback.rol = Role::Pendiente;
                Some(fallback)
            }
        };

        let needs_creation = profile.as_ref().map_or(true, |p| p.offline);
        if needs_creation {
            // No confirmed remote profile: create the default one
            let fields = NewProfile {
                email: auth.email.clone(),
                nombre: auth
                    .display_name
                    .clone()
                    .unwrap_or_else(|| auth.email.clone()),
                rol: Some(Role::Modelista),
            };
            match self.directory.create_profile(&auth.account_id, fields).await {
                Ok(_) => match self.directory.get_user(&auth.account_id).await {
                    Ok(refreshed @ Some(_)) => profile = refreshed,
                    Ok(None) => {}
                    Err(err) => {
                        warn!(uid = %auth.account_id, error = %err, "profile refetch failed")
                    }
                },
                Err(err) => {
                    warn!(uid = %auth.account_id, error = %err, "default profile creation failed")
                }
            }
        } else if profile.as_ref().is_some_and(|p| p.rol == Role::Pendiente) {
            // Transitional role left over from an earlier registration path
            match self.directory.update_role(&auth.account_id, Role::Modelista).await {
                Ok(()) => match self.directory.get_user(&auth.account_id).await {
                    Ok(refreshed @ Some(_)) => profile = refreshed,
                    Ok(None) => {}
                    Err(err) => {
                        warn!(uid = %auth.account_id, error = %err, "profile refetch failed")
                    }
                },
                Err(err) => {
                    warn!(uid = %auth.account_id, error = %err, "role promotion failed")
                }
            }
        }

        let profile = profile.unwrap_or_else(|| UserProfile::placeholder(&auth.account_id));

        SessionUser {
            uid: auth.account_id.clone(),
            email: auth.email.clone(),
            nombre: if profile.nombre.is_empty() {
                auth.display_name.clone().unwrap_or_else(|| auth.email.clone())
            } else {
                profile.nombre.clone()
            },
            rol: profile.rol,
            offline: profile.offline,
        }
    }
}
