//! Port interfaces for the hosted identity provider
//!
//! Account deletion exists exclusively as a compensating action for failed
//! registrations, never as a user-facing feature.

use async_trait::async_trait;
use slipway_domain::IdentityError;
use tokio::sync::watch;

/// Authenticated session details reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Provider account id.
    pub account_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Login/logout transition, including the initial state at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(AuthSession),
    SignedOut,
}

/// Trait for identity provider operations
#[async_trait]
pub trait IdentityPort: Send + Sync {
    /// Create a new account; returns the provider-assigned account id.
    async fn create_account(&self, email: &str, password: &str)
        -> Result<String, IdentityError>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError>;

    /// Sign out the current session.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Delete an account (compensation only).
    async fn delete_account(&self, account_id: &str) -> Result<(), IdentityError>;

    /// Subscribe to session changes. The receiver holds the current state,
    /// so subscribers observe the startup session (or its absence)
    /// immediately.
    fn subscribe_sessions(&self) -> watch::Receiver<SessionEvent>;
}
