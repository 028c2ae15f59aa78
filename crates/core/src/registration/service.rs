//! Registration workflow - identity account plus profile document
//!
//! The two resources live in independently-failing stores with no
//! cross-store transaction. The workflow approximates atomicity with
//! forward creation followed by backward compensation: a failed or
//! unconfirmed profile write deletes the just-created identity account.
//! Compensation itself is best-effort; its failure is logged and accepted.

use std::sync::Arc;

use slipway_common::validation::{validate_registration, RegistrationInput, ValidationError};
use slipway_domain::{Role, UserProfile};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::connectivity::ConnectivityProbe;
use crate::identity::ports::IdentityPort;
use crate::user::service::{NewProfile, UserDirectory};

/// Registration form fields.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub email: String,
    pub nombre: String,
    pub password: String,
    pub confirm_password: String,
    /// Defaults to `modelista` when omitted.
    pub rol: Option<Role>,
}

/// Registration failures, each carrying a user-displayable message.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not create the account: {0}")]
    AccountCreation(String),

    #[error("Could not save the user profile: {0}")]
    ProfileWrite(String),

    #[error("No connection. Registration did not complete on the server; try again once online")]
    NotCompleted,
}

/// Orchestrates account creation, profile write, and compensation.
pub struct RegistrationService {
    identity: Arc<dyn IdentityPort>,
    directory: Arc<UserDirectory>,
    connectivity: Arc<dyn ConnectivityProbe>,
}

impl RegistrationService {
    /// Create a new registration service.
    pub fn new(
        identity: Arc<dyn IdentityPort>,
        directory: Arc<UserDirectory>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self { identity, directory, connectivity }
    }

    /// Run the full registration flow.
    ///
    /// 1. Local validation, no I/O.
    /// 2. Identity account creation; failure is terminal (nothing created).
    /// 3. Profile write with read-back confirmation; a failed write while
    ///    online, or a write that fell back to local-only pending, triggers
    ///    account deletion and reports the original failure.
    pub async fn submit(
        &self,
        request: RegistrationRequest,
    ) -> Result<UserProfile, RegistrationError> {
        let input = RegistrationInput {
            email: request.email,
            nombre: request.nombre,
            password: request.password,
            confirm_password: request.confirm_password,
        }
        .normalized();
        validate_registration(&input)?;

        let account_id = self
            .identity
            .create_account(&input.email, &input.password)
            .await
            .map_err(|err| RegistrationError::AccountCreation(err.message))?;

        info!(account_id = %account_id, "identity account created, writing profile");

        let fields =
            NewProfile { email: input.email, nombre: input.nombre, rol: request.rol };

        match self.directory.create_profile(&account_id, fields).await {
            Ok(profile) if profile.pending_sync => {
                // Connectivity dropped mid-flow: the profile only exists
                // locally. Do not leave an identity account paired with no
                // server-side profile.
                self.compensate(&account_id, "registration pending offline").await;
                Err(RegistrationError::NotCompleted)
            }
            Ok(profile) => {
                info!(account_id = %account_id, rol = %profile.rol, "registration committed");
                Ok(profile)
            }
            Err(err) => {
                if self.connectivity.is_online() {
                    self.compensate(&account_id, "profile write failed").await;
                }
                Err(RegistrationError::ProfileWrite(err.to_string()))
            }
        }
    }

    /// Best-effort rollback of the identity account.
    async fn compensate(&self, account_id: &str, reason: &str) {
        warn!(account_id, reason, "compensating: deleting identity account");
        if let Err(err) = self.identity.delete_account(account_id).await {
            // Residual orphaned account accepted; no retry.
            error!(account_id, error = %err, "compensation failed, orphaned account remains");
        }
    }
}
