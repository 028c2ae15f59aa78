//! Sign-in and sign-out commands.

use std::sync::Arc;
use std::time::Instant;

use slipway_core::SessionUser;
use tracing::info;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Sign in and wait for the reconciled session to land in the context.
///
/// The session listener performs profile self-healing on the sign-in event;
/// this command resolves once the resulting session user is observable.
pub async fn sign_in(
    context: &Arc<AppContext>,
    email: &str,
    password: &str,
) -> Result<SessionUser, String> {
    let started = Instant::now();
    let mut sessions = context.session.subscribe();

    let result = match context.identity.sign_in(email, password).await {
        Ok(auth) => {
            let landed = sessions
                .wait_for(|user| user.as_ref().is_some_and(|u| u.uid == auth.account_id))
                .await;
            match landed {
                Ok(user) => user
                    .clone()
                    .ok_or_else(|| "Session was closed before sign-in completed".to_string()),
                Err(_) => Err("Session was closed before sign-in completed".to_string()),
            }
        }
        Err(err) => Err(err.message),
    };

    log_command_execution("auth::sign_in", started.elapsed(), result.is_ok());
    if let Ok(user) = &result {
        info!(uid = %user.uid, rol = %user.rol, "session established");
    }
    result
}

/// Sign out and wait for the session context to clear.
pub async fn sign_out(context: &Arc<AppContext>) -> Result<(), String> {
    let started = Instant::now();
    let mut sessions = context.session.subscribe();

    let result = match context.identity.sign_out().await {
        Ok(()) => sessions
            .wait_for(|user| user.is_none())
            .await
            .map(|_| ())
            .map_err(|_| "Session was closed before sign-out completed".to_string()),
        Err(err) => Err(err.message),
    };

    log_command_execution("auth::sign_out", started.elapsed(), result.is_ok());
    result
}

/// Current session, if any.
pub fn current_session(context: &Arc<AppContext>) -> Option<SessionUser> {
    context.session.current()
}
