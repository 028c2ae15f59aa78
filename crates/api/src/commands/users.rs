//! User administration commands.

use std::sync::Arc;
use std::time::Instant;

use slipway_core::SessionUser;
use slipway_domain::{Role, UserProfile};

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Resolve the current session and require lead privileges.
fn require_lider(context: &Arc<AppContext>) -> Result<SessionUser, String> {
    match context.session.current() {
        Some(user) if user.is_lider() => Ok(user),
        Some(_) => Err("Only a lider can manage users".to_string()),
        None => Err("Not signed in".to_string()),
    }
}

/// Fetch a profile, served from the cache when offline.
pub async fn get_user(
    context: &Arc<AppContext>,
    id: &str,
) -> Result<Option<UserProfile>, String> {
    let started = Instant::now();

    let result = context.directory.get_user(id).await.map_err(|err| err.to_string());

    log_command_execution("users::get_user", started.elapsed(), result.is_ok());
    result
}

/// All profiles, for the lead administration view.
pub async fn list_users(context: &Arc<AppContext>) -> Result<Vec<UserProfile>, String> {
    let started = Instant::now();

    let result = context.directory.list_users().await.map_err(|err| err.to_string());

    log_command_execution("users::list_users", started.elapsed(), result.is_ok());
    result
}

/// Change a user's role. Lead-only.
pub async fn update_user_role(
    context: &Arc<AppContext>,
    id: &str,
    rol: Role,
) -> Result<(), String> {
    let started = Instant::now();

    let result = match require_lider(context) {
        Ok(_) => context.directory.update_role(id, rol).await.map_err(|err| err.to_string()),
        Err(err) => Err(err),
    };

    log_command_execution("users::update_user_role", started.elapsed(), result.is_ok());
    result
}
