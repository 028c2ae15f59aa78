//! Registration command.

use std::sync::Arc;
use std::time::Instant;

use slipway_core::RegistrationRequest;
use slipway_domain::UserProfile;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Run the full registration workflow: validation, identity account,
/// profile write with read-back, and compensation on failure.
///
/// Every error variant already carries a user-displayable message.
pub async fn submit_registration(
    context: &Arc<AppContext>,
    request: RegistrationRequest,
) -> Result<UserProfile, String> {
    let started = Instant::now();

    let result =
        context.registration.submit(request).await.map_err(|err| err.to_string());

    log_command_execution("registration::submit_registration", started.elapsed(), result.is_ok());
    result
}
