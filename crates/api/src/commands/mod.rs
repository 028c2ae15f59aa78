//! Presentation-facing commands.
//!
//! Every command resolves to a success value or a user-displayable message;
//! adapter errors never cross this boundary raw. Outcomes are logged with
//! structured fields.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod productivity;
pub mod records;
pub mod registration;
pub mod sync;
pub mod users;

pub use auth::{current_session, sign_in, sign_out};
pub use dashboard::{
    lider_dashboard, modelista_dashboard, productivity_dashboard, LiderDashboard,
    ModelistaDashboard, ProductivityDashboard,
};
pub use health::health_check;
pub use productivity::{load_productivity_events, record_productivity_event};
pub use records::{
    append_rework_event, create_progress_record, list_progress_records, CreatedRecord,
};
pub use registration::submit_registration;
pub use sync::sync_pending_profiles;
pub use users::{get_user, list_users, update_user_role};
