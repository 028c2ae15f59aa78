//! Domain types and models

pub mod productivity;
pub mod record;
pub mod user;

pub use productivity::{EventSignature, EventType, ProductivityEvent};
pub use record::{ProgressRecord, RecordId, RecordStatus, ReworkEvent};
pub use user::{Role, UserProfile};
