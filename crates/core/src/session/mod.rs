//! Session lifecycle and profile self-healing

pub mod service;

pub use service::{SessionContext, SessionService, SessionUser};
