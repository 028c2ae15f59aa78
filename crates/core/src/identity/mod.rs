//! Identity provider integration

pub mod ports;

pub use ports::{AuthSession, IdentityPort, SessionEvent};
