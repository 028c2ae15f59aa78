//! Registration workflow

pub mod service;

pub use service::{RegistrationError, RegistrationRequest, RegistrationService};
