//! # Slipway Common
//!
//! Foundation utilities shared across the workspace.
//!
//! This crate contains:
//! - Input validation rules (registration forms)
//! - Bounded retry/backoff strategy for background sync
//!
//! ## Architecture
//! - No dependencies on other Slipway crates
//! - No I/O; pure, synchronous helpers

pub mod retry;
pub mod validation;

pub use retry::RetryStrategy;
pub use validation::{validate_registration, RegistrationInput, ValidationError};
