//! # Slipway App
//!
//! Application layer - presentation-facing commands and wiring.
//!
//! This crate contains:
//! - Commands (UI → backend boundary): registration, sign-in, progress
//!   records, rework events, productivity, user administration, dashboards
//! - Application context (dependency injection, background workers)
//! - Headless entry point
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the hexagonal architecture together
//! - Translates workflow errors into user-displayable messages

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::{AppContext, ContextAdapters};
