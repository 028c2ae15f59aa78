//! Pending-sync sweep

pub mod service;

pub use service::{PendingProfileSync, SweepSummary};
