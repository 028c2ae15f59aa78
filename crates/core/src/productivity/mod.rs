//! Productivity event workflows

pub mod ports;
pub mod service;

pub use service::{NewEventInput, ProductivityService};
