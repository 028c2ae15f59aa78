//! Hosted identity provider adapter.

mod client;

pub use client::{HttpIdentityClient, SessionHub};
