//! Remote document store adapters
//!
//! One HTTP JSON client plus one adapter per collection (`users`,
//! `avances`, `productividad`). Ordered queries carry an explicit degraded
//! mode: the missing-composite-index error signature triggers a transparent
//! unordered retry inside the client, never at call sites.

mod client;
mod productivity;
mod records;
mod users;

pub use client::DocStoreClient;
pub use productivity::HttpProductivityStore;
pub use records::HttpProgressStore;
pub use users::HttpUserStore;
