//! # Slipway Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the remote store, identity
//!   provider, local cache, and connectivity signal
//! - The reconciliation workflows: registration with compensation,
//!   optimistic progress-record creation, rework append/replay, session
//!   self-healing, and the pending-sync sweep
//! - Dashboard KPI aggregation
//!
//! ## Architecture Principles
//! - Only depends on `slipway-common` and `slipway-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod connectivity;
pub mod identity;
pub mod kpi;
pub mod productivity;
pub mod records;
pub mod registration;
pub mod session;
pub mod sync;
pub mod user;

// Re-export specific items to avoid ambiguity
pub use connectivity::ConnectivityProbe;
pub use identity::ports::{AuthSession, IdentityPort, SessionEvent};
pub use productivity::ports::{ProductivityLocalStore, ProductivityStore};
pub use productivity::ProductivityService;
pub use records::ports::ProgressStore;
pub use records::{CommitReport, CreateOutcome, LedgerError, ProgressLedger};
pub use registration::{RegistrationError, RegistrationRequest, RegistrationService};
pub use session::{SessionContext, SessionService, SessionUser};
pub use sync::{PendingProfileSync, SweepSummary};
pub use user::ports::{PendingProfile, ProfileCache, RemoteUserStore};
pub use user::{NewProfile, UserDirectory};
