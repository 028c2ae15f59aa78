//! Progress record ("avance") workflows

pub mod ports;
pub mod service;

pub use service::{
    CommitReport, CreateOutcome, LedgerError, NewRecordInput, NewReworkInput, ProgressLedger,
    ReplayFailure,
};
