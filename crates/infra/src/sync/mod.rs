//! Background pending-sync sweep worker.

mod sweep_worker;

pub use sweep_worker::{SweepWorker, SweepWorkerConfig};
