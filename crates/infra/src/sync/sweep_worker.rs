//! Sweep worker driven by connectivity transitions.
//!
//! Owns the background task that runs the pending-profile sweep whenever
//! connectivity transitions from offline to online. There is no polling:
//! the watch subscription is the only wake-up source. Join handles are
//! tracked, cancellation is explicit, and the token cancels on drop.

use std::sync::Arc;
use std::time::Duration;

use slipway_core::connectivity::ConnectivityProbe;
use slipway_core::sync::PendingProfileSync;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Configuration for the sweep worker.
#[derive(Debug, Clone)]
pub struct SweepWorkerConfig {
    /// Join timeout when stopping.
    pub join_timeout: Duration,
}

impl Default for SweepWorkerConfig {
    fn default() -> Self {
        Self { join_timeout: Duration::from_secs(5) }
    }
}

/// Sweep worker with explicit lifecycle management.
pub struct SweepWorker {
    sweep: Arc<PendingProfileSync>,
    connectivity: Arc<dyn ConnectivityProbe>,
    config: SweepWorkerConfig,
    cancellation: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl SweepWorker {
    /// Create a new worker over the given sweep and connectivity signal.
    pub fn new(
        sweep: Arc<PendingProfileSync>,
        connectivity: Arc<dyn ConnectivityProbe>,
        config: SweepWorkerConfig,
    ) -> Self {
        Self {
            sweep,
            connectivity,
            config,
            cancellation: CancellationToken::new(),
            task_handle: None,
        }
    }

    /// Start the worker, spawning the background watch task.
    pub fn start(&mut self) -> Result<(), String> {
        if self.is_running() {
            return Err("Worker already running".to_string());
        }

        info!("Starting sweep worker");

        self.cancellation = CancellationToken::new();
        let sweep = Arc::clone(&self.sweep);
        let connectivity = Arc::clone(&self.connectivity);
        let cancel = self.cancellation.clone();

        let handle = tokio::spawn(async move {
            Self::watch_loop(sweep, connectivity, cancel).await;
        });

        self.task_handle = Some(handle);
        info!("Sweep worker started");
        Ok(())
    }

    /// Stop the worker and wait for the watch task to finish.
    pub async fn stop(&mut self) -> Result<(), String> {
        if !self.is_running() {
            return Err("Worker not running".to_string());
        }

        info!("Stopping sweep worker");
        self.cancellation.cancel();

        if let Some(handle) = self.task_handle.take() {
            match tokio::time::timeout(self.config.join_timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("Worker task panicked: {}", e);
                    return Err("Worker task panicked".to_string());
                }
                Err(_) => {
                    warn!("Worker task did not complete within timeout");
                    return Err("Worker task timeout".to_string());
                }
            }
        }

        info!("Sweep worker stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when a worker instance is active.
    pub fn is_running(&self) -> bool {
        self.task_handle.is_some()
    }

    async fn watch_loop(
        sweep: Arc<PendingProfileSync>,
        connectivity: Arc<dyn ConnectivityProbe>,
        cancel: CancellationToken,
    ) {
        let mut rx = connectivity.subscribe();
        let mut was_online = *rx.borrow();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("sweep worker watch loop cancelled");
                    break;
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        debug!("connectivity channel closed, stopping sweep worker");
                        break;
                    }
                    let online = *rx.borrow();
                    let transitioned = online && !was_online;
                    was_online = online;
                    if transitioned {
                        info!("back online, running pending-sync sweep");
                        Self::run_rounds(&sweep, &cancel).await;
                    }
                }
            }
        }
    }

    /// Run sweep passes until nothing retryable remains.
    ///
    /// The per-entry attempt budget lives in the cache; rounds here are
    /// bounded by the same strategy, with its backoff between passes, so a
    /// persistently failing set of entries dead-letters instead of spinning.
    async fn run_rounds(sweep: &PendingProfileSync, cancel: &CancellationToken) {
        let strategy = sweep.strategy().clone();

        for round in 1..=strategy.max_attempts() {
            let delay = strategy.delay_before(round);
            if !delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let summary = sweep.sweep().await;
            if !summary.has_retryable_failures() {
                return;
            }
            debug!(round, failed = summary.failed, "sweep round left retryable entries");
        }
    }
}

impl Drop for SweepWorker {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
