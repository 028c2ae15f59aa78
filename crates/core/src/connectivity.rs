//! Connectivity signal port
//!
//! A boolean online/offline flag sourced from the runtime environment. Read
//! synchronously at call time; the subscription's offline-to-online
//! transitions are the sole trigger for background reconciliation.

use tokio::sync::watch;

/// Runtime network-status indicator.
pub trait ConnectivityProbe: Send + Sync {
    /// Current flag, read at call time (never cached by callers).
    fn is_online(&self) -> bool;

    /// Receiver over the flag; `true` means online.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
