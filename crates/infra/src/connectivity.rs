//! Connectivity signal implementation.
//!
//! A watch-channel flag the host environment drives. The flag is read
//! synchronously at call time; offline-to-online transitions on the
//! subscription are the sole trigger for background reconciliation.

use slipway_core::connectivity::ConnectivityProbe;
use tokio::sync::watch;
use tracing::info;

/// Watch-backed network status flag.
pub struct NetworkStatus {
    tx: watch::Sender<bool>,
}

impl NetworkStatus {
    /// Create a status flag with the given initial state.
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    /// Create a flag that starts online.
    pub fn online() -> Self {
        Self::new(true)
    }

    /// Update the flag; subscribers observe the transition.
    pub fn set_online(&self, online: bool) {
        let changed = *self.tx.borrow() != online;
        if changed {
            info!(online, "connectivity changed");
        }
        let _ = self.tx.send(online);
    }
}

impl ConnectivityProbe for NetworkStatus {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
