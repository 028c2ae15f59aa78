//! Bounded retry strategy with exponential backoff
//!
//! Used by the pending-sync sweep to bound per-entry attempts. Entries that
//! exhaust the budget are dead-lettered by the caller (logged and dropped),
//! never retried forever.

use std::time::Duration;

use rand::Rng;

/// Retry strategy: bounded attempts, exponential backoff, optional jitter.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    jitter_factor: f64,
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
            jitter_factor: 0.2,
        }
    }
}

impl RetryStrategy {
    /// Create a strategy with library defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of attempts (minimum 1).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the base delay used for the first backoff step.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Cap the backoff delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the jitter factor in `[0.0, 1.0]`.
    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Maximum number of attempts before the caller dead-letters the work.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt is allowed after `attempts` completed tries.
    pub fn allows(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }

    /// Backoff delay before attempt number `attempt` (1-based), with jitter.
    ///
    /// Attempt 1 has no delay; attempt `n` waits `base * 2^(n-2)` capped at
    /// `max_delay`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }

        let exp = attempt.saturating_sub(2).min(30);
        let raw = self.base_delay.as_millis().saturating_mul(1_u128 << exp);
        let capped = raw.min(self.max_delay.as_millis());

        let jittered = if self.jitter_factor > 0.0 {
            let spread = (capped as f64) * self.jitter_factor;
            let offset = rand::thread_rng().gen_range(-spread..=spread);
            ((capped as f64) + offset).max(0.0) as u128
        } else {
            capped
        };

        Duration::from_millis(jittered.min(u128::from(u64::MAX)) as u64)
    }
}
