//! Randomized delay before each click.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Uniformly jittered delay window applied before every click.
#[derive(Debug, Clone, Copy)]
pub struct PacingPolicy {
    pub min: Duration,
    pub max: Duration,
}

impl PacingPolicy {
    /// No delay, for tests.
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// One delay drawn from the window.
    ///
    /// Jitter comes from the wall clock's nanosecond remainder, which
    /// is plenty for click pacing.
    pub fn delay(&self) -> Duration {
        let span = self.max.saturating_sub(self.min);
        if span.is_zero() {
            return self.min;
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos() as u128;
        let jitter = nanos % span.as_millis().max(1);
        self.min + Duration::from_millis(jitter as u64)
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(400),
            max: Duration::from_millis(1200),
        }
    }
}
