//! Manual clock for deterministic expiry tests

use async_trait::async_trait;
use custos_core::ClockEffects;
use std::sync::atomic::{AtomicU64, Ordering};

/// A clock that moves only when the test advances it
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Clock frozen at the given Unix-millisecond instant
    pub fn at(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute instant
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// The current reading without going through the effect interface
    pub fn reading(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClockEffects for ManualClock {
    async fn now_ms(&self) -> u64 {
        self.reading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_is_controlled() {
        let clock = ManualClock::at(1_000);
        assert_eq!(clock.now_ms().await, 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms().await, 1_500);
        clock.set(10);
        assert_eq!(clock.now_ms().await, 10);
    }
}
