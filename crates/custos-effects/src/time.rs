//! System clock handler

use async_trait::async_trait;
use custos_core::ClockEffects;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock handler for production use
///
/// Stateless; delegates to the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClockEffects for SystemClock {
    async fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clock_advances() {
        let clock = SystemClock::new();
        let first = clock.now_ms().await;
        // The epoch is well behind us.
        assert!(first > 1_600_000_000_000);
        let second = clock.now_ms().await;
        assert!(second >= first);
    }
}
