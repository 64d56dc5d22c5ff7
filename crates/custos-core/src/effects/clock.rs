//! Wall-clock effect interface
//!
//! Expiry enforcement and every recorded timestamp read the clock through
//! this trait, so tests control time deterministically.

use async_trait::async_trait;
use std::sync::Arc;

/// Clock reads for timestamps and expiry checks
#[async_trait]
pub trait ClockEffects: Send + Sync {
    /// Current Unix timestamp in milliseconds
    async fn now_ms(&self) -> u64;
}

#[async_trait]
impl<T: ClockEffects + ?Sized> ClockEffects for Arc<T> {
    async fn now_ms(&self) -> u64 {
        (**self).now_ms().await
    }
}
