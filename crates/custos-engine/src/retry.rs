//! Bounded retry for contended updates
//!
//! `ConcurrentModification` is expected under contention and is the only
//! retryable error: the writer re-reads the aggregate and reapplies its
//! single operation. Everything else surfaces immediately.

use std::time::Duration;

/// Retry bounds for optimistic-concurrency conflicts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts before the conflict surfaces to the caller
    pub max_attempts: u32,
    /// Base backoff; doubles per attempt
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff_ms: 5,
        }
    }
}

impl RetryPolicy {
    /// Backoff before the given attempt (1-based), exponentially grown
    pub fn delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_backoff_ms << attempt.min(6))
    }

    /// Whether another attempt is allowed after `attempt` attempts failed
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert!(policy.delay(1) < policy.delay(2));
        assert!(policy.delay(2) < policy.delay(3));
        // The shift saturates so huge attempt counts stay sane.
        assert_eq!(policy.delay(6), policy.delay(60));
    }

    #[test]
    fn test_attempt_limit() {
        let policy = RetryPolicy::default();
        assert!(policy.allows_retry(0));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
    }
}
