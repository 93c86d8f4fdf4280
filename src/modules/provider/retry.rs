//! Retry policy for upstream catalog requests.
//!
//! The upstream distinguishes between being rate limited (back off hard,
//! exponentially) and having a transient server problem (short fixed delay).
//! Everything else is abandoned immediately.

use std::time::Duration;

/// Configuration for HTTP retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Per-request timeout for a single HTTP call
    pub request_timeout: Duration,
    /// Base delay after a 429, doubled on each consecutive attempt
    pub rate_limit_base_delay: Duration,
    /// Fixed delay after a 5xx
    pub server_error_delay: Duration,
    /// Maximum delay to wait (prevents excessive waits)
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Policy matched to Jikan's observed behavior.
    pub fn jikan() -> Self {
        Self {
            max_retries: 2,
            request_timeout: Duration::from_secs(15),
            rate_limit_base_delay: Duration::from_secs(2),
            server_error_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(120),
        }
    }

    /// Backoff for a 429 on the given zero-based attempt: 2s, 4s, 8s, ...
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.rate_limit_base_delay.as_millis() as u64;
        let shift = attempt.min(20);
        let delay = Duration::from_millis(base_ms.saturating_mul(1u64 << shift));
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::jikan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jikan_policy() {
        let policy = RetryPolicy::jikan();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.request_timeout, Duration::from_secs(15));
        assert_eq!(policy.server_error_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_rate_limit_delay_doubles() {
        let policy = RetryPolicy::jikan();
        assert_eq!(policy.rate_limit_delay(0), Duration::from_secs(2));
        assert_eq!(policy.rate_limit_delay(1), Duration::from_secs(4));
        assert_eq!(policy.rate_limit_delay(2), Duration::from_secs(8));
    }

    #[test]
    fn test_rate_limit_delay_is_capped() {
        let policy = RetryPolicy::jikan();
        assert_eq!(policy.rate_limit_delay(30), policy.max_delay);
    }
}
