//! Reconnect backoff policy
//!
//! Delay for reconnect attempt `n` (1-based) is
//! `min(initial * 2^(n-1), max)`. No jitter is applied.

use std::time::Duration;

use crate::config::ChannelConfig;

/// Exponential backoff with an attempt budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    max_attempts: u32,
    attempts: u32,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, max_attempts: u32) -> Self {
        Self {
            initial,
            max,
            max_attempts,
            attempts: 0,
        }
    }

    pub fn from_config(config: &ChannelConfig) -> Self {
        Self::new(
            config.initial_backoff,
            config.max_backoff,
            config.max_reconnect_attempts,
        )
    }

    /// Delay before reconnect attempt `attempt` (1-based; 0 is treated as 1)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.max)
    }

    /// Claim the next attempt and return its delay, or `None` once the
    /// budget is spent
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.delay_for(self.attempts))
    }

    /// Back to the initial interval after a successful connection
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Reconnect attempts claimed since the last reset
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_backoff() -> Backoff {
        Backoff::new(Duration::from_millis(1000), Duration::from_millis(30_000), 10)
    }

    #[test]
    fn test_delays_double_and_cap() {
        let mut backoff = default_backoff();
        let delays: Vec<u64> = std::iter::from_fn(|| backoff.next_delay())
            .map(|d| d.as_millis() as u64)
            .collect();

        assert_eq!(
            delays,
            vec![1000, 2000, 4000, 8000, 16_000, 30_000, 30_000, 30_000, 30_000, 30_000]
        );
    }

    #[test]
    fn test_formula_for_every_attempt() {
        let backoff = default_backoff();
        for n in 1..=10u32 {
            let expected = (1000u64 * 2u64.pow(n - 1)).min(30_000);
            assert_eq!(backoff.delay_for(n), Duration::from_millis(expected));
        }
    }

    #[test]
    fn test_no_delay_after_budget_spent() {
        let mut backoff = default_backoff();
        for _ in 0..10 {
            assert!(backoff.next_delay().is_some());
        }
        assert!(backoff.is_exhausted());
        assert_eq!(backoff.next_delay(), None);
        assert_eq!(backoff.attempts(), 10);
    }

    #[test]
    fn test_reset_restarts_at_initial() {
        let mut backoff = default_backoff();
        backoff.next_delay();
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();

        assert_eq!(backoff.attempts(), 0);
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_large_attempt_does_not_overflow() {
        let backoff = default_backoff();
        assert_eq!(backoff.delay_for(64), Duration::from_millis(30_000));
        assert_eq!(backoff.delay_for(0), Duration::from_millis(1000));
    }
}
