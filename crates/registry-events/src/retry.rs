//! Exponential backoff with jitter for the publish path, scoped down from
//! the generic retry-strategy idiom to just this crate's needs.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt number `attempt` (0-indexed), with jitter drawn
    /// uniformly from `[0, base_delay)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let jitter = rand::random::<f64>() * base_delay_ms;
        Duration::from_millis((base_delay_ms + jitter) as u64).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_allows_at_least_three_attempts() {
        assert!(RetryPolicy::default().max_attempts >= 3);
    }

    #[test]
    fn delay_grows_with_attempt_and_stays_bounded() {
        let policy = RetryPolicy::default();
        for attempt in 0..10 {
            assert!(policy.delay_for_attempt(attempt) <= policy.max_delay);
        }
    }
}
