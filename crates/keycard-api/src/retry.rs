//! Retry policy for access-token acquisition

use std::time::Duration;

/// Exponential backoff configuration
///
/// Applied to token acquisition only. Regular API calls are never retried.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub initial_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// A policy that makes exactly one attempt
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Delay to wait after the given failed attempt (1-based)
    ///
    /// Always within `0..=max_delay`, whatever the multiplier.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        // NaN and negative products collapse to zero
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_delay_is_capped() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        };
        assert_eq!(config.delay_for(1), Duration::from_secs(1));
        assert_eq!(config.delay_for(2), Duration::from_secs(2));
        assert_eq!(config.delay_for(3), Duration::from_secs(4));
        assert_eq!(config.delay_for(4), Duration::from_secs(5));
    }

    #[test]
    fn test_bad_multiplier_never_panics() {
        let negative = RetryConfig {
            backoff_multiplier: -2.0,
            ..RetryConfig::default()
        };
        assert_eq!(negative.delay_for(2), Duration::ZERO);
        assert_eq!(negative.delay_for(3), Duration::from_secs(2));

        let nan = RetryConfig {
            backoff_multiplier: f64::NAN,
            ..RetryConfig::default()
        };
        assert!(nan.delay_for(2) <= nan.max_delay);

        let huge = RetryConfig {
            backoff_multiplier: f64::MAX,
            ..RetryConfig::default()
        };
        assert_eq!(huge.delay_for(u32::MAX), huge.max_delay);
    }

    #[test]
    fn test_max_attempts_never_zero() {
        assert_eq!(RetryConfig::default().with_max_attempts(0).max_attempts, 1);
        assert_eq!(RetryConfig::none().max_attempts, 1);
    }
}
