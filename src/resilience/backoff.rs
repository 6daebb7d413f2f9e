//! Retry delays.

use std::time::Duration;
use rand::Rng;

use crate::config::{BackoffStrategy, RetryConfig};

/// Shortest delay any timer is allowed to use.
pub const MIN_DELAY: Duration = Duration::from_millis(1);

/// How many times to retry a failed fetch and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before each retry (the base delay for exponential backoff).
    pub delay: Duration,
    pub strategy: BackoffStrategy,
    /// Upper bound for exponential backoff.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Fixed delay between attempts.
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            strategy: BackoffStrategy::Fixed,
            max_delay: delay,
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::fixed(0, MIN_DELAY)
    }

    /// Total attempts including the initial one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based). Never shorter than [`MIN_DELAY`].
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.strategy {
            BackoffStrategy::Fixed => self.delay.max(MIN_DELAY),
            BackoffStrategy::Exponential => exponential_delay(retry, self.delay, self.max_delay),
        }
    }
}

impl Default for RetryPolicy {
    /// Two retries, one second apart.
    fn default() -> Self {
        Self::fixed(2, Duration::from_millis(1000))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.delay_ms),
            strategy: config.strategy,
            max_delay: Duration::from_millis(config.max_delay_ms.max(config.delay_ms)),
        }
    }
}

/// `base * 2^(retry - 1)`, capped at `max`, plus up to 10% jitter.
pub fn exponential_delay(retry: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(retry.saturating_sub(1));
    let capped = base.saturating_mul(factor).min(max).max(MIN_DELAY);

    let spread = u64::try_from(capped.as_millis() / 10).unwrap_or(u64::MAX);
    if spread == 0 {
        return capped;
    }
    capped.saturating_add(Duration::from_millis(rand::thread_rng().gen_range(0..spread)))
}
