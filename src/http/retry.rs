//! Retry policy
//!
//! Decides how many extra attempts a request gets and how long to wait
//! between them. The defaults follow the API's published client behaviour:
//! five retries, exponential backoff from 500ms growing by 1.5x, capped at
//! 60s, with +/-50% jitter.

use crate::types::BackoffType;
use rand::Rng;
use std::time::Duration;

/// Retry and backoff configuration for one logical request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one
    pub max_retries: u32,
    /// Shape of the delay curve
    pub backoff_type: BackoffType,
    /// Delay before the first retry
    pub initial_interval: Duration,
    /// Growth factor for exponential backoff
    pub multiplier: f64,
    /// Upper bound for the un-jittered delay
    pub max_interval: Duration,
    /// Jitter as a fraction of the delay, in `0.0..=1.0`
    pub randomization_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_type: BackoffType::Exponential,
            initial_interval: Duration::from_millis(500),
            multiplier: 1.5,
            max_interval: Duration::from_secs(60),
            randomization_factor: 0.5,
        }
    }
}

impl RetryPolicy {
    /// Retry `max_retries` times without waiting
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_type: BackoffType::Constant,
            initial_interval: Duration::ZERO,
            randomization_factor: 0.0,
            ..Self::default()
        }
    }

    /// Never retry
    pub fn none() -> Self {
        Self::immediate(0)
    }

    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Un-jittered delay before retry number `attempt + 1`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial_interval,
            BackoffType::Linear => self.initial_interval.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let secs = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);
                if !secs.is_finite() || secs >= self.max_interval.as_secs_f64() {
                    self.max_interval
                } else if secs <= 0.0 {
                    Duration::ZERO
                } else {
                    Duration::from_secs_f64(secs)
                }
            }
        };

        std::cmp::min(delay, self.max_interval)
    }

    /// Jittered delay drawn from `rng`
    ///
    /// Uniform in `[d - f*d, d + f*d]` where `d` is [`calculate_backoff`]
    /// and `f` the randomization factor, capped at 1. A factor that is not a
    /// positive finite number disables jitter.
    ///
    /// [`calculate_backoff`]: RetryPolicy::calculate_backoff
    pub fn delay_with<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = self.calculate_backoff(attempt);
        let factor = self.randomization_factor;
        if base.is_zero() || !factor.is_finite() || factor <= 0.0 {
            return base;
        }

        let secs = base.as_secs_f64();
        let delta = secs * factor.min(1.0);
        Duration::try_from_secs_f64(rng.gen_range((secs - delta)..=(secs + delta)))
            .unwrap_or(self.max_interval)
    }

    /// Jittered delay using the thread RNG
    pub fn next_delay(&self, attempt: u32) -> Duration {
        self.delay_with(attempt, &mut rand::thread_rng())
    }
}
