//! Bounded retry with randomized exponential backoff.
//!
//! The policy is an explicit value handed to the engine, so tests can swap the
//! randomized wait for a constant (usually zero) one.

use crate::{Error, Result};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// Wait between a failed attempt and the next one.
pub trait Backoff: Send + Sync {
    /// `attempt` is 1-based: the number of the attempt that just failed.
    fn delay(&self, attempt: u32) -> Duration;
}

/// Uniform random wait in `[min, min(max, max(min, multiplier * 2^(attempt-1)))]`.
///
/// With the defaults the upper bound grows 1s, 2s, 4s, 5s, 5s.
#[derive(Debug, Clone)]
pub struct RandomExponentialBackoff {
    pub multiplier: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl Default for RandomExponentialBackoff {
    fn default() -> Self {
        Self {
            multiplier: Duration::from_secs(1),
            min: DEFAULT_MIN_DELAY,
            max: DEFAULT_MAX_DELAY,
        }
    }
}

impl RandomExponentialBackoff {
    /// Upper bound of the wait after `attempt` failures.
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let grown = self.multiplier.saturating_mul(1u32 << exp);
        grown.min(self.max).max(self.min)
    }

    pub fn delay_with<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let low = self.min.as_secs_f64();
        let high = self.ceiling(attempt).as_secs_f64();
        if high <= low {
            return self.min;
        }
        Duration::from_secs_f64(rng.gen_range(low..=high))
    }
}

impl Backoff for RandomExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        self.delay_with(attempt, &mut rand::thread_rng())
    }
}

/// Same wait after every failure.
#[derive(Debug, Clone, Copy)]
pub struct ConstantBackoff(pub Duration);

impl Backoff for ConstantBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// How many times to try and how long to wait in between.
#[derive(Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Arc<dyn Backoff>,
}

impl Default for RetryPolicy {
    /// Five attempts, random exponential backoff between 1s and 5s.
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Arc::new(RandomExponentialBackoff::default()),
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Arc<dyn Backoff>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// `max_attempts` tries with no wait in between.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Arc::new(ConstantBackoff(Duration::ZERO)))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. `op` receives the 1-based attempt number.
    ///
    /// Returns the value and the number of attempts used. Exhaustion yields
    /// [`Error::Generation`] built from the last failure. Blocks the calling
    /// thread during backoff.
    pub fn run<T>(&self, mut op: impl FnMut(u32) -> Result<T>) -> Result<(T, u32)> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt: u32 = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok((value, attempt)),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_attempts => return Err(Error::exhausted(e, attempt)),
                Err(e) => {
                    let delay = self.backoff.delay(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, backing off"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
