// Retry logic for transactional writes (exponential backoff)
use crate::error::AppError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(3);
pub const DEFAULT_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// ±10% spread applied to each delay
const JITTER_RATIO: f64 = 0.1;

/// Classification of a failed attempt
#[derive(Debug)]
pub enum RetryError {
    /// Replay the attempt after backoff
    Transient(AppError),
    /// Stop and surface the error as-is
    Permanent(AppError),
}

impl RetryError {
    pub fn into_inner(self) -> AppError {
        match self {
            RetryError::Transient(e) | RetryError::Permanent(e) => e,
        }
    }
}

/// Immutable retry policy for transactional operations
///
/// Delays follow:
/// delay(n) = min(initial * multiplier ^ n, max_interval) * (1.0 ± 0.1)
///
/// `max_retries` counts replays, so an operation runs at most
/// `max_retries + 1` times.
#[derive(Debug, Clone, PartialEq)]
pub struct TxRetryPolicy {
    initial_interval: Duration,
    multiplier: f64,
    max_interval: Duration,
    max_retries: u32,
    jitter: bool,
}

impl Default for TxRetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            multiplier: DEFAULT_MULTIPLIER,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            jitter: true,
        }
    }
}

impl TxRetryPolicy {
    /// Create a policy with the default multiplier and cap
    ///
    /// # Example
    /// ```text
    /// let policy = TxRetryPolicy::new(Duration::from_millis(3), 3);
    /// ```
    pub fn new(initial_interval: Duration, max_retries: u32) -> Self {
        Self {
            initial_interval,
            max_retries,
            ..Self::default()
        }
    }

    /// Growth factor between consecutive delays (clamped to >= 1.0)
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = if multiplier.is_finite() {
            multiplier.max(1.0)
        } else {
            DEFAULT_MULTIPLIER
        };
        self
    }

    pub fn with_max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Upper bound on how many times an operation runs
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before replay number `retry` (0-based), without jitter
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let scaled = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max_interval.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Delay before replay number `retry` (0-based), jitter applied
    pub fn delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if !self.jitter || base.is_zero() {
            return base;
        }
        let factor = rand::thread_rng().gen_range((1.0 - JITTER_RATIO)..=(1.0 + JITTER_RATIO));
        base.mul_f64(factor)
    }

    /// Drive `attempt` until it succeeds, fails permanently, or retries run out.
    ///
    /// `attempt` receives the 1-based attempt number. When retries run out the
    /// last transient error is returned.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut attempt: F) -> Result<T, AppError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, RetryError>>,
    {
        let mut retry: u32 = 0;

        loop {
            match attempt(retry + 1).await {
                Ok(value) => return Ok(value),
                Err(RetryError::Permanent(err)) => return Err(err),
                Err(RetryError::Transient(err)) => {
                    if retry >= self.max_retries {
                        error!(
                            operation,
                            attempts = retry + 1,
                            error = %err,
                            "Retry attempts exhausted"
                        );
                        return Err(err);
                    }

                    let delay = self.delay(retry);
                    warn!(
                        operation,
                        attempt = retry + 1,
                        delay_ms = %delay.as_millis(),
                        error = %err,
                        "Transient failure, retrying"
                    );

                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
            }
        }
    }
}
