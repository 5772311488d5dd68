//! Rate-limit retry policy for remote feed requests.
//!
//! Only [`ScraperError::RateLimited`] is retried. Everything else (transport
//! failures, malformed bodies, blocked profiles) is returned on the first
//! occurrence so structural failures never hide behind repeated backoff.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Retry budget for one remote call.
///
/// # Backoff schedule (defaults)
///
/// | Attempt | Sleep before next attempt |
/// |---------|---------------------------|
/// | 1 | 1 s |
/// | 2 | 2 s |
/// | 3 | 4 s |
/// | 4 | 8 s |
/// | 5 | none, budget exhausted |
///
/// The delay doubles per attempt and is capped at `max_backoff`.
/// `operation_timeout` bounds the whole fetch regardless of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub operation_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            operation_timeout: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the `attempt`-th failed attempt (1-based).
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(31);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::RateLimited { .. })
}

/// Executes `operation` until it succeeds, fails with a non-retriable error,
/// or `policy.max_attempts` rate-limited attempts have been made.
///
/// On exhaustion the returned [`ScraperError::RateLimited`] carries the number
/// of attempts made.
pub(crate) async fn retry_rate_limited<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) {
            return Err(err);
        }

        if attempt >= max_attempts {
            let endpoint = match err {
                ScraperError::RateLimited { endpoint, .. } => endpoint,
                _ => String::new(),
            };
            tracing::warn!(
                endpoint = %endpoint,
                attempts = attempt,
                "rate limit retry budget exhausted"
            );
            return Err(ScraperError::RateLimited {
                endpoint,
                attempts: attempt,
            });
        }

        let delay = policy.backoff_after(attempt);
        tracing::warn!(
            attempt,
            max_attempts,
            delay_secs = delay.as_secs_f64(),
            error = %err,
            "rate limited; retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
