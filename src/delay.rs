//! Delay functions for [`RetryOptions`](crate::RetryOptions).
//!
//! A delay function receives the 1-based number of the retry about to be
//! scheduled and the failure that triggered it.

use std::sync::Arc;
use std::time::Duration;

use crate::RequestError;

/// Maps `(attempt, failure)` to the wait before the next attempt.
pub type RetryDelay = Arc<dyn Fn(u32, &RequestError) -> Duration + Send + Sync>;

/// Retries immediately. This is the default.
pub fn no_delay() -> RetryDelay {
    Arc::new(|_, _| Duration::ZERO)
}

/// Waits the same `delay` before every retry.
pub fn constant(delay: Duration) -> RetryDelay {
    Arc::new(move |_, _| delay)
}

/// Waits `attempt * step`: `step`, `2 * step`, `3 * step`, ...
pub fn linear(step: Duration) -> RetryDelay {
    Arc::new(move |attempt, _| step.saturating_mul(attempt))
}

/// Waits `base * 2^(attempt - 1)`, never more than `max`.
pub fn exponential(base: Duration, max: Duration) -> RetryDelay {
    Arc::new(move |attempt, _| {
        let exp = attempt.saturating_sub(1).min(16);
        base.saturating_mul(1u32 << exp).min(max)
    })
}
