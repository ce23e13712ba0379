//! Opt-in retries for failed requests.
//!
//! A [`Client`](crate::Client) makes exactly one attempt per call unless it is
//! built with a [`RetryStrategy`] other than [`RetryStrategy::None`]. The
//! strategy decides how long to wait; a [`RetryPredicate`] decides whether a
//! given failure is worth another attempt at all.

use crate::Error;
use http::StatusCode;
use rand::Rng;
use std::time::Duration;

/// How many times to retry and how long to wait in between.
///
/// # Examples
///
/// ```
/// use one_api::RetryStrategy;
/// use std::time::Duration;
///
/// // 500ms, 1s, 2s, then give up
/// let strategy = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_millis(500),
///     max_delay: Duration::from_secs(5),
///     max_retries: 3,
///     jitter: false,
/// };
/// assert_eq!(strategy.delay_for_attempt(3), Some(Duration::from_secs(2)));
/// assert_eq!(strategy.delay_for_attempt(4), None);
/// ```
#[derive(Debug, Clone, Default)]
pub enum RetryStrategy {
    /// Fail on the first error.
    #[default]
    None,

    /// Wait `initial_delay * 2^(attempt - 1)`, capped at `max_delay`.
    ExponentialBackoff {
        initial_delay: Duration,
        max_delay: Duration,
        max_retries: usize,
        /// Scale each delay by a random factor in `[0.5, 1.0]`.
        jitter: bool,
    },

    /// Wait the same `delay` before every retry.
    Linear { delay: Duration, max_retries: usize },

    /// Ask `delay_fn` for the delay before retry `attempt` (1-indexed);
    /// `None` stops retrying.
    Custom {
        delay_fn: fn(attempt: usize) -> Option<Duration>,
    },
}

impl RetryStrategy {
    /// Returns the delay before retry number `attempt` (1-indexed), or `None`
    /// once retries are exhausted.
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_retries,
                jitter,
            } => {
                if attempt > *max_retries {
                    return None;
                }

                let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                let multiplier = 2u32.checked_pow(exponent).unwrap_or(u32::MAX);
                let delay = initial_delay.saturating_mul(multiplier).min(*max_delay);

                if *jitter {
                    let factor = rand::thread_rng().gen_range(0.5..=1.0);
                    Some(delay.mul_f64(factor))
                } else {
                    Some(delay)
                }
            }
            RetryStrategy::Linear { delay, max_retries } => {
                (attempt <= *max_retries).then_some(*delay)
            }
            RetryStrategy::Custom { delay_fn } => delay_fn(attempt),
        }
    }
}

/// Decides whether a failed attempt should be retried.
///
/// ```
/// use one_api::{Error, RetryPredicate};
///
/// struct OnlyServerErrors;
///
/// impl RetryPredicate for OnlyServerErrors {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         error.status().is_some_and(|s| s.is_server_error())
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// `attempt` is the 1-indexed number of the attempt that just failed.
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retries whatever [`Error::is_retryable`] accepts. The default predicate.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retries only `429 Too Many Requests`.
///
/// The API enforces a per-token request quota; this predicate waits it out
/// without masking real outages.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRateLimit;

impl RetryPredicate for RetryOnRateLimit {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.status() == Some(StatusCode::TOO_MANY_REQUESTS)
    }
}
