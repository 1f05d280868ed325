//! Retry policy for GraphQL queries.
//!
//! The policy is a plain value: given the zero-based attempt index and the way that
//! attempt failed, [`RetryPolicy::decide`] says whether to try again and how long to
//! wait first. The executor owns the actual loop and the sleeping.

use core::fmt::{Display, Formatter};
use core::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);
const DEFAULT_RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Largest exponent applied to the backoff base.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Why a single attempt did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// HTTP 200, but the payload carried an `errors` list.
    PayloadErrors,

    /// HTTP 403, the API is rate limiting us.
    RateLimited,

    /// Any other non-success status code.
    BadStatus(u16),

    /// The request never produced a decodable response (connect error, timeout, bad JSON).
    Transport,
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PayloadErrors => write!(f, "GraphQL errors in response"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::BadStatus(status) => write!(f, "HTTP status {status}"),
            Self::Transport => write!(f, "transport failure"),
        }
    }
}

/// What the executor should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Wait for `delay`, then make another attempt.
    Retry { delay: Duration },

    /// Stop and hand back an empty result.
    GiveUp,
}

/// Attempt budget, smoothing delay, and wait schedule for one logical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per logical query, including the first.
    pub max_attempts: u32,

    /// Pause taken after admission and before every attempt.
    pub request_delay: Duration,

    /// Fixed wait after a rate-limited response.
    pub rate_limit_cooldown: Duration,

    /// Base of the exponential backoff applied after transport failures.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            request_delay: DEFAULT_REQUEST_DELAY,
            rate_limit_cooldown: DEFAULT_RATE_LIMIT_COOLDOWN,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    /// Decide what follows the failure of attempt number `attempt` (zero-based).
    ///
    /// The last attempt always gives up, without waiting, whatever the failure was.
    #[must_use]
    pub fn decide(&self, attempt: u32, failure: &Failure) -> Decision {
        if attempt.saturating_add(1) >= self.max_attempts {
            return Decision::GiveUp;
        }

        let delay = match failure {
            Failure::RateLimited => self.rate_limit_cooldown,
            Failure::Transport => self.backoff(attempt),
            Failure::PayloadErrors | Failure::BadStatus(_) => Duration::ZERO,
        };

        Decision::Retry { delay }
    }

    /// Exponential backoff for the given zero-based attempt: `base * 2^attempt`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(MAX_BACKOFF_EXPONENT);
        self.backoff_base.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.request_delay, Duration::from_millis(100));
        assert_eq!(policy.rate_limit_cooldown, Duration::from_secs(60));
        assert_eq!(policy.backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn test_transport_failure_backs_off_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.decide(0, &Failure::Transport), Decision::Retry { delay: Duration::from_secs(1) });
        assert_eq!(policy.decide(1, &Failure::Transport), Decision::Retry { delay: Duration::from_secs(2) });
        assert_eq!(policy.decide(2, &Failure::Transport), Decision::GiveUp);
    }

    #[test]
    fn test_rate_limit_uses_fixed_cooldown() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.decide(0, &Failure::RateLimited), Decision::Retry { delay: Duration::from_secs(60) });
        assert_eq!(policy.decide(1, &Failure::RateLimited), Decision::Retry { delay: Duration::from_secs(60) });
    }

    #[test]
    fn test_rate_limit_on_last_attempt_gives_up() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.decide(2, &Failure::RateLimited), Decision::GiveUp);
    }

    #[test]
    fn test_payload_errors_and_bad_status_retry_immediately() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.decide(0, &Failure::PayloadErrors), Decision::Retry { delay: Duration::ZERO });
        assert_eq!(policy.decide(1, &Failure::BadStatus(502)), Decision::Retry { delay: Duration::ZERO });
        assert_eq!(policy.decide(2, &Failure::BadStatus(502)), Decision::GiveUp);
    }

    #[test]
    fn test_single_attempt_never_retries() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.decide(0, &Failure::Transport), Decision::GiveUp);
    }

    #[test]
    fn test_attempts_always_terminate() {
        let policy = RetryPolicy {
            max_attempts: 5,
            ..RetryPolicy::default()
        };

        let mut attempts = 0;
        while let Decision::Retry { .. } = policy.decide(attempts, &Failure::BadStatus(500)) {
            attempts += 1;
        }
        assert_eq!(attempts + 1, 5);
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(40), policy.backoff(MAX_BACKOFF_EXPONENT));
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(Failure::BadStatus(500).to_string(), "HTTP status 500");
        assert_eq!(Failure::RateLimited.to_string(), "rate limited");
    }
}
