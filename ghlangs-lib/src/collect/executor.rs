use super::client::{ApiResult, Client};
use super::model::Response;
use super::retry::{Decision, Failure, RetryPolicy};
use super::sleeper::{Sleeper, TokioSleeper};
use super::throttler::Throttler;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

const LOG_TARGET: &str = "  executor";

/// Issues GraphQL queries under a concurrency cap with retry and backoff.
///
/// The executor never fails. When every attempt allowed by the [`RetryPolicy`] has
/// failed, [`Executor::execute`] returns an empty [`Response`] and callers treat that
/// as "no data this round".
#[derive(Debug)]
pub struct Executor<S = TokioSleeper> {
    client: Client,
    throttler: Arc<Throttler>,
    policy: RetryPolicy,
    sleeper: S,
}

impl Executor {
    /// Create an executor that sleeps on the tokio timer.
    #[must_use]
    pub fn new(client: Client, policy: RetryPolicy, max_concurrent: usize) -> Self {
        Self::with_sleeper(client, policy, max_concurrent, TokioSleeper)
    }
}

impl<S: Sleeper> Executor<S> {
    /// Create an executor that waits through `sleeper`.
    #[must_use]
    pub fn with_sleeper(client: Client, policy: RetryPolicy, max_concurrent: usize, sleeper: S) -> Self {
        Self {
            client,
            throttler: Throttler::new(max_concurrent, policy.request_delay),
            policy,
            sleeper,
        }
    }

    /// Run one logical query, retrying per the policy.
    ///
    /// Each attempt first takes a throttler slot (and its smoothing delay). A rate-limit
    /// cooldown is served while still holding the slot, so the executor stops dispatching
    /// other queries until it ends. Other waits release the slot first.
    pub async fn execute<B, T>(&self, body: &B) -> Response<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let mut attempt = 0u32;

        loop {
            let permit = self.throttler.acquire(&self.sleeper).await;

            let (failure, detail) = match self.client.post(body).await {
                ApiResult::Success(response) => {
                    if attempt > 0 {
                        log::debug!(target: LOG_TARGET, "Query succeeded on attempt {}", attempt + 1);
                    }
                    return response;
                }
                ApiResult::Failed(failure, detail) => (failure, detail),
            };

            match failure {
                Failure::PayloadErrors => log::warn!(target: LOG_TARGET, "GraphQL errors: {detail}"),
                Failure::RateLimited => log::warn!(
                    target: LOG_TARGET,
                    "Rate limited (attempt {}), cooling down for {}s",
                    attempt + 1,
                    self.policy.rate_limit_cooldown.as_secs()
                ),
                Failure::BadStatus(_) => log::warn!(target: LOG_TARGET, "GraphQL request failed with {detail}"),
                Failure::Transport => log::warn!(target: LOG_TARGET, "GraphQL query failed (attempt {}): {detail}", attempt + 1),
            }

            match self.policy.decide(attempt, &failure) {
                Decision::GiveUp => {
                    log::warn!(
                        target: LOG_TARGET,
                        "Giving up on query after {} attempt(s), last failure: {failure}",
                        attempt + 1
                    );
                    return Response::default();
                }
                Decision::Retry { delay } => {
                    if failure != Failure::RateLimited {
                        drop(permit);
                    }

                    if !delay.is_zero() {
                        log::debug!(target: LOG_TARGET, "Retrying in {}ms", delay.as_millis());
                        self.sleeper.sleep(delay).await;
                    }
                }
            }

            attempt += 1;
        }
    }
}
