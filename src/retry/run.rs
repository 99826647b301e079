//! Retry executors.
//!
//! Each attempt calls the factory again, so every retry runs a fresh future
//! instead of polling a finished one.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::outcome::Outcome;
use crate::retry::{RetryExhausted, RetryPolicy};

/// A failed attempt, as seen by the hook of [`retry_with_hooks`].
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt failed, counting from 1.
    pub attempt: u32,
    /// Its error.
    pub error: &'a E,
    /// The pause before the next attempt; `None` when this was the last one.
    pub next_delay: Option<Duration>,
    /// Time since the first attempt started.
    pub elapsed: Duration,
}

/// Attempt count and timing for one executor run.
struct Schedule<'p> {
    policy: &'p RetryPolicy,
    started: Instant,
    attempts: u32,
    last_delay: Option<Duration>,
}

impl<'p> Schedule<'p> {
    fn new(policy: &'p RetryPolicy) -> Self {
        Schedule {
            policy,
            started: Instant::now(),
            attempts: 0,
            last_delay: None,
        }
    }

    /// Count a retryable attempt and return the pause before the next one.
    fn record(&mut self) -> Option<Duration> {
        self.attempts += 1;
        let delay = self.policy.jittered_delay(self.attempts - 1, self.last_delay);
        if delay.is_some() {
            self.last_delay = delay;
        }
        delay
    }

    fn give_up<E>(&self, error: E) -> RetryExhausted<E> {
        RetryExhausted::new(error, self.attempts.max(1), self.started.elapsed())
    }

    async fn wait(&self, delay: Duration) {
        #[cfg(feature = "tracing")]
        tracing::debug!(attempt = self.attempts, ?delay, "retrying after failed attempt");
        tokio::time::sleep(delay).await;
    }
}

/// Run `make` until it settles into something the policy does not retry, or
/// the budget runs out.
///
/// The final `Err` comes back wrapped in [`RetryExhausted`]. A policy that
/// [retries `Nil`](RetryPolicy::retrying_nil) and runs out on `Nil` returns
/// `Nil`.
pub async fn retry<T, E, F, Fut>(make: F, policy: RetryPolicy) -> Outcome<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T, E>>,
{
    retry_with_hooks(make, policy, |_: &RetryEvent<'_, E>| {}).await
}

/// Like [`retry`], but an `Err` is retried only when `should_retry` approves
/// it. The error is returned as is.
pub async fn retry_if<T, E, F, Fut, P>(mut make: F, policy: RetryPolicy, should_retry: P) -> Outcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut schedule = Schedule::new(&policy);

    loop {
        let outcome = make().await;
        let again = match &outcome {
            Outcome::Err(e) => should_retry(e),
            other => policy.should_retry(other),
        };
        if !again {
            return outcome;
        }

        match schedule.record() {
            Some(delay) => schedule.wait(delay).await,
            None => return outcome,
        }
    }
}

/// Like [`retry`], calling `on_retry` after every failed attempt, the last
/// one included.
///
/// # Example
///
/// ```rust
/// use shoal::retry::{retry_with_hooks, RetryEvent, RetryPolicy};
/// use shoal::{fail, Error};
/// use std::sync::Mutex;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let seen = Mutex::new(Vec::new());
/// let policy = RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(2);
///
/// let out = retry_with_hooks(
///     || async { fail::<u8>("down") },
///     policy,
///     |event: &RetryEvent<'_, Error>| seen.lock().unwrap().push((event.attempt, event.next_delay.is_some())),
/// )
/// .await;
///
/// assert!(out.is_err());
/// assert_eq!(*seen.lock().unwrap(), vec![(1, true), (2, true), (3, false)]);
/// # });
/// ```
pub async fn retry_with_hooks<T, E, F, Fut, H>(
    mut make: F,
    policy: RetryPolicy,
    on_retry: H,
) -> Outcome<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T, E>>,
    H: Fn(&RetryEvent<'_, E>),
{
    let mut schedule = Schedule::new(&policy);

    loop {
        let outcome = make().await;
        if !policy.should_retry(&outcome) {
            return outcome.map_err(|e| schedule.give_up(e));
        }

        let delay = schedule.record();
        if let Outcome::Err(error) = &outcome {
            on_retry(&RetryEvent {
                attempt: schedule.attempts,
                error,
                next_delay: delay,
                elapsed: schedule.started.elapsed(),
            });
        }

        match delay {
            Some(delay) => schedule.wait(delay).await,
            None => return outcome.map_err(|e| schedule.give_up(e)),
        }
    }
}
