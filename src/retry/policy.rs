//! When to try again, and how long to wait first.

use std::time::Duration;

use crate::outcome::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backoff {
    Constant,
    Linear,
    Exponential,
    Fibonacci,
}

#[cfg_attr(not(feature = "jitter"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq)]
enum Jitter {
    None,
    /// `delay ± delay * factor`, with `factor` in `0.0..=1.0`.
    Proportional(f64),
    /// Anywhere in `0..=delay`.
    Full,
    /// Between the scheduled delay and three times the previous one.
    Decorrelated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Budget {
    Once,
    Retries(u32),
    Unlimited,
}

/// Which outcomes to try again, and the pause before each new attempt.
///
/// A policy is plain data; [`retry`](crate::retry::retry) and friends run it.
/// `Err` is always retryable, `Nil` only after
/// [`retrying_nil`](RetryPolicy::retrying_nil), and `Ok` never.
///
/// A freshly built policy has no retry budget and makes a single attempt.
/// Give it one with [`with_max_retries`](RetryPolicy::with_max_retries), or
/// opt into [`forever`](RetryPolicy::forever).
///
/// # Example
///
/// ```rust
/// use shoal::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::exponential(Duration::from_millis(100))
///     .with_max_retries(4)
///     .with_max_delay(Duration::from_millis(500));
///
/// let waits: Vec<_> = (0..5).map(|n| policy.delay(n)).collect();
/// assert_eq!(
///     waits,
///     vec![
///         Some(Duration::from_millis(100)),
///         Some(Duration::from_millis(200)),
///         Some(Duration::from_millis(400)),
///         Some(Duration::from_millis(500)),
///         None,
///     ]
/// );
/// assert_eq!(policy.max_attempts(), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    backoff: Backoff,
    base: Duration,
    budget: Budget,
    cap: Option<Duration>,
    jitter: Jitter,
    retry_nil: bool,
}

impl RetryPolicy {
    fn with_backoff(backoff: Backoff, base: Duration) -> Self {
        RetryPolicy {
            backoff,
            base,
            budget: Budget::Once,
            cap: None,
            jitter: Jitter::None,
            retry_nil: false,
        }
    }

    /// The same pause before every retry.
    pub fn constant(delay: Duration) -> Self {
        Self::with_backoff(Backoff::Constant, delay)
    }

    /// `base`, `2 * base`, `3 * base`, ...
    pub fn linear(base: Duration) -> Self {
        Self::with_backoff(Backoff::Linear, base)
    }

    /// `base`, `2 * base`, `4 * base`, ...
    pub fn exponential(base: Duration) -> Self {
        Self::with_backoff(Backoff::Exponential, base)
    }

    /// `base` scaled by the Fibonacci numbers: `1, 1, 2, 3, 5, ...`.
    pub fn fibonacci(base: Duration) -> Self {
        Self::with_backoff(Backoff::Fibonacci, base)
    }

    /// Allow up to `n` retries after the first attempt.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.budget = Budget::Retries(n);
        self
    }

    /// Keep retrying until an attempt settles into something not retryable.
    pub fn forever(mut self) -> Self {
        self.budget = Budget::Unlimited;
        self
    }

    /// Never wait longer than `cap`, jitter included.
    pub fn with_max_delay(mut self, cap: Duration) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Spread each delay by up to `± factor` of itself.
    ///
    /// `factor` is clamped to `0.0..=1.0`; a NaN or infinite factor leaves
    /// the delays unjittered. Without the `jitter` feature, delays are never
    /// randomized.
    pub fn with_jitter(mut self, factor: f64) -> Self {
        self.jitter = if factor.is_finite() {
            Jitter::Proportional(factor.clamp(0.0, 1.0))
        } else {
            Jitter::None
        };
        self
    }

    /// Pick each delay uniformly from zero up to the scheduled delay.
    pub fn with_full_jitter(mut self) -> Self {
        self.jitter = Jitter::Full;
        self
    }

    /// Pick each delay between the scheduled one and three times the last
    /// delay actually waited.
    pub fn with_decorrelated_jitter(mut self) -> Self {
        self.jitter = Jitter::Decorrelated;
        self
    }

    /// Treat `Nil` as retryable too, for polling until a value shows up.
    pub fn retrying_nil(mut self) -> Self {
        self.retry_nil = true;
        self
    }

    /// Total attempts the policy allows, or `None` when unbounded.
    pub fn max_attempts(&self) -> Option<u32> {
        match self.budget {
            Budget::Once => Some(1),
            Budget::Retries(n) => Some(n.saturating_add(1)),
            Budget::Unlimited => None,
        }
    }

    /// Whether this outcome calls for another attempt, budget permitting.
    ///
    /// ```rust
    /// use shoal::retry::RetryPolicy;
    /// use shoal::{fail, nil, ok};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::constant(Duration::from_millis(10));
    /// assert!(policy.should_retry(&fail::<i32>("down")));
    /// assert!(!policy.should_retry(&nil::<i32>()));
    /// assert!(!policy.should_retry(&ok(1)));
    ///
    /// assert!(policy.retrying_nil().should_retry(&nil::<i32>()));
    /// ```
    pub fn should_retry<T, E>(&self, outcome: &Outcome<T, E>) -> bool {
        match outcome {
            Outcome::Ok(_) => false,
            Outcome::Nil => self.retry_nil,
            Outcome::Err(_) => true,
        }
    }

    /// The scheduled pause before retry number `retry` (0-indexed), without
    /// jitter. `None` once the budget is spent.
    pub fn delay(&self, retry: u32) -> Option<Duration> {
        match self.budget {
            Budget::Once => return None,
            Budget::Retries(n) if retry >= n => return None,
            Budget::Retries(_) | Budget::Unlimited => {}
        }

        let factor = match self.backoff {
            Backoff::Constant => 1,
            Backoff::Linear => retry.saturating_add(1),
            Backoff::Exponential => 2u32.saturating_pow(retry),
            Backoff::Fibonacci => fibonacci(retry.saturating_add(1)),
        };
        Some(self.capped(self.base.saturating_mul(factor)))
    }

    /// [`delay`](RetryPolicy::delay) with jitter applied.
    pub(crate) fn jittered_delay(&self, retry: u32, last: Option<Duration>) -> Option<Duration> {
        self.delay(retry).map(|scheduled| self.spread(scheduled, last))
    }

    fn capped(&self, delay: Duration) -> Duration {
        self.cap.map_or(delay, |cap| delay.min(cap))
    }

    #[cfg(feature = "jitter")]
    fn spread(&self, scheduled: Duration, last: Option<Duration>) -> Duration {
        use rand::Rng;

        let millis = as_millis(scheduled);
        let mut rng = rand::rng();
        let picked = match self.jitter {
            Jitter::None => return scheduled,
            Jitter::Proportional(factor) if factor.is_finite() => {
                let span = (millis as f64 * factor) as u64;
                rng.random_range(millis.saturating_sub(span)..=millis.saturating_add(span))
            }
            Jitter::Proportional(_) => return scheduled,
            Jitter::Full => rng.random_range(0..=millis),
            Jitter::Decorrelated => {
                let ceiling = last.map_or(millis, as_millis).saturating_mul(3);
                if ceiling <= millis {
                    return scheduled;
                }
                rng.random_range(millis..=ceiling)
            }
        };
        self.capped(Duration::from_millis(picked))
    }

    #[cfg(not(feature = "jitter"))]
    fn spread(&self, scheduled: Duration, _last: Option<Duration>) -> Duration {
        scheduled
    }
}

#[cfg(feature = "jitter")]
fn as_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// `fib(0) = 0`, `fib(1) = 1`, saturating at `u32::MAX`.
fn fibonacci(n: u32) -> u32 {
    (0..n).fold((0u32, 1u32), |(a, b), _| (b, a.saturating_add(b))).0
}
