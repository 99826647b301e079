//! Step-by-step pipelines that switch between synchronous and asynchronous
//! execution as needed.
//!
//! A [`Flow`] stays synchronous while every step returns an outcome directly.
//! The first asynchronous step turns it pending, and every later step is
//! sequenced after that future settles. Once the flow reaches `Nil` or `Err`
//! no further step runs.
//!
//! # Example
//!
//! ```rust
//! use shoal::flow::{flow, Flow, Step};
//! use shoal::ok;
//!
//! let sync = Flow::<i32>::start(5).map(|x| x * 2).then(|x| Some(x + 1));
//! assert!(!sync.is_pending());
//! assert_eq!(sync.into_ready().ok().and_then(|o| o.into_option()), Some(11));
//!
//! # tokio_test::block_on(async {
//! let total = flow(
//!     ok(10),
//!     vec![
//!         Step::sync(|x: i32| ok(x * 2)),
//!         Step::future(|x: i32| async move { ok(x + 1) }),
//!     ],
//! )
//! .await;
//!
//! assert_eq!(total.into_option(), Some(21));
//! # });
//! ```

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::FutureExt;

use crate::error::{Error, Panic};
use crate::outcome::Outcome;
use crate::task::Pending;
use crate::wrap::IntoOutcome;

enum State<'a, T, E> {
    Ready(Outcome<T, E>),
    Pending(Pending<'a, T, E>),
}

/// A pipeline that is either settled or waiting on a future.
#[must_use = "a flow does nothing with its result unless it is inspected or awaited"]
pub struct Flow<'a, T, E = Error> {
    state: State<'a, T, E>,
}

impl<'a, T, E> Flow<'a, T, E>
where
    T: Send + 'a,
    E: From<Panic> + Send + 'a,
{
    /// Start from a plain value, normalized with [`IntoOutcome`].
    pub fn start<R: IntoOutcome<T, E>>(initial: R) -> Self {
        Flow::from_outcome(initial.into_outcome())
    }

    /// Start from an existing outcome.
    pub fn from_outcome(outcome: Outcome<T, E>) -> Self {
        Flow {
            state: State::Ready(outcome),
        }
    }

    /// Start from a pending outcome.
    pub fn from_pending(pending: Pending<'a, T, E>) -> Self {
        Flow {
            state: State::Pending(pending),
        }
    }

    /// Whether an asynchronous step has been reached.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    /// Transform the payload.
    pub fn map<U, F>(self, f: F) -> Flow<'a, U, E>
    where
        F: FnOnce(T) -> U + Send + 'a,
        U: Send + 'a,
    {
        match self.state {
            State::Ready(outcome) => Flow::from_outcome(outcome.map(f)),
            State::Pending(pending) => Flow::from_pending(pending.map(f)),
        }
    }

    /// Run a synchronous step. Its return value is normalized with
    /// [`IntoOutcome`], so `Option`, `Result` and plain values all work.
    pub fn then<U, R, F>(self, f: F) -> Flow<'a, U, E>
    where
        F: FnOnce(T) -> R + Send + 'a,
        R: IntoOutcome<U, E>,
        U: Send + 'a,
    {
        let step = move |value: T| f(value).into_outcome();
        match self.state {
            State::Ready(outcome) => Flow::from_outcome(outcome.chain(step)),
            State::Pending(pending) => Flow::from_pending(pending.chain(step)),
        }
    }

    /// Run an asynchronous step. The flow is pending afterwards unless it had
    /// already reached `Nil` or `Err`.
    ///
    /// Whatever the future resolves to is normalized with [`IntoOutcome`],
    /// the same way [`then`](Flow::then) treats a synchronous step.
    pub fn then_async<U, R, F, Fut>(self, f: F) -> Flow<'a, U, E>
    where
        F: FnOnce(T) -> Fut + Send + 'a,
        Fut: Future<Output = R> + Send + 'a,
        R: IntoOutcome<U, E>,
        U: Send + 'a,
    {
        let f = move |value: T| f(value).map(|settled| settled.into_outcome());
        match self.state {
            State::Ready(Outcome::Ok(held)) => {
                Flow::from_pending(Outcome::Ok(held).chain_async(f))
            }
            State::Ready(Outcome::Nil) => Flow::from_outcome(Outcome::Nil),
            State::Ready(Outcome::Err(e)) => Flow::from_outcome(Outcome::Err(e)),
            State::Pending(pending) => Flow::from_pending(pending.chain_async(f)),
        }
    }

    /// Run a boxed [`Step`].
    pub fn step(self, step: Step<'a, T, T, E>) -> Self {
        match step {
            Step::Sync(f) => self.then(f),
            Step::Async(f) => self.then_async(f),
        }
    }

    /// The settled outcome, or the flow itself while still pending.
    pub fn into_ready(self) -> Result<Outcome<T, E>, Self> {
        match self.state {
            State::Ready(outcome) => Ok(outcome),
            State::Pending(pending) => Err(Flow::from_pending(pending)),
        }
    }

    /// A future for the final outcome, whether or not it is already settled.
    pub fn into_pending(self) -> Pending<'a, T, E> {
        match self.state {
            State::Ready(outcome) => Pending::ready(outcome),
            State::Pending(pending) => pending,
        }
    }
}

impl<'a, T, E> IntoFuture for Flow<'a, T, E>
where
    T: Send + 'a,
    E: From<Panic> + Send + 'a,
{
    type Output = Outcome<T, E>;
    type IntoFuture = Pending<'a, T, E>;

    fn into_future(self) -> Self::IntoFuture {
        self.into_pending()
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Flow<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Ready(outcome) => f.debug_tuple("Flow::Ready").field(outcome).finish(),
            State::Pending(_) => f.write_str("Flow::Pending"),
        }
    }
}

/// One stage of a [`flow`], synchronous or asynchronous.
pub enum Step<'a, T, U = T, E = Error> {
    /// Returns its outcome directly.
    Sync(Box<dyn FnOnce(T) -> Outcome<U, E> + Send + 'a>),
    /// Returns a future of its outcome.
    Async(Box<dyn FnOnce(T) -> Pending<'a, U, E> + Send + 'a>),
}

impl<'a, T, U, E> Step<'a, T, U, E>
where
    U: Send + 'a,
    E: Send + 'a,
{
    /// A synchronous step. The return value is normalized with
    /// [`IntoOutcome`].
    pub fn sync<F, R>(f: F) -> Self
    where
        F: FnOnce(T) -> R + Send + 'a,
        R: IntoOutcome<U, E>,
    {
        Step::Sync(Box::new(move |value: T| f(value).into_outcome()))
    }

    /// An asynchronous step. A future resolving to `Result::Err` settles
    /// the step into `Err`, just as a synchronous step returning one would.
    pub fn future<F, Fut, R>(f: F) -> Self
    where
        F: FnOnce(T) -> Fut + Send + 'a,
        Fut: Future<Output = R> + Send + 'a,
        R: IntoOutcome<U, E>,
    {
        Step::Async(Box::new(move |value: T| {
            Pending::new(f(value).map(|settled| settled.into_outcome()))
        }))
    }

    /// Returns `true` for a synchronous step.
    pub fn is_sync(&self) -> bool {
        matches!(self, Step::Sync(_))
    }

    /// Returns `true` for an asynchronous step.
    pub fn is_async(&self) -> bool {
        matches!(self, Step::Async(_))
    }
}

impl<T, U, E> fmt::Debug for Step<'_, T, U, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Sync(_) => f.write_str("Step::Sync"),
            Step::Async(_) => f.write_str("Step::Async"),
        }
    }
}

/// Thread `initial` through `steps` in order.
///
/// The result stays synchronous until the first asynchronous step. Steps
/// after a `Nil` or `Err` are never called, and a panicking step yields
/// `Err`.
pub fn flow<'a, T, R, I>(initial: R, steps: I) -> Flow<'a, T>
where
    T: Send + 'a,
    R: IntoOutcome<T, Error>,
    I: IntoIterator<Item = Step<'a, T, T, Error>>,
{
    steps
        .into_iter()
        .fold(Flow::start(initial), |acc, step| acc.step(step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fail, nil, ok};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_sync_flow_stays_ready() {
        let settled = flow(2, vec![Step::sync(|x: i32| ok(x + 1)), Step::sync(|x: i32| ok(x * 10))]);
        assert!(!settled.is_pending());
        assert_eq!(settled.into_ready().ok().and_then(Outcome::into_option), Some(30));
    }

    #[tokio::test]
    async fn test_async_step_turns_flow_pending() {
        let running = Flow::start(1)
            .then_async(|x: i32| async move { ok(x + 1) })
            .then(|x| x * 3);

        assert!(running.is_pending());
        assert_eq!(running.await.into_option(), Some(6));
    }

    #[tokio::test]
    async fn test_steps_after_err_are_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let out = flow(
            1,
            vec![
                Step::sync(|_: i32| fail::<i32>("stop here")),
                Step::future(move |x: i32| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async move { ok(x) }
                }),
            ],
        )
        .await;

        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_async_step_on_nil_stays_ready() {
        let stopped = Flow::from_outcome(nil::<i32>()).then_async(|x| async move { ok(x) });
        assert!(!stopped.is_pending());
        assert!(stopped.into_ready().is_ok_and(|o| o.is_nil()));
    }

    #[test]
    fn test_panicking_step_becomes_err() {
        let out = Flow::<i32>::start(1)
            .then(|_: i32| -> Option<i32> { panic!("step blew up") })
            .into_ready();
        assert!(out.is_ok_and(|o| o.is_err()));
    }

    #[tokio::test]
    async fn test_async_steps_normalize_like_sync_ones() {
        let rejected = Flow::<i32>::start(1)
            .then_async(|_| async { Err::<i32, _>(std::io::Error::other("refused")) })
            .await;
        assert!(rejected.error().is_some_and(|e| e.is::<std::io::Error>()));

        let out = flow(
            2,
            vec![
                Step::future(|x: i32| async move { Some(x + 1) }),
                Step::sync(|x: i32| Ok::<_, std::num::ParseIntError>(x * 2)),
                Step::future(|x: i32| async move { "12".parse::<i32>().map(|y| x + y) }),
            ],
        )
        .await;
        assert_eq!(out.into_option(), Some(18));

        let dropped = flow(2, vec![Step::future(|_: i32| async { None::<i32> })]).await;
        assert!(dropped.is_nil());
    }

    #[test]
    fn test_step_kind() {
        let s: Step<'_, i32> = Step::sync(|x| ok(x));
        assert!(s.is_sync());
        let a: Step<'_, i32> = Step::future(|x| async move { ok(x) });
        assert!(a.is_async());
    }
}
