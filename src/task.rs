//! Deferred outcomes.
//!
//! A [`Pending`] is a boxed future that settles into an [`Outcome`]. It offers
//! the same combinators as `Outcome`, each applied once the future resolves,
//! so asynchronous pipelines read like synchronous ones:
//!
//! ```rust
//! use shoal::{task, Outcome};
//!
//! # tokio_test::block_on(async {
//! let greeting = task(|| async { Ok::<_, std::io::Error>("world") })
//!     .map(|name| format!("hello {}", name))
//!     .filter(|s| s.len() > 5)
//!     .await;
//!
//! assert_eq!(greeting.into_option(), Some("hello world".to_string()));
//! # });
//! ```
//!
//! A future that panics while being polled settles into `Err` when it was
//! produced by [`task`] or [`Outcome::chain_async`].

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use crate::error::{Error, Panic};
use crate::outcome::{guarded, Outcome};
use crate::predicate::Predicate;
use crate::wrap::IntoOutcome;

/// A future settling into an [`Outcome`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Pending<'a, T, E = Error> {
    inner: BoxFuture<'a, Outcome<T, E>>,
}

impl<'a, T, E> Pending<'a, T, E>
where
    T: Send + 'a,
    E: Send + 'a,
{
    /// Wrap a future that already produces an outcome.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Outcome<T, E>> + Send + 'a,
    {
        Pending {
            inner: future.boxed(),
        }
    }

    /// A pending outcome that is already settled.
    pub fn ready(outcome: Outcome<T, E>) -> Self {
        Pending {
            inner: future::ready(outcome).boxed(),
        }
    }

    /// Normalize whatever the future resolves to.
    ///
    /// `Result` becomes `Ok`/`Err`, `Option` becomes `Ok`/`Nil`, and so on;
    /// see [`IntoOutcome`].
    pub fn settle<F, R>(future: F) -> Self
    where
        F: Future<Output = R> + Send + 'a,
        R: IntoOutcome<T, E> + 'a,
    {
        Pending::new(future.map(IntoOutcome::into_outcome))
    }

    pub(crate) fn caught<F, R>(future: F) -> Self
    where
        F: Future<Output = R> + Send + 'a,
        R: IntoOutcome<T, E>,
        E: From<Panic>,
    {
        Pending::new(AssertUnwindSafe(future).catch_unwind().map(|settled| match settled {
            Ok(value) => value.into_outcome(),
            Err(payload) => Outcome::Err(E::from(Panic::from_payload(payload))),
        }))
    }

    // ========== Combinators ==========

    /// Transform the payload once settled.
    pub fn map<U, F>(self, f: F) -> Pending<'a, U, E>
    where
        F: FnOnce(T) -> U + Send + 'a,
        U: Send + 'a,
        E: From<Panic>,
    {
        Pending::new(async move { self.await.map(f) })
    }

    /// Transform the payload with a fallible function once settled.
    pub fn try_map<U, X, F>(self, f: F) -> Pending<'a, U, E>
    where
        F: FnOnce(T) -> Result<U, X> + Send + 'a,
        X: Into<E>,
        U: Send + 'a,
        E: From<Panic>,
    {
        Pending::new(async move { self.await.try_map(f) })
    }

    /// Continue with a synchronous step once settled.
    pub fn chain<U, F>(self, f: F) -> Pending<'a, U, E>
    where
        F: FnOnce(T) -> Outcome<U, E> + Send + 'a,
        U: Send + 'a,
        E: From<Panic>,
    {
        Pending::new(async move { self.await.chain(f) })
    }

    /// Continue with an asynchronous step once settled.
    pub fn chain_async<U, F, Fut>(self, f: F) -> Pending<'a, U, E>
    where
        F: FnOnce(T) -> Fut + Send + 'a,
        Fut: Future<Output = Outcome<U, E>> + Send + 'a,
        U: Send + 'a,
        E: From<Panic>,
    {
        Pending::new(async move { self.await.chain_async(f).await })
    }

    /// Keep the payload only if it satisfies `predicate`.
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: FnOnce(&T) -> bool + Send + 'a,
        E: From<Panic>,
    {
        Pending::new(async move { self.await.filter(predicate) })
    }

    /// [`filter`](Pending::filter) with a composable [`Predicate`].
    pub fn filter_by<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + 'a,
        E: From<Panic>,
    {
        Pending::new(async move { self.await.filter_by(predicate) })
    }

    /// Filter and narrow the payload once settled.
    pub fn guard<U, F>(self, f: F) -> Pending<'a, U, E>
    where
        F: FnOnce(T) -> Option<U> + Send + 'a,
        U: Send + 'a,
        E: From<Panic>,
    {
        Pending::new(async move { self.await.guard(f) })
    }

    /// Supply a fallback for `Nil` and `Err`.
    pub fn or<R, F>(self, f: F) -> Self
    where
        F: FnOnce() -> R + Send + 'a,
        R: Into<Option<T>>,
    {
        Pending::new(async move { self.await.or(f) })
    }

    /// Recover from `Err` once settled.
    pub fn catch<E2, F>(self, f: F) -> Pending<'a, T, E2>
    where
        F: FnOnce(E) -> Outcome<T, E2> + Send + 'a,
        E2: Send + 'a,
    {
        Pending::new(async move { self.await.catch(f) })
    }

    /// Recover from `Err` with an asynchronous step.
    pub fn catch_async<E2, F, Fut>(self, f: F) -> Pending<'a, T, E2>
    where
        F: FnOnce(E) -> Fut + Send + 'a,
        Fut: Future<Output = Outcome<T, E2>> + Send + 'a,
        E2: Send + 'a,
    {
        Pending::new(async move { self.await.catch_async(f).await })
    }

    /// Transform the error once settled.
    pub fn map_err<E2, F>(self, f: F) -> Pending<'a, T, E2>
    where
        F: FnOnce(E) -> E2 + Send + 'a,
        E2: Send + 'a,
    {
        Pending::new(async move { self.await.map_err(f) })
    }

    /// Look at the payload once settled.
    pub fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&T) + Send + 'a,
    {
        Pending::new(async move { self.await.tap(f) })
    }
}

impl<'a, T: Send + 'a> Pending<'a, T, Error> {
    /// Add a context layer to an `Err` once settled.
    pub fn context(self, msg: impl Into<String> + Send + 'a) -> Self {
        Pending::new(async move { self.await.context(msg) })
    }
}

impl<T, E> Future for Pending<'_, T, E> {
    type Output = Outcome<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T, E> fmt::Debug for Pending<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("inner", &"<future>").finish()
    }
}

/// Run `f` and normalize what it returns.
///
/// A panic inside `f` becomes `Err`. Use [`task`] when `f` returns a future.
///
/// # Example
///
/// ```rust
/// use shoal::result;
///
/// let parsed = result(|| "17".parse::<u8>());
/// assert_eq!(parsed.into_option(), Some(17));
///
/// let missing = result(|| None::<u8>);
/// assert!(missing.is_nil());
///
/// let exploded = result(|| -> u8 { panic!("boom") });
/// assert!(exploded.is_err());
/// ```
pub fn result<T, R, F>(f: F) -> Outcome<T>
where
    F: FnOnce() -> R,
    R: IntoOutcome<T, Error>,
{
    Outcome::capture(f)
}

/// Run an asynchronous computation and normalize what it resolves to.
///
/// A panic while creating or polling the future settles into `Err`.
///
/// # Example
///
/// ```rust
/// use shoal::task;
///
/// # tokio_test::block_on(async {
/// let fetched = task(|| async { Some(3) }).await;
/// assert_eq!(fetched.into_option(), Some(3));
///
/// let failed = task(|| async { Err::<u8, _>(std::fmt::Error) }).await;
/// assert!(failed.is_err());
/// # });
/// ```
pub fn task<'a, T, R, F, Fut>(f: F) -> Pending<'a, T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = R> + Send + 'a,
    R: IntoOutcome<T, Error>,
    T: Send + 'a,
{
    match guarded::<_, Error>(f) {
        Ok(future) => Pending::caught(future),
        Err(e) => Pending::ready(Outcome::Err(e)),
    }
}
