//! The three-way result algebra.
//!
//! An [`Outcome`] is exactly one of:
//!
//! - `Ok` - a value is present
//! - `Nil` - no value, and nothing went wrong
//! - `Err` - the computation failed
//!
//! Failure and absence propagate untouched through every combinator that does
//! not exist specifically to interact with them:
//!
//! | Combinator | `Ok(v)` | `Nil` | `Err(e)` |
//! |---|---|---|---|
//! | `map(f)` | `Ok(f(v))`, or `Err` if `f` panics | `Nil` | `Err(e)` |
//! | `chain(f)` | `f(v)` | `Nil` | `Err(e)` |
//! | `chain_async(f)` | pending `f(v)` | ready `Nil` | ready `Err(e)` |
//! | `filter(p)` | `Ok(v)` if `p(v)`, else `Nil` | `Nil` | `Nil` |
//! | `guard(f)` | `Ok(u)` if `f(v) = Some(u)`, else `Nil` | `Nil` | `Nil` |
//! | `or(f)` | `Ok(v)` | `f()` if present, else `Nil` | `f()` if present, else `Nil` |
//! | `catch(f)` | `Ok(v)` | `Nil` | `f(e)` |
//!
//! `filter` and `guard` turn `Err` into `Nil` without evaluating the
//! predicate, discarding the error. Use [`Outcome::is_err`] or `catch` first
//! when the error matters.
//!
//! # Example
//!
//! ```rust
//! use shoal::ok;
//!
//! let doubled = ok(5)
//!     .map(|x| x * 2)
//!     .filter(|x| *x > 5)
//!     .match_with(|h| h.ok(|v| v.to_string()).nil(|| "none".to_string()));
//!
//! assert_eq!(doubled, Some("10".to_string()));
//! ```
//!
//! # Retrieval
//!
//! [`Outcome::get`] hands an `Ok` payload out exactly once. A second call
//! fails with [`GetError::Consumed`]; [`Outcome::is_gone`] reports whether
//! that has happened.
//!
//! ```rust
//! use shoal::{ok, GetError};
//!
//! let value = ok(String::from("once"));
//! assert!(!value.is_gone());
//! assert_eq!(value.get(), Ok(Some(String::from("once"))));
//! assert!(value.is_gone());
//! assert_eq!(value.get(), Err(GetError::Consumed));
//! ```

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use crate::detach::{try_clone, Detach};
use crate::error::{Error, GetError, Panic};
use crate::predicate::Predicate;
use crate::task::Pending;
use crate::wrap::IntoOutcome;

mod handlers;
mod held;

pub use handlers::Handlers;
pub use held::Held;


/// A value that is present, absent, or failed.
///
/// `E` defaults to the crate's [`Error`]. Combinators that run caller code on
/// the `Ok` branch catch panics and turn them into `Err`, which requires
/// `E: From<Panic>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T, E = Error> {
    /// A value is present.
    Ok(Held<T>),
    /// The computation failed.
    Err(E),
    /// No value.
    Nil,
}

/// Run `f`, converting a panic into `E`.
pub(crate) fn guarded<R, E: From<Panic>>(f: impl FnOnce() -> R) -> Result<R, E> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| E::from(Panic::from_payload(payload)))
}

impl<T, E> Outcome<T, E> {
    // ========== Constructors ==========

    /// Guarded `Ok` construction.
    ///
    /// A payload that is shared mutable state (see [`Detach`]) is replaced by
    /// a detached copy; when no copy can be made the original handle is kept,
    /// a warning is logged, and the payload stays aliased with the caller.
    pub fn ok(value: T) -> Self
    where
        T: Detach,
    {
        Outcome::Ok(Held::new(try_clone(value, true)))
    }

    /// Guarded `Ok` construction for a value that may be absent.
    ///
    /// `None` routes to `Nil`; `Some` goes through [`Outcome::ok`].
    pub fn ok_opt(value: Option<T>) -> Self
    where
        T: Detach,
    {
        value.map_or(Outcome::Nil, Self::ok)
    }

    /// `Ok` when the value is present, `Nil` otherwise. No copy is made.
    pub fn maybe(value: Option<T>) -> Self {
        value.map_or(Outcome::Nil, Self::present)
    }

    /// `Ok(value)` stored as-is.
    #[inline]
    pub fn present(value: T) -> Self {
        Outcome::Ok(Held::new(value))
    }

    /// An `Err` outcome.
    #[inline]
    pub fn err(error: impl Into<E>) -> Self {
        Outcome::Err(error.into())
    }

    /// The `Nil` outcome.
    #[inline]
    pub fn nil() -> Self {
        Outcome::Nil
    }

    /// Run `f` and normalize what it returns; a panic becomes `Err`.
    pub fn capture<R, F>(f: F) -> Self
    where
        F: FnOnce() -> R,
        R: IntoOutcome<T, E>,
        E: From<Panic>,
    {
        guarded(f).map_or_else(Outcome::Err, IntoOutcome::into_outcome)
    }

    // ========== Predicates ==========

    /// Returns `true` if this is `Ok`.
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns `true` if this is `Err`.
    #[inline]
    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    /// Returns `true` if this is `Nil`.
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Outcome::Nil)
    }

    /// Returns `true` once an `Ok` payload has been retrieved with
    /// [`get`](Outcome::get). Always `false` for `Nil` and `Err`.
    #[inline]
    pub fn is_gone(&self) -> bool {
        matches!(self, Outcome::Ok(held) if held.is_consumed())
    }

    // ========== Combinators ==========

    /// Transform the `Ok` payload. A panic in `f` yields `Err`.
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
        E: From<Panic>,
    {
        match self {
            Outcome::Ok(held) => {
                guarded(|| f(held.into_inner())).map_or_else(Outcome::Err, Outcome::present)
            }
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Nil => Outcome::Nil,
        }
    }

    /// Transform the `Ok` payload with a fallible function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shoal::ok;
    ///
    /// let parsed = ok("42").try_map(|s| s.parse::<i32>());
    /// assert_eq!(parsed.into_option(), Some(42));
    ///
    /// let failed = ok("forty-two").try_map(|s| s.parse::<i32>());
    /// assert!(failed.is_err());
    /// ```
    pub fn try_map<U, X, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Result<U, X>,
        X: Into<E>,
        E: From<Panic>,
    {
        self.chain(|value| match f(value) {
            Ok(value) => Outcome::present(value),
            Err(e) => Outcome::Err(e.into()),
        })
    }

    /// Continue with another outcome-producing step.
    pub fn chain<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
        E: From<Panic>,
    {
        match self {
            Outcome::Ok(held) => guarded(|| f(held.into_inner())).unwrap_or_else(Outcome::Err),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Nil => Outcome::Nil,
        }
    }

    /// Continue with an asynchronous step.
    ///
    /// `Nil` and `Err` resolve immediately without calling `f`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shoal::{ok, Outcome};
    ///
    /// # tokio_test::block_on(async {
    /// let fetched = ok(7)
    ///     .chain_async(|id| async move { Outcome::present(format!("user-{}", id)) })
    ///     .await;
    ///
    /// assert_eq!(fetched.into_option(), Some("user-7".to_string()));
    /// # });
    /// ```
    pub fn chain_async<'a, U, F, Fut>(self, f: F) -> Pending<'a, U, E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U, E>> + Send + 'a,
        U: Send + 'a,
        E: From<Panic> + Send + 'a,
    {
        match self {
            Outcome::Ok(held) => match guarded(|| f(held.into_inner())) {
                Ok(future) => Pending::caught(future),
                Err(e) => Pending::ready(Outcome::Err(e)),
            },
            Outcome::Err(e) => Pending::ready(Outcome::Err(e)),
            Outcome::Nil => Pending::ready(Outcome::Nil),
        }
    }

    /// Keep the `Ok` payload only if it satisfies `predicate`.
    ///
    /// `Err` becomes `Nil` without evaluating the predicate.
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: FnOnce(&T) -> bool,
        E: From<Panic>,
    {
        match self {
            Outcome::Ok(held) => match guarded(|| predicate(&held)) {
                Ok(true) => Outcome::Ok(held),
                Ok(false) => Outcome::Nil,
                Err(e) => Outcome::Err(e),
            },
            Outcome::Err(_) | Outcome::Nil => Outcome::Nil,
        }
    }

    /// [`filter`](Outcome::filter) with a composable [`Predicate`].
    ///
    /// ```rust
    /// use shoal::predicate::{all_of, PredicateExt};
    /// use shoal::ok;
    ///
    /// let in_range = (|x: &i32| *x >= 10).and(|x: &i32| *x <= 20);
    /// assert!(ok(15).filter_by(in_range).is_ok());
    /// assert!(ok(25).filter_by(in_range).is_nil());
    /// assert!(ok(4).filter_by(all_of([|x: &i32| *x > 0])).is_ok());
    /// ```
    pub fn filter_by<P>(self, predicate: P) -> Self
    where
        P: Predicate<T>,
        E: From<Panic>,
    {
        self.filter(|value| predicate.check(value))
    }

    /// Filter and narrow the payload in one step.
    ///
    /// `f` returns `Some` with the narrowed value, or `None` to drop it.
    /// Like [`filter`](Outcome::filter), `Err` becomes `Nil`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shoal::Outcome;
    ///
    /// enum Shape {
    ///     Circle(f64),
    ///     Square(f64),
    /// }
    ///
    /// let radius: Outcome<f64> = Outcome::present(Shape::Circle(2.0)).guard(|shape| match shape {
    ///     Shape::Circle(r) => Some(r),
    ///     Shape::Square(_) => None,
    /// });
    /// assert_eq!(radius.into_option(), Some(2.0));
    /// ```
    pub fn guard<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Option<U>,
        E: From<Panic>,
    {
        match self {
            Outcome::Ok(held) => match guarded(|| f(held.into_inner())) {
                Ok(Some(narrowed)) => Outcome::present(narrowed),
                Ok(None) => Outcome::Nil,
                Err(e) => Outcome::Err(e),
            },
            Outcome::Err(_) | Outcome::Nil => Outcome::Nil,
        }
    }

    /// Narrow the payload through `TryFrom`, dropping values that do not fit.
    pub fn narrow<U>(self) -> Outcome<U, E>
    where
        U: TryFrom<T>,
        E: From<Panic>,
    {
        self.guard(|value| U::try_from(value).ok())
    }

    /// Supply a fallback for `Nil` and `Err`.
    ///
    /// The fallback is `Ok` when `f` produces a value, `Nil` otherwise.
    pub fn or<R, F>(self, f: F) -> Self
    where
        F: FnOnce() -> R,
        R: Into<Option<T>>,
    {
        match self {
            Outcome::Ok(held) => Outcome::Ok(held),
            Outcome::Err(_) | Outcome::Nil => Outcome::maybe(f().into()),
        }
    }

    /// Recover from `Err` with another outcome.
    pub fn catch<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> Outcome<T, E2>,
    {
        match self {
            Outcome::Ok(held) => Outcome::Ok(held),
            Outcome::Err(e) => f(e),
            Outcome::Nil => Outcome::Nil,
        }
    }

    /// Recover from `Err` with an asynchronous step.
    pub fn catch_async<'a, E2, F, Fut>(self, f: F) -> Pending<'a, T, E2>
    where
        F: FnOnce(E) -> Fut,
        Fut: Future<Output = Outcome<T, E2>> + Send + 'a,
        T: Send + 'a,
        E2: Send + 'a,
    {
        match self {
            Outcome::Ok(held) => Pending::ready(Outcome::Ok(held)),
            Outcome::Err(e) => Pending::new(f(e)),
            Outcome::Nil => Pending::ready(Outcome::Nil),
        }
    }

    /// Transform the error.
    pub fn map_err<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Outcome::Ok(held) => Outcome::Ok(held),
            Outcome::Err(e) => Outcome::Err(f(e)),
            Outcome::Nil => Outcome::Nil,
        }
    }

    /// Look at the `Ok` payload without changing the outcome.
    pub fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Outcome::Ok(held) = &self {
            f(held);
        }
        self
    }

    // ========== Elimination ==========

    /// Dispatch to whichever handler matches the variant.
    ///
    /// A missing handler is simply not invoked and the call yields `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shoal::{fail, Outcome};
    ///
    /// let failed: Outcome<i32> = fail("boom");
    /// let seen = failed.match_with(|h| h.ok(|v| v * 2).nil(|| 0));
    /// assert_eq!(seen, None);
    /// ```
    pub fn match_with<'h, R, B>(self, build: B) -> Option<R>
    where
        B: FnOnce(Handlers<'h, T, E, R>) -> Handlers<'h, T, E, R>,
    {
        build(Handlers::new()).dispatch(self)
    }

    /// Collapse every variant into one value.
    pub fn fold<R>(
        self,
        on_ok: impl FnOnce(T) -> R,
        on_nil: impl FnOnce() -> R,
        on_err: impl FnOnce(E) -> R,
    ) -> R {
        match self {
            Outcome::Ok(held) => on_ok(held.into_inner()),
            Outcome::Nil => on_nil(),
            Outcome::Err(e) => on_err(e),
        }
    }

    /// Retrieve the payload, at most once.
    ///
    /// - `Ok`: the first call marks the payload consumed and returns a copy;
    ///   later calls fail with [`GetError::Consumed`].
    /// - `Nil`: `Ok(None)`.
    /// - `Err`: `Err(GetError::Failed(e))` with a copy of the error.
    pub fn get(&self) -> Result<Option<T>, GetError<E>>
    where
        T: Clone,
        E: Clone,
    {
        match self {
            Outcome::Ok(held) => {
                if held.consume() {
                    Ok(Some(T::clone(held)))
                } else {
                    Err(GetError::Consumed)
                }
            }
            Outcome::Nil => Ok(None),
            Outcome::Err(e) => Err(GetError::Failed(e.clone())),
        }
    }

    /// Owned retrieval. Respects the consumed flag like [`get`](Outcome::get)
    /// but needs no `Clone`.
    pub fn into_value(self) -> Result<Option<T>, GetError<E>> {
        match self {
            Outcome::Ok(held) if held.is_consumed() => Err(GetError::Consumed),
            Outcome::Ok(held) => Ok(Some(held.into_inner())),
            Outcome::Nil => Ok(None),
            Outcome::Err(e) => Err(GetError::Failed(e)),
        }
    }

    /// Project into `Option<Result<T, E>>`: `None` for `Nil`.
    pub fn project(self) -> Option<Result<T, E>> {
        match self {
            Outcome::Ok(held) => Some(Ok(held.into_inner())),
            Outcome::Err(e) => Some(Err(e)),
            Outcome::Nil => None,
        }
    }

    /// Convert into `Result<Option<T>, E>`: `Ok(None)` for `Nil`.
    pub fn into_result(self) -> Result<Option<T>, E> {
        match self {
            Outcome::Ok(held) => Ok(Some(held.into_inner())),
            Outcome::Err(e) => Err(e),
            Outcome::Nil => Ok(None),
        }
    }

    /// The payload if present, dropping any error.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Ok(held) => Some(held.into_inner()),
            Outcome::Err(_) | Outcome::Nil => None,
        }
    }

    /// Borrow the payload.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(held) => Some(held),
            Outcome::Err(_) | Outcome::Nil => None,
        }
    }

    /// Borrow the error.
    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Err(e) => Some(e),
            Outcome::Ok(_) | Outcome::Nil => None,
        }
    }

    /// Borrow both sides. The view starts unconsumed.
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Ok(held) => Outcome::present(&**held),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Nil => Outcome::Nil,
        }
    }
}

impl<T> Outcome<T, Error> {
    /// Add a context layer to an `Err`; `Ok` and `Nil` pass through.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shoal::fail;
    ///
    /// let failed = fail::<i32>("connection refused")
    ///     .context("querying user table")
    ///     .context("loading profile");
    ///
    /// let err = failed.error().unwrap();
    /// assert_eq!(err.context_trail(), &["querying user table", "loading profile"]);
    /// ```
    pub fn context(self, msg: impl Into<String>) -> Self {
        match self {
            Outcome::Err(e) => Outcome::Err(e.context(msg)),
            other => other,
        }
    }
}

impl<T, E> Default for Outcome<T, E> {
    fn default() -> Self {
        Outcome::Nil
    }
}

impl<T, E> From<Option<T>> for Outcome<T, E> {
    fn from(value: Option<T>) -> Self {
        Outcome::maybe(value)
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(value) => Outcome::present(value),
            Err(e) => Outcome::Err(e),
        }
    }
}

impl<T: fmt::Display, E: fmt::Display> fmt::Display for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok(held) => write!(f, "Ok({})", **held),
            Outcome::Err(e) => write!(f, "Err({})", e),
            Outcome::Nil => write!(f, "Nil"),
        }
    }
}

// ========== Entry points speaking the crate Error ==========

/// Guarded `Ok` construction; see [`Outcome::ok`].
///
/// # Example
///
/// ```rust
/// use shoal::ok;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let original = Rc::new(RefCell::new(vec![1]));
/// let pushed = ok(Rc::clone(&original)).map(|list| {
///     list.borrow_mut().push(2);
///     list
/// });
///
/// assert_eq!(*original.borrow(), vec![1]);
/// assert_eq!(*pushed.into_option().unwrap().borrow(), vec![1, 2]);
/// ```
pub fn ok<T: Detach>(value: T) -> Outcome<T> {
    Outcome::ok(value)
}

/// Guarded `Ok` construction, with `None` routed to `Nil`; see [`Outcome::ok_opt`].
///
/// ```rust
/// use shoal::ok_opt;
///
/// assert!(ok_opt(Some(1)).is_ok());
/// assert!(ok_opt(None::<i32>).is_nil());
/// ```
pub fn ok_opt<T: Detach>(value: Option<T>) -> Outcome<T> {
    Outcome::ok_opt(value)
}

/// `Ok` when present, `Nil` when `None`; see [`Outcome::maybe`].
pub fn maybe<T>(value: Option<T>) -> Outcome<T> {
    Outcome::maybe(value)
}

/// An `Err` outcome from anything convertible into [`Error`].
pub fn err<T>(error: impl Into<Error>) -> Outcome<T> {
    Outcome::Err(error.into())
}

/// An `Err` outcome from a message.
pub fn fail<T>(message: impl fmt::Display) -> Outcome<T> {
    Outcome::Err(Error::msg(message))
}

/// The `Nil` outcome.
pub fn nil<T>() -> Outcome<T> {
    Outcome::Nil
}
