//! Normalization into and out of [`Outcome`].
//!
//! [`IntoOutcome`] describes how a plain value becomes an outcome:
//!
//! - an `Outcome` is returned unchanged
//! - `Option<T>` maps `Some` to `Ok` and `None` to `Nil`
//! - `Result<T, X>` maps `Ok` to `Ok` and `Err` to `Err`
//! - an [`Error`] or [`Panic`] becomes `Err`
//! - any other value becomes `Ok`
//!
//! Types outside this crate opt in with [`impl_into_outcome!`](crate::impl_into_outcome).

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{Error, Panic};
use crate::outcome::Outcome;

/// Conversion into an [`Outcome`].
pub trait IntoOutcome<T, E> {
    /// Perform the conversion.
    fn into_outcome(self) -> Outcome<T, E>;
}

impl<T, E> IntoOutcome<T, E> for Outcome<T, E> {
    #[inline]
    fn into_outcome(self) -> Outcome<T, E> {
        self
    }
}

impl<T, E> IntoOutcome<T, E> for Option<T> {
    #[inline]
    fn into_outcome(self) -> Outcome<T, E> {
        Outcome::maybe(self)
    }
}

impl<T, E, X> IntoOutcome<T, E> for Result<T, X>
where
    X: Into<E>,
{
    #[inline]
    fn into_outcome(self) -> Outcome<T, E> {
        match self {
            Ok(value) => Outcome::present(value),
            Err(e) => Outcome::Err(e.into()),
        }
    }
}

impl<T> IntoOutcome<T, Error> for Error {
    fn into_outcome(self) -> Outcome<T, Error> {
        Outcome::Err(self)
    }
}

impl<T, E: From<Panic>> IntoOutcome<T, E> for Panic {
    fn into_outcome(self) -> Outcome<T, E> {
        Outcome::Err(E::from(self))
    }
}

/// Implement [`IntoOutcome`] for types that always become `Ok`.
///
/// # Example
///
/// ```rust
/// use shoal::{impl_into_outcome, wrap};
///
/// #[derive(Debug, PartialEq)]
/// struct UserId(u64);
///
/// impl_into_outcome!(UserId);
///
/// assert_eq!(wrap(UserId(7)).into_option(), Some(UserId(7)));
/// ```
#[macro_export]
macro_rules! impl_into_outcome {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<E> $crate::wrap::IntoOutcome<$ty, E> for $ty {
                #[inline]
                fn into_outcome(self) -> $crate::Outcome<$ty, E> {
                    $crate::Outcome::present(self)
                }
            }
        )*
    };
}

impl_into_outcome!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    std::time::Duration,
);

macro_rules! into_outcome_generic {
    ($(<$($param:ident $(: $bound:path)?),+> $ty:ty),* $(,)?) => {
        $(
            impl<$($param $(: $bound)?,)+ E> IntoOutcome<$ty, E> for $ty {
                #[inline]
                fn into_outcome(self) -> Outcome<$ty, E> {
                    Outcome::present(self)
                }
            }
        )*
    };
}

into_outcome_generic!(
    <T> Vec<T>,
    <T> VecDeque<T>,
    <T> Box<T>,
    <T> Rc<T>,
    <T> Arc<T>,
    <T> BTreeSet<T>,
    <T, S> HashSet<T, S>,
    <K, V> BTreeMap<K, V>,
    <K, V, S> HashMap<K, V, S>,
);

impl<'a, T: ?Sized, E> IntoOutcome<&'a T, E> for &'a T {
    #[inline]
    fn into_outcome(self) -> Outcome<&'a T, E> {
        Outcome::present(self)
    }
}

impl<'a, B: ToOwned + ?Sized, E> IntoOutcome<Cow<'a, B>, E> for Cow<'a, B> {
    #[inline]
    fn into_outcome(self) -> Outcome<Cow<'a, B>, E> {
        Outcome::present(self)
    }
}

macro_rules! into_outcome_tuple {
    ($(($($name:ident),+)),*) => {
        $(
            impl<$($name,)+ E> IntoOutcome<($($name,)+), E> for ($($name,)+) {
                #[inline]
                fn into_outcome(self) -> Outcome<($($name,)+), E> {
                    Outcome::present(self)
                }
            }
        )*
    };
}

into_outcome_tuple!((A), (A, B), (A, B, C), (A, B, C, D));

/// Normalize any supported value into an outcome.
///
/// Wrapping is idempotent: an `Outcome` comes back unchanged.
///
/// # Example
///
/// ```rust
/// use shoal::{wrap, Outcome};
///
/// assert_eq!(wrap(Some(1)).into_option(), Some(1));
/// assert!(wrap(None::<i32>).is_nil());
/// assert!(wrap("x".parse::<i32>()).is_err());
///
/// let already: Outcome<i32> = Outcome::present(5);
/// assert_eq!(wrap(already.clone()), already);
/// ```
pub fn wrap<T, R>(value: R) -> Outcome<T>
where
    R: IntoOutcome<T, Error>,
{
    value.into_outcome()
}

/// Normalize a value and project it back out.
///
/// `Ok` yields `Some(Ok(value))`, `Err` yields `Some(Err(error))`, and `Nil`
/// yields `None`, the absence sentinel.
///
/// # Example
///
/// ```rust
/// use shoal::{fail, unwrap};
///
/// assert_eq!(unwrap(Some(2)).map(Result::ok), Some(Some(2)));
/// assert_eq!(unwrap(None::<i32>), None);
/// assert!(matches!(unwrap(fail::<i32>("x")), Some(Err(_))));
/// ```
pub fn unwrap<T, R>(value: R) -> Option<Result<T, Error>>
where
    R: IntoOutcome<T, Error>,
{
    wrap(value).project()
}
