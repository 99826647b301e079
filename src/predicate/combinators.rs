//! The [`Predicate`] trait and its boolean combinators.

/// A reusable test on a payload, consumed by
/// [`Outcome::filter_by`](crate::Outcome::filter_by).
///
/// Closures `Fn(&T) -> bool` are predicates. Predicates are `Send + Sync` so
/// a combined test can be shared between tasks.
///
/// # Example
///
/// ```rust
/// use shoal::predicate::*;
///
/// let unprivileged_port = (|p: &u16| *p >= 1024).and(|p: &u16| *p != 8080);
/// assert!(unprivileged_port.check(&3000));
/// assert!(!unprivileged_port.check(&8080));
/// assert!(!unprivileged_port.check(&80));
/// ```
pub trait Predicate<T: ?Sized>: Send + Sync {
    /// Test the value.
    fn check(&self, value: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &T) -> bool {
        self(value)
    }
}

/// `and`, `or` and `not` for every predicate.
pub trait PredicateExt<T: ?Sized>: Predicate<T> + Sized {
    /// Both must hold. `other` is skipped when `self` fails.
    fn and<P: Predicate<T>>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    /// Either may hold. `other` is skipped when `self` passes.
    fn or<P: Predicate<T>>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    /// The opposite.
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<T: ?Sized, P: Predicate<T>> PredicateExt<T> for P {}

/// Conjunction, built by [`PredicateExt::and`].
#[derive(Clone, Copy, Debug)]
pub struct And<L, R>(pub L, pub R);

impl<T: ?Sized, L: Predicate<T>, R: Predicate<T>> Predicate<T> for And<L, R> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        let And(left, right) = self;
        left.check(value) && right.check(value)
    }
}

/// Disjunction, built by [`PredicateExt::or`].
#[derive(Clone, Copy, Debug)]
pub struct Or<L, R>(pub L, pub R);

impl<T: ?Sized, L: Predicate<T>, R: Predicate<T>> Predicate<T> for Or<L, R> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        let Or(left, right) = self;
        left.check(value) || right.check(value)
    }
}

/// Negation, built by [`PredicateExt::not`].
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        !self.0.check(value)
    }
}

/// Every predicate in the array holds. An empty array always passes.
#[derive(Clone, Copy, Debug)]
pub struct AllOf<P, const N: usize>(pub [P; N]);

impl<T: ?Sized, P: Predicate<T>, const N: usize> Predicate<T> for AllOf<P, N> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.iter().all(|p| p.check(value))
    }
}

/// Build an [`AllOf`]. The predicates share one type; cast closures to
/// `fn(&T) -> bool` or chain `.and()` to mix them.
pub fn all_of<P, const N: usize>(predicates: [P; N]) -> AllOf<P, N> {
    AllOf(predicates)
}

/// Some predicate in the array holds. An empty array never passes.
#[derive(Clone, Copy, Debug)]
pub struct AnyOf<P, const N: usize>(pub [P; N]);

impl<T: ?Sized, P: Predicate<T>, const N: usize> Predicate<T> for AnyOf<P, N> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.iter().any(|p| p.check(value))
    }
}

/// Build an [`AnyOf`].
pub fn any_of<P, const N: usize>(predicates: [P; N]) -> AnyOf<P, N> {
    AnyOf(predicates)
}
