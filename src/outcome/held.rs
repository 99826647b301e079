//! The payload holder of the `Ok` variant.

use std::cell::Cell;
use std::fmt;
use std::ops::Deref;

/// A present value together with its retrieval flag.
///
/// The flag sits beside the payload and only gates
/// [`Outcome::get`](crate::Outcome::get). Combinators read the payload
/// directly whether or not it has been retrieved.
#[derive(Clone)]
pub struct Held<T> {
    value: T,
    consumed: Cell<bool>,
}

impl<T> Held<T> {
    /// Hold `value`, not yet consumed.
    pub fn new(value: T) -> Self {
        Held {
            value,
            consumed: Cell::new(false),
        }
    }

    /// Whether the payload has been retrieved through `get`.
    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Take the payload, ignoring the flag.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Mark the payload consumed. Returns `true` only for the first call.
    pub(crate) fn consume(&self) -> bool {
        !self.consumed.replace(true)
    }
}

impl<T> Deref for Held<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> AsRef<T> for Held<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T> From<T> for Held<T> {
    fn from(value: T) -> Self {
        Held::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Held<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_consumed() {
            f.debug_tuple("Held").field(&self.value).field(&"consumed").finish()
        } else {
            f.debug_tuple("Held").field(&self.value).finish()
        }
    }
}

// The flag is bookkeeping, not identity.
impl<T: PartialEq> PartialEq for Held<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Held<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_only_once() {
        let held = Held::new(3);
        assert!(!held.is_consumed());
        assert!(held.consume());
        assert!(held.is_consumed());
        assert!(!held.consume());
    }

    #[test]
    fn test_equality_ignores_flag() {
        let a = Held::new("x");
        let b = Held::new("x");
        a.consume();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clone_copies_flag() {
        let a = Held::new(1);
        a.consume();
        assert!(a.clone().is_consumed());
    }
}
