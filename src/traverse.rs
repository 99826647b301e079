//! Collecting many outcomes into one.
//!
//! - **`sequence`**: `Vec<Outcome<T, E>>` → `Outcome<Vec<T>, E>`
//! - **`traverse`**: map a function over a collection and sequence the results
//!
//! Collection stops at the first outcome that is not `Ok`: an `Err` yields
//! that error and a `Nil` yields `Nil`. Later elements are not visited.
//!
//! # Examples
//!
//! ```
//! use shoal::traverse::traverse;
//! use shoal::{maybe, Outcome};
//!
//! fn lookup(id: u32) -> Outcome<&'static str> {
//!     maybe(match id {
//!         1 => Some("ada"),
//!         2 => Some("grace"),
//!         _ => None,
//!     })
//! }
//!
//! assert_eq!(traverse(vec![1, 2], lookup).into_option(), Some(vec!["ada", "grace"]));
//! assert!(traverse(vec![1, 3], lookup).is_nil());
//! ```

use std::future::Future;

use crate::outcome::Outcome;

impl<T, V, E> FromIterator<Outcome<T, E>> for Outcome<V, E>
where
    V: FromIterator<T>,
{
    fn from_iter<I: IntoIterator<Item = Outcome<T, E>>>(iter: I) -> Self {
        let mut stop: Option<Outcome<V, E>> = None;
        let collected: V = iter
            .into_iter()
            .map_while(|outcome| match outcome {
                Outcome::Ok(held) => Some(held.into_inner()),
                Outcome::Err(e) => {
                    stop = Some(Outcome::Err(e));
                    None
                }
                Outcome::Nil => {
                    stop = Some(Outcome::Nil);
                    None
                }
            })
            .collect();

        stop.unwrap_or_else(|| Outcome::present(collected))
    }
}

/// Sequence a collection of outcomes.
///
/// # Examples
///
/// ```
/// use shoal::traverse::sequence;
/// use shoal::{fail, ok};
///
/// assert_eq!(sequence(vec![ok(1), ok(2)]).into_option(), Some(vec![1, 2]));
/// assert!(sequence(vec![ok(1), fail("bad")]).is_err());
/// ```
pub fn sequence<T, E, I>(iter: I) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    iter.into_iter().collect()
}

/// Apply `f` to each element and sequence the results.
///
/// `f` is not called for elements after the first non-`Ok` result.
pub fn traverse<A, T, E, F, I>(iter: I, f: F) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = A>,
    F: FnMut(A) -> Outcome<T, E>,
{
    iter.into_iter().map(f).collect()
}

/// Apply an asynchronous `f` to each element in order and sequence the
/// results.
///
/// Elements are processed one at a time; the next future is created only
/// after the previous one settled into `Ok`.
///
/// # Examples
///
/// ```
/// use shoal::traverse::traverse_async;
/// use shoal::ok;
///
/// # tokio_test::block_on(async {
/// let doubled = traverse_async(vec![1, 2, 3], |x| async move { ok(x * 2) }).await;
/// assert_eq!(doubled.into_option(), Some(vec![2, 4, 6]));
/// # });
/// ```
pub async fn traverse_async<A, T, E, F, Fut, I>(iter: I, mut f: F) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = A>,
    F: FnMut(A) -> Fut,
    Fut: Future<Output = Outcome<T, E>>,
{
    let mut values = Vec::new();
    for item in iter {
        match f(item).await {
            Outcome::Ok(held) => values.push(held.into_inner()),
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Nil => return Outcome::Nil,
        }
    }
    Outcome::present(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fail, nil, ok, Error};
    use std::cell::Cell;
    use std::collections::BTreeSet;

    #[test]
    fn test_sequence_all_ok() {
        let out = sequence(vec![ok(1), ok(2), ok(3)]);
        assert_eq!(out.into_option(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_sequence_empty_is_ok() {
        let out: Outcome<Vec<i32>> = sequence(Vec::new());
        assert_eq!(out.into_option(), Some(Vec::new()));
    }

    #[test]
    fn test_first_failure_wins() {
        let out = sequence(vec![ok(1), fail("first"), fail("second")]);
        assert_eq!(out.error().map(Error::message), Some("first"));

        let absent = sequence(vec![ok(1), nil(), fail("later")]);
        assert!(absent.is_nil());
    }

    #[test]
    fn test_traverse_stops_calling_after_failure() {
        let calls = Cell::new(0);
        let out = traverse(vec![1, 2, 3], |x| {
            calls.set(calls.get() + 1);
            if x == 2 {
                fail("two")
            } else {
                ok(x)
            }
        });

        assert!(out.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_collect_into_other_containers() {
        let set: Outcome<BTreeSet<i32>> = vec![ok(3), ok(1), ok(3)].into_iter().collect();
        assert_eq!(set.into_option(), Some(BTreeSet::from([1, 3])));
    }

    #[tokio::test]
    async fn test_traverse_async_short_circuits() {
        let out = traverse_async(vec![1, 2, 3], |x| async move {
            if x == 2 {
                nil()
            } else {
                ok(x)
            }
        })
        .await;
        assert!(out.is_nil());
    }
}
