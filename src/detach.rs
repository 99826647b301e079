//! Best-effort deep copies of shared mutable state.
//!
//! Moving a value into an [`Outcome`](crate::Outcome) already stops the caller
//! from mutating it, unless the value is a *shared handle* to interior
//! mutability (`Rc<RefCell<_>>`, `Arc<Mutex<_>>`, ...). For those the
//! [`ok`](crate::ok) constructor asks the [`Detach`] implementation for a copy
//! that shares no mutable state with the caller's handle.
//!
//! # Non-guarantee
//!
//! Detaching is a capability probe, not a promise. A `RefCell` that is
//! currently mutably borrowed, or a `Mutex`/`RwLock` that is locked or
//! poisoned, cannot be read without blocking or panicking. In that case
//! [`try_clone`] keeps the original handle, logs a warning, and the resulting
//! payload **is still aliased** with the caller.
//!
//! # Example
//!
//! ```rust
//! use shoal::detach::{try_clone, Detach};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let original = Rc::new(RefCell::new(vec![1, 2, 3]));
//! assert!(original.is_shared_mutable());
//!
//! let copy = try_clone(Rc::clone(&original), true);
//! copy.borrow_mut().push(4);
//!
//! assert_eq!(*original.borrow(), vec![1, 2, 3]);
//! assert!(!Rc::ptr_eq(&original, &copy));
//! ```

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::{Arc, Mutex, RwLock};

/// Values that can produce a copy sharing no mutable state with themselves.
///
/// Plain owned data reports `false` from [`is_shared_mutable`] and is stored
/// as-is. Use [`detach_by_clone!`](crate::detach_by_clone) to implement the
/// trait for your own `Clone` types.
///
/// [`is_shared_mutable`]: Detach::is_shared_mutable
pub trait Detach: Sized {
    /// Whether mutation through another handle can reach this value.
    fn is_shared_mutable(&self) -> bool;

    /// Attempt a copy that shares no mutable state with `self`.
    ///
    /// Returns `None` when some part of the value cannot be read right now.
    fn try_detach(&self) -> Option<Self>;
}

/// Implement [`Detach`] for plain `Clone` types that hold no shared
/// mutable state.
///
/// # Example
///
/// ```rust
/// use shoal::{detach_by_clone, ok};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// detach_by_clone!(Point);
///
/// let p = ok(Point { x: 1, y: 2 });
/// assert!(p.is_ok());
/// ```
#[macro_export]
macro_rules! detach_by_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::detach::Detach for $ty {
                #[inline]
                fn is_shared_mutable(&self) -> bool {
                    false
                }

                #[inline]
                fn try_detach(&self) -> ::std::option::Option<Self> {
                    ::std::option::Option::Some(::std::clone::Clone::clone(self))
                }
            }
        )*
    };
}

detach_by_clone!(
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

impl<T: ?Sized> Detach for &T {
    fn is_shared_mutable(&self) -> bool {
        false
    }

    fn try_detach(&self) -> Option<Self> {
        Some(*self)
    }
}

impl<B> Detach for Cow<'_, B>
where
    B: ToOwned + ?Sized,
{
    fn is_shared_mutable(&self) -> bool {
        false
    }

    fn try_detach(&self) -> Option<Self> {
        Some(self.clone())
    }
}

impl<T: Detach> Detach for Option<T> {
    fn is_shared_mutable(&self) -> bool {
        self.as_ref().is_some_and(Detach::is_shared_mutable)
    }

    fn try_detach(&self) -> Option<Self> {
        match self {
            Some(value) => value.try_detach().map(Some),
            None => Some(None),
        }
    }
}

impl<T: Detach> Detach for Box<T> {
    fn is_shared_mutable(&self) -> bool {
        (**self).is_shared_mutable()
    }

    fn try_detach(&self) -> Option<Self> {
        (**self).try_detach().map(Box::new)
    }
}

macro_rules! detach_sequence {
    ($($coll:ident),*) => {
        $(
            impl<T: Detach> Detach for $coll<T> {
                fn is_shared_mutable(&self) -> bool {
                    self.iter().any(Detach::is_shared_mutable)
                }

                fn try_detach(&self) -> Option<Self> {
                    self.iter().map(Detach::try_detach).collect()
                }
            }
        )*
    };
}

detach_sequence!(Vec, VecDeque);

impl<T: Detach + Ord> Detach for BTreeSet<T> {
    fn is_shared_mutable(&self) -> bool {
        self.iter().any(Detach::is_shared_mutable)
    }

    fn try_detach(&self) -> Option<Self> {
        self.iter().map(Detach::try_detach).collect()
    }
}

impl<T, S> Detach for HashSet<T, S>
where
    T: Detach + Eq + Hash,
    S: BuildHasher + Clone,
{
    fn is_shared_mutable(&self) -> bool {
        self.iter().any(Detach::is_shared_mutable)
    }

    fn try_detach(&self) -> Option<Self> {
        let mut copy = HashSet::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for item in self {
            copy.insert(item.try_detach()?);
        }
        Some(copy)
    }
}

impl<K, V> Detach for BTreeMap<K, V>
where
    K: Clone + Ord,
    V: Detach,
{
    fn is_shared_mutable(&self) -> bool {
        self.values().any(Detach::is_shared_mutable)
    }

    fn try_detach(&self) -> Option<Self> {
        self.iter()
            .map(|(k, v)| v.try_detach().map(|v| (k.clone(), v)))
            .collect()
    }
}

impl<K, V, S> Detach for HashMap<K, V, S>
where
    K: Clone + Eq + Hash,
    V: Detach,
    S: BuildHasher + Clone,
{
    fn is_shared_mutable(&self) -> bool {
        self.values().any(Detach::is_shared_mutable)
    }

    fn try_detach(&self) -> Option<Self> {
        let mut copy = HashMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (k, v) in self {
            copy.insert(k.clone(), v.try_detach()?);
        }
        Some(copy)
    }
}

macro_rules! detach_tuple {
    ($(($($name:ident),+)),*) => {
        $(
            #[allow(non_snake_case)]
            impl<$($name: Detach),+> Detach for ($($name,)+) {
                fn is_shared_mutable(&self) -> bool {
                    let ($($name,)+) = self;
                    false $(|| $name.is_shared_mutable())+
                }

                fn try_detach(&self) -> Option<Self> {
                    let ($($name,)+) = self;
                    Some(($($name.try_detach()?,)+))
                }
            }
        )*
    };
}

detach_tuple!((A), (A, B), (A, B, C), (A, B, C, D));

// Shared handles to immutable data stay shared; only reachable interior
// mutability forces a fresh allocation.
impl<T: Detach> Detach for Rc<T> {
    fn is_shared_mutable(&self) -> bool {
        (**self).is_shared_mutable()
    }

    fn try_detach(&self) -> Option<Self> {
        if (**self).is_shared_mutable() {
            (**self).try_detach().map(Rc::new)
        } else {
            Some(Rc::clone(self))
        }
    }
}

impl<T: Detach> Detach for Arc<T> {
    fn is_shared_mutable(&self) -> bool {
        (**self).is_shared_mutable()
    }

    fn try_detach(&self) -> Option<Self> {
        if (**self).is_shared_mutable() {
            (**self).try_detach().map(Arc::new)
        } else {
            Some(Arc::clone(self))
        }
    }
}

impl<T: Copy> Detach for Cell<T> {
    fn is_shared_mutable(&self) -> bool {
        true
    }

    fn try_detach(&self) -> Option<Self> {
        Some(Cell::new(self.get()))
    }
}

impl<T: Detach> Detach for RefCell<T> {
    fn is_shared_mutable(&self) -> bool {
        true
    }

    fn try_detach(&self) -> Option<Self> {
        let inner = self.try_borrow().ok()?;
        inner.try_detach().map(RefCell::new)
    }
}

impl<T: Detach> Detach for Mutex<T> {
    fn is_shared_mutable(&self) -> bool {
        true
    }

    fn try_detach(&self) -> Option<Self> {
        let inner = self.try_lock().ok()?;
        inner.try_detach().map(Mutex::new)
    }
}

impl<T: Detach> Detach for RwLock<T> {
    fn is_shared_mutable(&self) -> bool {
        true
    }

    fn try_detach(&self) -> Option<Self> {
        let inner = self.try_read().ok()?;
        inner.try_detach().map(RwLock::new)
    }
}

/// Copy `value` if it is shared mutable state, otherwise return it untouched.
///
/// When the copy cannot be made the original handle is returned and, if
/// `warn_on_failure` is set, a warning is logged. The returned value is then
/// still aliased with every other handle to it.
pub fn try_clone<T: Detach>(value: T, warn_on_failure: bool) -> T {
    if !value.is_shared_mutable() {
        return value;
    }

    match value.try_detach() {
        Some(copy) => copy,
        None => {
            if warn_on_failure {
                crate::log::warn(format_args!(
                    "could not detach {}; payload stays shared with the caller",
                    std::any::type_name::<T>()
                ));
            }
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_are_not_shared_mutable() {
        assert!(!42i32.is_shared_mutable());
        assert!(!String::from("hi").is_shared_mutable());
        assert!(!vec![1u8, 2, 3].is_shared_mutable());
        assert!(!Rc::new(5i64).is_shared_mutable());
        assert!(!"static".is_shared_mutable());
        assert!(!(1u32, "two", 3.0f64).is_shared_mutable());
    }

    #[test]
    fn test_interior_mutability_is_detected_through_handles() {
        assert!(Rc::new(RefCell::new(1i32)).is_shared_mutable());
        assert!(Arc::new(Mutex::new(1i32)).is_shared_mutable());
        assert!(vec![Rc::new(Cell::new(1i32))].is_shared_mutable());
        assert!(Some(Arc::new(RwLock::new(1i32))).is_shared_mutable());
        assert!((1i32, Rc::new(RefCell::new(2i32))).is_shared_mutable());
    }

    #[test]
    fn test_plain_rc_keeps_sharing() {
        let rc = Rc::new(String::from("shared"));
        let copy = try_clone(Rc::clone(&rc), true);
        assert!(Rc::ptr_eq(&rc, &copy));
    }

    #[test]
    fn test_refcell_is_copied() {
        let original = Rc::new(RefCell::new(vec![1, 2]));
        let copy = try_clone(Rc::clone(&original), true);

        copy.borrow_mut().push(3);
        assert_eq!(*original.borrow(), vec![1, 2]);
        assert_eq!(*copy.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_nested_handles_are_copied_deeply() {
        let inner = Rc::new(RefCell::new(1i32));
        let outer = Rc::new(RefCell::new(vec![Rc::clone(&inner)]));

        let copy = try_clone(Rc::clone(&outer), false);
        *copy.borrow()[0].borrow_mut() = 99;

        assert_eq!(*inner.borrow(), 1);
    }

    #[test]
    fn test_busy_refcell_falls_back_to_original() {
        let original = Rc::new(RefCell::new(1i32));
        let _guard = original.borrow_mut();

        let same = try_clone(Rc::clone(&original), false);
        assert!(Rc::ptr_eq(&original, &same));
    }

    #[test]
    fn test_locked_mutex_falls_back_to_original() {
        let original = Arc::new(Mutex::new(String::from("locked")));
        let _guard = original.lock();

        let same = try_clone(Arc::clone(&original), false);
        assert!(Arc::ptr_eq(&original, &same));
    }

    #[test]
    fn test_maps_detach_values() {
        let mut map = HashMap::new();
        map.insert("a", Rc::new(RefCell::new(1i32)));
        let copy = try_clone(map.clone(), false);

        *copy["a"].borrow_mut() = 2;
        assert_eq!(*map["a"].borrow(), 1);

        let mut tree = BTreeMap::new();
        tree.insert(1u8, Arc::new(Mutex::new(1i32)));
        assert!(tree.try_detach().is_some());
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn test_failed_detach_logs_warning() {
        let original = Rc::new(RefCell::new(1i32));
        let _guard = original.borrow_mut();

        let _ = try_clone(Rc::clone(&original), true);
        assert!(logs_contain("could not detach"));
    }
}
