//! Testing utilities for code built on outcomes.
//!
//! Assertion macros for each variant, plus a proptest `Arbitrary`
//! implementation behind the `proptest` feature.
//!
//! # Examples
//!
//! ```rust
//! use shoal::{assert_err, assert_nil, assert_ok, fail, nil, ok};
//!
//! assert_ok!(ok(42));
//! assert_ok!(ok(42), 42);
//! assert_nil!(nil::<i32>());
//! assert_err!(fail::<i32>("boom"));
//! ```

/// Assert that an outcome is `Ok`, optionally with a given payload.
///
/// # Example
///
/// ```rust
/// use shoal::{assert_ok, ok};
///
/// assert_ok!(ok("ready"), "ready");
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Ok(_) => {}
            $crate::Outcome::Nil => panic!("Expected Ok, got Nil"),
            $crate::Outcome::Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($outcome:expr, $expected:expr) => {
        match $outcome {
            $crate::Outcome::Ok(held) => assert_eq!(held.into_inner(), $expected),
            $crate::Outcome::Nil => panic!("Expected Ok({:?}), got Nil", $expected),
            $crate::Outcome::Err(e) => {
                panic!("Expected Ok({:?}), got Err: {:?}", $expected, e)
            }
        }
    };
}

/// Assert that an outcome is `Nil`.
#[macro_export]
macro_rules! assert_nil {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Nil => {}
            $crate::Outcome::Ok(v) => panic!("Expected Nil, got Ok: {:?}", v),
            $crate::Outcome::Err(e) => panic!("Expected Nil, got Err: {:?}", e),
        }
    };
}

/// Assert that an outcome is `Err`, optionally checking the error.
///
/// # Example
///
/// ```rust
/// use shoal::{assert_err, fail};
///
/// assert_err!(fail::<()>("denied"), |e: shoal::Error| e.message() == "denied");
/// ```
#[macro_export]
macro_rules! assert_err {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Err(_) => {}
            $crate::Outcome::Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            $crate::Outcome::Nil => panic!("Expected Err, got Nil"),
        }
    };
    ($outcome:expr, $check:expr) => {
        match $outcome {
            $crate::Outcome::Err(e) => {
                let shown = format!("{:?}", e);
                assert!(($check)(e), "Err did not match: {}", shown);
            }
            $crate::Outcome::Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            $crate::Outcome::Nil => panic!("Expected Err, got Nil"),
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
use crate::Outcome;

#[cfg(feature = "proptest")]
impl<T, E> Arbitrary for Outcome<T, E>
where
    T: Arbitrary + 'static,
    E: Arbitrary + 'static,
{
    type Parameters = (T::Parameters, E::Parameters);
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        let (t_params, e_params) = args;
        prop_oneof![
            any_with::<T>(t_params).prop_map(Outcome::present),
            Just(()).prop_map(|_| Outcome::Nil),
            any_with::<E>(e_params).prop_map(Outcome::Err),
        ]
        .boxed()
    }
}
