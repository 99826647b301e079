//! Predicates used by the outcome combinators.
//!
//! Two kinds of predicate live here:
//!
//! - [`Predicate`], the composable test that [`Outcome::filter_by`] consumes.
//!   Any `Fn(&T) -> bool` closure is a predicate, and predicates combine with
//!   `and`, `or` and `not`.
//! - Free-standing type probes ([`is_defined`], [`is_shared_mutable`],
//!   [`is_instance_of`], [`is_error`]) that the constructors and normalizers
//!   branch on.
//!
//! # Example
//!
//! ```rust
//! use shoal::ok;
//! use shoal::predicate::*;
//!
//! let in_range = (|x: &i32| *x > 0).and(|x: &i32| *x < 100);
//! assert!(in_range.check(&50));
//!
//! let outcome = ok(150).filter_by(in_range);
//! assert!(outcome.is_nil());
//! ```
//!
//! [`Outcome::filter_by`]: crate::Outcome::filter_by

mod combinators;
mod types;

pub use combinators::{all_of, any_of, AllOf, And, AnyOf, Not, Or, Predicate, PredicateExt};
pub use types::{is_defined, is_error, is_instance_of, is_shared_mutable};
