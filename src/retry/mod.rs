//! Retrying asynchronous outcome-producing operations.
//!
//! A [`RetryPolicy`] is plain data describing *when* to try again; the
//! [`retry`] family of functions executes it:
//!
//! - `Err` is retried while the budget lasts
//! - `Ok` settles the operation immediately, and so does `Nil` unless the
//!   policy [retries it](RetryPolicy::retrying_nil)
//! - every attempt builds a fresh future from the factory
//!
//! # Quick Start
//!
//! ```rust
//! use shoal::retry::{retry, RetryPolicy};
//! use shoal::{fail, ok};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let calls = AtomicU32::new(0);
//! let policy = RetryPolicy::exponential(Duration::from_millis(1)).with_max_retries(3);
//!
//! let out = retry(
//!     || async {
//!         if calls.fetch_add(1, Ordering::SeqCst) < 2 {
//!             fail("flaky")
//!         } else {
//!             ok(42)
//!         }
//!     },
//!     policy,
//! )
//! .await;
//!
//! assert_eq!(out.into_option(), Some(42));
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! # });
//! ```
//!
//! # Backoff
//!
//! - **Constant**: the same pause every time
//! - **Linear**: 100ms, 200ms, 300ms, ...
//! - **Exponential**: 100ms, 200ms, 400ms, ...
//! - **Fibonacci**: 100ms, 100ms, 200ms, 300ms, 500ms, ...
//!
//! With the `jitter` feature, delays can be randomized to keep many clients
//! from retrying in lockstep.

mod error;
mod policy;
mod run;

pub use error::RetryExhausted;
pub use policy::RetryPolicy;
pub use run::{retry, retry_if, retry_with_hooks, RetryEvent};

#[cfg(test)]
mod tests;
