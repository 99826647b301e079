//! # Shoal
//!
//! A three-way result algebra: every computation is **present**, **absent**,
//! or **failed**.
//!
//! - [`Outcome::Ok`] carries a value
//! - [`Outcome::Nil`] means "nothing here", which is not an error
//! - [`Outcome::Err`] carries an error
//!
//! Combinators route each variant through a pipeline without the caller
//! checking at every step. Panics raised inside user closures are caught and
//! surface as `Err`, synchronous and asynchronous steps compose with the same
//! vocabulary, and an `Ok` payload can be retrieved exactly once.
//!
//! ## Quick Example
//!
//! ```rust
//! use shoal::prelude::*;
//!
//! fn parse_port(raw: &str) -> Outcome<u16> {
//!     result(|| raw.parse::<u16>()).context("parsing port")
//! }
//!
//! let describe = |o: Outcome<u16>| {
//!     o.fold(
//!         |p| format!("port {}", p),
//!         || "none".to_string(),
//!         |e| format!("invalid: {}", e.message()),
//!     )
//! };
//!
//! assert_eq!(describe(parse_port("8080")), "port 8080");
//! assert_eq!(describe(parse_port("http")), "invalid: invalid digit found in string");
//!
//! // `filter` drops what fails the test, and an error along with it.
//! let unprivileged = |raw: &str| parse_port(raw).filter(|p| *p >= 1024);
//! assert_eq!(describe(unprivileged("8080")), "port 8080");
//! assert_eq!(describe(unprivileged("80")), "none");
//! assert_eq!(describe(unprivileged("http")), "none");
//! ```
//!
//! ## Asynchronous pipelines
//!
//! ```rust
//! use shoal::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let name = task(|| async { Some("ada") })
//!     .chain_async(|n| async move { ok(n.to_uppercase()) })
//!     .or(|| String::from("anonymous"))
//!     .await;
//!
//! assert_eq!(name.into_option(), Some("ADA".to_string()));
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): diagnostics go through `tracing` instead of stderr
//! - `async`: the tokio-backed [`retry`] executors
//! - `jitter`: randomized retry delays
//! - `serde`: `Serialize`/`Deserialize` for [`Outcome`] and [`Error`]
//! - `proptest`: `Arbitrary` for [`Outcome`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod detach;
pub mod error;
pub mod flow;
pub mod log;
pub mod outcome;
pub mod predicate;
#[cfg(feature = "async")]
pub mod retry;
#[cfg(feature = "serde")]
mod serde_impl;
pub mod task;
pub mod testing;
pub mod traverse;
pub mod wrap;

// Re-exports
pub use detach::{try_clone, Detach};
pub use error::{Error, GetError, Panic};
pub use flow::{flow, Flow, Step};
pub use log::{log, log_to};
pub use outcome::{err, fail, maybe, nil, ok, ok_opt, Handlers, Held, Outcome};
pub use predicate::{is_defined, is_error, is_instance_of, is_shared_mutable, Predicate, PredicateExt};
pub use task::{result, task, Pending};
pub use wrap::{unwrap, wrap, IntoOutcome};

#[cfg(feature = "async")]
pub use retry::{RetryExhausted, RetryPolicy};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, GetError};
    pub use crate::flow::{flow, Flow, Step};
    pub use crate::outcome::{err, fail, maybe, nil, ok, ok_opt, Outcome};
    pub use crate::predicate::{Predicate, PredicateExt};
    pub use crate::task::{result, task, Pending};
    pub use crate::wrap::{unwrap, wrap, IntoOutcome};
}
