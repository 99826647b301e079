//! Optional per-variant handlers for [`Outcome::match_with`].

use std::fmt;

use super::Outcome;

/// A set of handlers, one per variant, each optional.
///
/// Built inside the closure given to [`Outcome::match_with`]. A variant with
/// no handler is not an error: the match simply yields `None`.
pub struct Handlers<'h, T, E, R> {
    on_ok: Option<Box<dyn FnOnce(T) -> R + 'h>>,
    on_nil: Option<Box<dyn FnOnce() -> R + 'h>>,
    on_err: Option<Box<dyn FnOnce(E) -> R + 'h>>,
}

impl<'h, T, E, R> Handlers<'h, T, E, R> {
    /// An empty handler set.
    pub fn new() -> Self {
        Handlers {
            on_ok: None,
            on_nil: None,
            on_err: None,
        }
    }

    /// Handle the `Ok` payload.
    pub fn ok(mut self, f: impl FnOnce(T) -> R + 'h) -> Self {
        self.on_ok = Some(Box::new(f));
        self
    }

    /// Handle absence.
    pub fn nil(mut self, f: impl FnOnce() -> R + 'h) -> Self {
        self.on_nil = Some(Box::new(f));
        self
    }

    /// Handle the error.
    pub fn err(mut self, f: impl FnOnce(E) -> R + 'h) -> Self {
        self.on_err = Some(Box::new(f));
        self
    }

    pub(crate) fn dispatch(self, outcome: Outcome<T, E>) -> Option<R> {
        match outcome {
            Outcome::Ok(held) => self.on_ok.map(|f| f(held.into_inner())),
            Outcome::Nil => self.on_nil.map(|f| f()),
            Outcome::Err(e) => self.on_err.map(|f| f(e)),
        }
    }
}

impl<T, E, R> Default for Handlers<'_, T, E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, R> fmt::Debug for Handlers<'_, T, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("ok", &self.on_ok.is_some())
            .field("nil", &self.on_nil.is_some())
            .field("err", &self.on_err.is_some())
            .finish()
    }
}
