//! Diagnostic logging.
//!
//! With the `tracing` feature (on by default) messages are emitted as
//! `tracing` events; without it they are written to stderr.

use std::fmt;

/// A destination for log messages.
///
/// Any `Fn(&dyn Display)` closure is a sink, which makes capturing output
/// in tests straightforward.
pub trait Sink {
    /// Write a single message.
    fn write(&self, message: &dyn fmt::Display);
}

impl<F> Sink for F
where
    F: Fn(&dyn fmt::Display),
{
    fn write(&self, message: &dyn fmt::Display) {
        self(message)
    }
}

/// The standard console sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl Sink for Console {
    fn write(&self, message: &dyn fmt::Display) {
        #[cfg(feature = "tracing")]
        tracing::info!("{}", message);
        #[cfg(not(feature = "tracing"))]
        eprintln!("{}", message);
    }
}

/// Log `message` to the console and hand it back for chaining.
///
/// # Example
///
/// ```rust
/// use shoal::log::log;
///
/// let n = log(42);
/// assert_eq!(n, 42);
/// ```
pub fn log<M: fmt::Display>(message: M) -> M {
    log_to(message, Console)
}

/// Log `message` to `sink` and hand it back for chaining.
///
/// # Example
///
/// ```rust
/// use shoal::log::log_to;
/// use std::cell::RefCell;
///
/// let lines = RefCell::new(Vec::new());
/// let value = log_to("hello", |m: &dyn std::fmt::Display| lines.borrow_mut().push(m.to_string()));
///
/// assert_eq!(value, "hello");
/// assert_eq!(lines.into_inner(), vec!["hello".to_string()]);
/// ```
pub fn log_to<M: fmt::Display, S: Sink>(message: M, sink: S) -> M {
    sink.write(&message);
    message
}

pub(crate) fn warn(message: fmt::Arguments<'_>) {
    #[cfg(feature = "tracing")]
    tracing::warn!("{}", message);
    #[cfg(not(feature = "tracing"))]
    eprintln!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_log_to_returns_message() {
        let seen = RefCell::new(Vec::new());
        let out = log_to(7, |m: &dyn fmt::Display| seen.borrow_mut().push(m.to_string()));

        assert_eq!(out, 7);
        assert_eq!(seen.into_inner(), vec!["7".to_string()]);
    }

    #[test]
    fn test_log_passes_through() {
        assert_eq!(log("chained"), "chained");
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn test_console_emits_tracing_event() {
        log("console message");
        assert!(logs_contain("console message"));
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn test_warn_emits_warning() {
        warn(format_args!("detach failed for {}", "payload"));
        assert!(logs_contain("detach failed for payload"));
    }
}
