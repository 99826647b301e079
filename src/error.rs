//! Error types carried by the `Err` variant
//!
//! [`Error`] is the default failure payload of an [`Outcome`](crate::Outcome).
//! It holds a message, an optional cause, and a trail of context messages
//! accumulated as the error propagates up the call stack.
//!
//! # Examples
//!
//! ```
//! use shoal::Error;
//!
//! let err = Error::msg("file not found")
//!     .context("reading config file")
//!     .context("initializing application");
//!
//! assert_eq!(err.message(), "file not found");
//! assert_eq!(err.context_trail().len(), 2);
//! ```
//!
//! Any `std::error::Error` converts into [`Error`], keeping the original as
//! the cause:
//!
//! ```
//! use shoal::Error;
//!
//! let parse = "abc".parse::<i32>().unwrap_err();
//! let err = Error::from(parse);
//!
//! assert!(err.is::<std::num::ParseIntError>());
//! assert_eq!(err.message(), "invalid digit found in string");
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// The default error payload of an `Err` outcome.
///
/// `Error` deliberately does not implement `std::error::Error` itself, so
/// that every `std::error::Error` can convert into it through `From`. Use
/// [`Error::source`] or [`Error::chain`] to walk the cause chain.
#[derive(Clone)]
pub struct Error {
    message: String,
    context: Vec<String>,
    cause: Option<Cause>,
}

impl Error {
    /// Create an error from a plain message, with no cause.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoal::Error;
    ///
    /// let err = Error::msg("connection refused");
    /// assert_eq!(err.message(), "connection refused");
    /// assert!(err.source().is_none());
    /// ```
    pub fn msg(message: impl fmt::Display) -> Self {
        Error {
            message: message.to_string(),
            context: Vec::new(),
            cause: None,
        }
    }

    /// Create an error from a `std::error::Error`, keeping it as the cause.
    pub fn new<X>(error: X) -> Self
    where
        X: StdError + Send + Sync + 'static,
    {
        Error {
            message: error.to_string(),
            context: Vec::new(),
            cause: Some(Arc::new(error)),
        }
    }

    /// Add a context layer.
    ///
    /// Context messages are kept in the order they are added, from the
    /// innermost operation to the outermost.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoal::Error;
    ///
    /// let err = Error::msg("parse error")
    ///     .context("reading config file")
    ///     .context("initializing app");
    ///
    /// assert_eq!(err.context_trail(), &["reading config file", "initializing app"]);
    /// ```
    pub fn context(mut self, msg: impl Into<String>) -> Self {
        self.context.push(msg.into());
        self
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The context trail, innermost first.
    pub fn context_trail(&self) -> &[String] {
        &self.context
    }

    /// The direct cause of this error, if any.
    pub fn source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Iterate over the cause chain, starting with the direct cause.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoal::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    /// let err = Error::from(io);
    /// assert_eq!(err.chain().count(), 1);
    ///
    /// assert_eq!(Error::msg("no cause").chain().count(), 0);
    /// ```
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        let first = self
            .cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static));
        std::iter::successors(first, |&err| err.source())
    }

    /// Returns `true` if the direct cause is of type `X`.
    pub fn is<X: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<X>().is_some()
    }

    /// Downcast the direct cause to a concrete error type.
    pub fn downcast_ref<X: StdError + 'static>(&self) -> Option<&X> {
        self.cause.as_deref().and_then(|cause| cause.downcast_ref::<X>())
    }
}

impl<X> From<X> for Error
where
    X: StdError + Send + Sync + 'static,
{
    fn from(error: X) -> Self {
        Error::new(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        for ctx in &self.context {
            write!(f, "\n  -> {}", ctx)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Error");
        dbg.field("message", &self.message);
        if !self.context.is_empty() {
            dbg.field("context", &self.context);
        }
        if let Some(cause) = &self.cause {
            dbg.field("cause", cause);
        }
        dbg.finish()
    }
}

// Causes are not comparable; equality covers message and context only.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.context == other.context
    }
}

impl Eq for Error {}

/// A panic captured inside a user-supplied closure or future.
///
/// Combinators that run caller code on the `Ok` branch convert panics into
/// `Err(E::from(Panic))` rather than letting them unwind through the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panic {
    message: String,
}

impl Panic {
    /// Build a `Panic` from the payload returned by `catch_unwind`.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(msg) => *msg,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(msg) => (*msg).to_string(),
                Err(_) => "opaque panic payload".to_string(),
            },
        };
        Panic { message }
    }

    /// The panic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panicked: {}", self.message)
    }
}

impl StdError for Panic {}

/// Error returned by [`Outcome::get`](crate::Outcome::get) and
/// [`Outcome::into_value`](crate::Outcome::into_value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetError<E> {
    /// The `Ok` payload was already retrieved once.
    Consumed,
    /// The outcome was an `Err`; the original error is handed back.
    Failed(E),
}

impl<E> GetError<E> {
    /// Returns true if this is a consumption violation.
    pub fn is_consumed(&self) -> bool {
        matches!(self, GetError::Consumed)
    }

    /// The original error, if the outcome was an `Err`.
    pub fn into_failure(self) -> Option<E> {
        match self {
            GetError::Failed(e) => Some(e),
            GetError::Consumed => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for GetError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GetError::Consumed => write!(f, "mutable reference has already been consumed"),
            GetError::Failed(e) => write!(f, "{}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> StdError for GetError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_has_no_cause() {
        let err = Error::msg("base error");
        assert_eq!(err.message(), "base error");
        assert!(err.source().is_none());
        assert_eq!(err.context_trail(), &[] as &[String]);
    }

    #[test]
    fn test_context_accumulation() {
        let err = Error::msg("base error")
            .context(String::from("owned string"))
            .context("borrowed str");

        assert_eq!(err.context_trail(), &["owned string", "borrowed str"]);
    }

    #[test]
    fn test_display_format_with_context() {
        let err = Error::msg("file not found")
            .context("reading config")
            .context("initializing app");

        let output = format!("{}", err);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "file not found");
        assert_eq!(lines[1], "  -> reading config");
        assert_eq!(lines[2], "  -> initializing app");
    }

    #[test]
    fn test_from_std_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io.into();

        assert_eq!(err.message(), "file not found");
        assert!(err.is::<std::io::Error>());
        assert!(!err.is::<Panic>());
        assert_eq!(
            err.downcast_ref::<std::io::Error>().map(|e| e.kind()),
            Some(std::io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_chain_follows_nested_sources() {
        let inner = GetError::Failed(Error::msg("inner"));
        let err = Error::from(inner);
        assert_eq!(err.chain().count(), 1);
        assert_eq!(err.message(), "inner");
    }

    #[test]
    fn test_chain_walks_every_source() {
        #[derive(Debug)]
        struct Wrapped(std::io::Error);

        impl fmt::Display for Wrapped {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("wrapped")
            }
        }

        impl StdError for Wrapped {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let err = Error::from(Wrapped(std::io::Error::other("root")));
        let messages: Vec<String> = err.chain().map(ToString::to_string).collect();
        assert_eq!(messages, ["wrapped", "root"]);
    }

    #[test]
    fn test_eq_ignores_cause() {
        let a = Error::from(std::io::Error::other("boom"));
        let b = Error::msg("boom");
        assert_eq!(a, b);
        assert_ne!(a, b.context("more"));
    }

    #[test]
    fn test_clone_shares_cause() {
        let err = Error::from(std::io::Error::other("boom")).context("ctx");
        let cloned = err.clone();
        assert_eq!(err, cloned);
        assert!(cloned.is::<std::io::Error>());
    }

    #[test]
    fn test_panic_payloads() {
        let from_str = Panic::from_payload(Box::new("static message"));
        assert_eq!(from_str.message(), "static message");

        let from_string = Panic::from_payload(Box::new(String::from("owned message")));
        assert_eq!(from_string.message(), "owned message");

        let opaque = Panic::from_payload(Box::new(42u8));
        assert_eq!(opaque.message(), "opaque panic payload");
        assert_eq!(opaque.to_string(), "panicked: opaque panic payload");
    }

    #[test]
    fn test_get_error_display() {
        let consumed: GetError<Error> = GetError::Consumed;
        assert_eq!(
            consumed.to_string(),
            "mutable reference has already been consumed"
        );
        assert!(consumed.is_consumed());

        let failed = GetError::Failed(Error::msg("boom"));
        assert_eq!(failed.to_string(), "boom");
        assert_eq!(failed.into_failure(), Some(Error::msg("boom")));
    }
}
