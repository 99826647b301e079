use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// The last error of a retry run whose budget ran out.
///
/// ```rust
/// use shoal::retry::{retry, RetryPolicy};
/// use shoal::fail;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let policy = RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(2);
/// let out = retry(|| async { fail::<()>("still down") }, policy).await;
///
/// let exhausted = out.error().expect("budget spent");
/// assert_eq!(exhausted.attempts, 3);
/// assert_eq!(exhausted.final_error.message(), "still down");
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// What the final attempt failed with.
    pub final_error: E,
    /// Attempts made, the first one included.
    pub attempts: u32,
    /// Wall time from the first attempt until giving up.
    pub total_duration: Duration,
}

impl<E> RetryExhausted<E> {
    pub(crate) fn new(final_error: E, attempts: u32, total_duration: Duration) -> Self {
        RetryExhausted {
            final_error,
            attempts,
            total_duration,
        }
    }

    /// Drop the bookkeeping and keep the error.
    pub fn into_error(self) -> E {
        self.final_error
    }
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts in {:?}: {}",
            self.attempts, self.total_duration, self.final_error
        )
    }
}

impl<E: StdError + 'static> StdError for RetryExhausted<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.final_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_attempts_and_cause() {
        let exhausted = RetryExhausted::new("refused", 4, Duration::from_millis(30));
        assert_eq!(exhausted.to_string(), "gave up after 4 attempts in 30ms: refused");
    }

    #[test]
    fn test_source_is_final_error() {
        let exhausted = RetryExhausted::new(std::io::Error::other("disk"), 2, Duration::ZERO);
        assert_eq!(exhausted.source().map(ToString::to_string), Some("disk".to_string()));
        assert_eq!(exhausted.into_error().to_string(), "disk");
    }
}
