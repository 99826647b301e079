//! Executor tests for retry functionality.

use super::*;
use crate::{fail, nil, ok, Error, Outcome};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_retry_succeeds_on_third_attempt() {
    let attempts = Arc::new(AtomicU32::new(0));

    let out = retry(
        || {
            let attempts = attempts.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    fail("transient failure")
                } else {
                    ok("success")
                }
            }
        },
        RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(5),
    )
    .await;

    assert_eq!(out.into_option(), Some("success"));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_exhausted_returns_final_error() {
    let out = retry(
        || async { fail::<()>("always fails") },
        RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(3),
    )
    .await;

    let exhausted = out.error().cloned().expect("expected exhaustion");
    assert_eq!(exhausted.attempts, 4); // 1 initial + 3 retries
    assert_eq!(exhausted.final_error.message(), "always fails");
}

#[tokio::test]
async fn test_nil_is_not_retried() {
    let attempts = AtomicU32::new(0);

    let out = retry(
        || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            nil::<i32>()
        },
        RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(5),
    )
    .await;

    assert!(out.is_nil());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_if_skips_non_retryable_errors() {
    #[derive(Debug, PartialEq, Clone)]
    #[allow(dead_code)]
    enum TestError {
        Transient,
        Permanent,
    }

    let attempts = AtomicU32::new(0);

    let out = retry_if(
        || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Outcome::<(), _>::Err(TestError::Permanent)
        },
        RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(5),
        |err| matches!(err, TestError::Transient),
    )
    .await;

    assert_eq!(out, Outcome::Err(TestError::Permanent));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_if_retries_transient_errors() {
    #[derive(Debug, PartialEq, Clone)]
    enum TestError {
        Transient,
        #[allow(dead_code)]
        Permanent,
    }

    let attempts = AtomicU32::new(0);

    let out = retry_if(
        || async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Outcome::Err(TestError::Transient)
            } else {
                Outcome::present("success")
            }
        },
        RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(5),
        |err| matches!(err, TestError::Transient),
    )
    .await;

    assert_eq!(out.into_option(), Some("success"));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_with_hooks_calls_hook() {
    let attempts = AtomicU32::new(0);
    let hook_calls = AtomicU32::new(0);

    let out = retry_with_hooks(
        || async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                fail("transient")
            } else {
                ok("success")
            }
        },
        RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(5),
        |_event: &RetryEvent<'_, Error>| {
            hook_calls.fetch_add(1, Ordering::SeqCst);
        },
    )
    .await;

    assert!(out.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(hook_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_policy_without_budget_makes_single_attempt() {
    let attempts = AtomicU32::new(0);

    let out = retry(
        || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            fail::<u8>("nope")
        },
        RetryPolicy::constant(Duration::from_millis(1)),
    )
    .await;

    assert_eq!(out.error().map(|e| e.attempts), Some(1));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_forever_retries_until_success() {
    let attempts = AtomicU32::new(0);

    let out = retry(
        || async {
            if attempts.fetch_add(1, Ordering::SeqCst) < 6 {
                fail("not yet")
            } else {
                ok(attempts.load(Ordering::SeqCst))
            }
        },
        RetryPolicy::constant(Duration::from_millis(1)).forever(),
    )
    .await;

    assert_eq!(out.into_option(), Some(7));
}

#[tokio::test]
async fn test_retrying_nil_polls_until_present() {
    let attempts = AtomicU32::new(0);

    let out = retry(
        || async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                nil()
            } else {
                ok(n)
            }
        },
        RetryPolicy::constant(Duration::from_millis(1))
            .with_max_retries(5)
            .retrying_nil(),
    )
    .await;

    assert_eq!(out.into_option(), Some(2));
}

#[tokio::test]
async fn test_retrying_nil_gives_up_with_nil() {
    let attempts = AtomicU32::new(0);

    let out = retry(
        || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            nil::<u8>()
        },
        RetryPolicy::constant(Duration::from_millis(1))
            .with_max_retries(2)
            .retrying_nil(),
    )
    .await;

    assert!(out.is_nil());
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_nan_jitter_does_not_break_retry() {
    let attempts = AtomicU32::new(0);

    let out = retry(
        || async {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                fail("once")
            } else {
                ok("recovered")
            }
        },
        RetryPolicy::constant(Duration::from_millis(1))
            .with_max_retries(2)
            .with_jitter(f64::NAN),
    )
    .await;

    assert_eq!(out.into_option(), Some("recovered"));
}

#[tokio::test]
async fn test_exponential_backoff_timing() {
    use std::time::Instant;

    let start = Instant::now();
    let attempts = AtomicU32::new(0);

    let _ = retry(
        || async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 3 {
                fail("retry")
            } else {
                ok("done")
            }
        },
        RetryPolicy::exponential(Duration::from_millis(10)).with_max_retries(5),
    )
    .await;
    let elapsed = start.elapsed();

    // 10ms + 20ms + 40ms of backoff
    assert!(
        elapsed >= Duration::from_millis(50),
        "Expected at least 50ms, got {:?}",
        elapsed
    );
}

#[cfg(feature = "tracing")]
#[tokio::test]
#[tracing_test::traced_test]
async fn test_retry_emits_debug_events() {
    let _ = retry(
        || async { fail::<()>("down") },
        RetryPolicy::constant(Duration::from_millis(1)).with_max_retries(1),
    )
    .await;

    assert!(logs_contain("retrying after failed attempt"));
}
