//! End-to-end pipelines exercising the public API.

use shoal::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn describe(out: Outcome<i32>) -> Option<String> {
    out.match_with(|h| {
        h.ok(|v| v.to_string())
            .nil(|| "none".to_string())
            .err(|e| e.message().to_string())
    })
}

#[test]
fn test_map_then_filter_keeps_value() {
    let out = ok(5).map(|x| x * 2).filter(|x| *x > 5);
    assert_eq!(describe(out), Some("10".to_string()));
}

#[test]
fn test_map_then_filter_drops_value() {
    let out = ok(5).map(|x| x * 2).filter(|x| *x > 100);
    assert_eq!(describe(out), Some("none".to_string()));
}

#[test]
fn test_invalid_json_fails() {
    let parsed = result(|| serde_json::from_str::<serde_json::Value>("invalid json"));
    let shown = parsed.match_with(|h| h.ok(|v| v.to_string()).err(|_| "failed".to_string()));
    assert_eq!(shown, Some("failed".to_string()));
}

#[test]
fn test_valid_json_parses() {
    let parsed = result(|| serde_json::from_str::<HashMap<String, i32>>(r#"{"a": 1}"#));
    assert_eq!(parsed.map(|m| m["a"]).into_option(), Some(1));
}

#[tokio::test]
async fn test_flow_resolves_to_21() {
    let out = flow(
        10,
        vec![Step::sync(|x: i32| ok(x * 2)), Step::sync(|x: i32| ok(x + 1))],
    )
    .await;
    assert_eq!(out.into_option(), Some(21));
}

#[tokio::test]
async fn test_flow_step_panic_stops_pipeline() {
    let later_ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&later_ran);

    let out = flow(
        1,
        vec![
            Step::sync(|x: i32| ok(x + 1)),
            Step::sync(|_: i32| -> Outcome<i32> { panic!("step 2 failed") }),
            Step::sync(move |x: i32| {
                flag.store(true, Ordering::SeqCst);
                ok(x)
            }),
        ],
    )
    .await;

    assert_eq!(
        out.error().map(Error::message),
        Some("panicked: step 2 failed")
    );
    assert!(!later_ran.load(Ordering::SeqCst));
}

#[test]
fn test_ok_payload_is_isolated_from_caller() {
    let original = Rc::new(RefCell::new(HashMap::from([("a", 1)])));

    let mutated = ok(Rc::clone(&original)).map(|o| {
        o.borrow_mut().insert("a", 2);
        o
    });

    assert_eq!(original.borrow()["a"], 1);
    let after = mutated.into_option().map(|o| {
        let a = o.borrow()["a"];
        a
    });
    assert_eq!(after, Some(2));
}

#[test]
fn test_filter_on_err_matches_nil_branch() {
    let out = fail::<i32>("x").filter(|_| true);
    assert_eq!(describe(out), Some("none".to_string()));
}

#[test]
fn test_get_twice_reports_consumption() {
    let value = ok(10);
    assert!(!value.is_gone());
    assert_eq!(value.get(), Ok(Some(10)));
    assert!(value.is_gone());

    let second = value.get().expect_err("second get must fail");
    assert!(second.is_consumed());
    assert_eq!(second.to_string(), "mutable reference has already been consumed");
}

#[test]
fn test_get_on_err_hands_back_error() {
    let failed = fail::<i32>("original");
    let returned = failed.get().expect_err("err");
    assert_eq!(returned.into_failure().map(|e| e.message().to_string()), Some("original".to_string()));
}

#[test]
fn test_log_in_pipeline() {
    let lines = RefCell::new(Vec::new());
    let out = ok(3).map(|x| shoal::log_to(x, |m: &dyn std::fmt::Display| lines.borrow_mut().push(m.to_string())));

    assert_eq!(out.into_option(), Some(3));
    assert_eq!(lines.into_inner(), vec!["3".to_string()]);
}
