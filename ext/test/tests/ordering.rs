//! Evaluation-order tests driven by call-recording probes.
//!
//! These pin the head-first contract: whichever way a chain is grouped,
//! arms are consulted in declaration order and only the winning handler runs.

use typematcher_test::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("boom")]
struct Boom;

/// Five arms; only the last accepts `5`.
fn five_arms(log: &CallLog) -> Vec<Case<i64, usize>> {
    (0..5)
        .map(|i| {
            let target = i as i64 + 1;
            case_when(
                log.guard(&i.to_string(), move |v: &i64| *v == target),
                log.handler(&i.to_string(), move |_: &i64| i),
            )
        })
        .collect()
}

fn expected_probe_log() -> Vec<String> {
    let mut calls: Vec<String> = (0..5).map(|i| format!("guard:{i}")).collect();
    calls.push("handler:4".to_owned());
    calls
}

#[test]
fn test_fluent_chain_consults_in_order() {
    let log = CallLog::new();
    let arms = five_arms(&log);
    let case = arms
        .into_iter()
        .reduce(Case::or)
        .expect("five arms");

    assert_eq!(case.evaluate(&5).unwrap(), 4);
    assert_eq!(log.calls(), expected_probe_log());
}

#[test]
fn test_right_nested_chain_consults_in_order() {
    let log = CallLog::new();
    let arms = five_arms(&log);
    let case = arms
        .into_iter()
        .rev()
        .reduce(|tail, head| head.or(tail))
        .expect("five arms");

    assert_eq!(case.evaluate(&5).unwrap(), 4);
    assert_eq!(log.calls(), expected_probe_log());
}

#[test]
fn test_against_consults_in_argument_order() {
    let log = CallLog::new();
    let arms = five_arms(&log);
    let refs: Vec<&Case<i64, usize>> = arms.iter().collect();

    assert_eq!(match_on(&5).against(refs).unwrap(), 4);
    assert_eq!(log.calls(), expected_probe_log());
}

#[test]
fn test_match_with_probes_each_call() {
    let log = CallLog::new();
    let case = five_arms(&log).into_iter().reduce(Case::or).expect("five arms");
    let f = match_with(case);

    assert_eq!(f(&1).unwrap(), 0);
    assert_eq!(log.calls(), ["guard:0", "handler:0"]);

    log.clear();
    assert!(f(&9).unwrap_err().is_no_match());
    assert_eq!(log.count("handler:0"), 0);
    assert_eq!(log.calls().len(), 5);
}

#[test]
fn test_handler_after_match_never_consults_later_guards() {
    let log = CallLog::new();
    let case = case_when(log.guard("any", is_any()), log.handler("any", |_: &Value| 0))
        .case_when(log.guard("string", is_string()), log.handler("string", |_: &Value| 1));

    assert_eq!(case.evaluate(&Value::from("s")).unwrap(), 0);
    assert_eq!(log.calls(), ["guard:any", "handler:any"]);
}

#[test]
fn test_throw_not_raised_until_reached() {
    let log = CallLog::new();
    let case = case_when(log.guard("pos", |v: &i64| *v > 0), |v: &i64| *v).case_throw(Boom);

    assert_eq!(case.evaluate(&3).unwrap(), 3);
    let err = case.evaluate(&-3).unwrap_err();
    assert!(err.downcast_ref::<Boom>().is_some());
    assert_eq!(log.count("guard:pos"), 2);
}

#[test]
fn test_fail_with_stops_chain() {
    let log = CallLog::new();
    let case = case_id(log.guard(
        "title",
        has_fields([("title", shared(fail_with("bad title", is_string())))]),
    ))
    .case_when(log.guard("rest", is_any()), |_: &Value| Value::Null);

    let err = case
        .evaluate(&Value::object([("title", Value::from(1))]))
        .unwrap_err();
    assert_eq!(err.to_string(), "bad title");
    assert_eq!(log.calls(), ["guard:title"]);
}

#[test]
fn test_trace_matches_probe_log() {
    let log = CallLog::new();
    let case = five_arms(&log).into_iter().reduce(Case::or).expect("five arms");
    let trace = case.evaluate_with_trace(&3);

    assert_eq!(trace.matched_index(), Some(2));
    assert_eq!(trace.steps.len(), 3);
    let guards: Vec<&str> = trace.steps.iter().map(|s| s.guard.as_str()).collect();
    assert_eq!(guards, ["guard:0", "guard:1", "guard:2"]);
    assert_eq!(log.count("handler:2"), 1);
}
