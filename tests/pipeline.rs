//! Integration test: pipelines built from the public API only.
//!
//! Sources feed parsing flows, decorated with retry and recovery, drained
//! into collecting sinks; retry instances come from a config file.

use std::io::Write;
use std::num::ParseFloatError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use flowline::config;
use flowline::{
    identity, source, Flow, FlowError, FlowResult, Mixable, RecoverStrategy, Retry, RetryPolicy,
    RetryRegistry, SharedFlow, Source,
};

fn parse_f64(s: String) -> FlowResult<f64> {
    s.parse::<f64>().map_err(FlowError::stage)
}

fn collect<T>(into: &Mutex<Vec<T>>) -> impl Fn(T) -> FlowResult<()> + '_ {
    move |v| {
        into.lock().unwrap().push(v);
        Ok(())
    }
}

#[test]
fn source_via_parse_to_sink() {
    let out = Mutex::new(Vec::new());
    source("123456.654321".to_string())
        .via(parse_f64)
        .to(collect(&out))
        .unwrap();
    assert_eq!(*out.lock().unwrap(), [123456.654321]);
}

#[test]
fn identity_in_the_middle_changes_nothing() {
    let out = Mutex::new(Vec::new());
    source("123456.654321".to_string())
        .via(identity())
        .to(collect(&out))
        .unwrap();
    assert_eq!(*out.lock().unwrap(), ["123456.654321"]);
}

#[test]
fn retry_then_recover_with_typed_fallbacks() {
    let attempts = AtomicU32::new(0);
    let always_bad = |_: ()| -> FlowResult<String> {
        attempts.fetch_add(1, Ordering::SeqCst);
        Ok("not-a-number".to_string())
    };

    let strategy: RecoverStrategy<SharedFlow<(), f64>> = RecoverStrategy::new()
        .on::<ParseFloatError>(source(-1.0).shared())
        .on_when(|_| true, source(0.0).shared());

    let retry = Retry::new("parse", RetryPolicy::fixed(3, Duration::ZERO));
    let pipeline = always_bad
        .via(parse_f64)
        .with_retry(retry.clone())
        .with_recover(move |e| strategy.apply(e));

    let out = Mutex::new(Vec::new());
    pipeline.to(collect(&out)).unwrap();
    assert_eq!(*out.lock().unwrap(), [-1.0]);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(retry.metrics().snapshot().failed_with_retry, 1);
}

#[test]
fn mixed_sources_feed_a_pipeline() {
    let area = |pi: String, r: f64| -> FlowResult<f64> { Ok(parse_f64(pi)? * r * r) };
    let mixed = area
        .mix(source(std::f64::consts::PI.to_string()), source(2.0))
        .unwrap();
    let out = Mutex::new(Vec::new());
    mixed
        .via(|a: f64| -> FlowResult<i64> { Ok(a.round() as i64) })
        .to(collect(&out))
        .unwrap();
    assert_eq!(*out.lock().unwrap(), [13]);
}

#[test]
fn registry_from_config_file_drives_retries() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [retry]
        max_attempts = 1

        [retry.instances.flaky]
        max_attempts = 4
        wait_millis = 0
        "#
    )
    .unwrap();
    let cfg = config::load_from(file.path()).unwrap();
    let registry = RetryRegistry::from_config(&cfg).unwrap();

    let calls = AtomicU32::new(0);
    let flaky = |_: ()| -> FlowResult<u32> {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n < 4 {
            Err(FlowError::stage("transient"))
        } else {
            Ok(n)
        }
    };
    assert_eq!(flaky.with_retry(registry.retry("flaky")).apply(()).unwrap(), 4);

    calls.store(0, Ordering::SeqCst);
    let err = flaky
        .with_retry(registry.retry("strict"))
        .apply(())
        .unwrap_err();
    assert_eq!(err.to_string(), "transient");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
