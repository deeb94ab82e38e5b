//! Attempt counting with a scripted transport.

use crate::mock_server::ScriptedTransport;
use openrouter_engine::cache::MemoryCache;
use openrouter_engine::resilience::retry::DEFAULT_MAX_ATTEMPTS;
use openrouter_engine::resilience::{Backoff, ConstantBackoff};
use openrouter_engine::{Error, OpenRouterEngine, RetryPolicy};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn engine_with(transport: Arc<ScriptedTransport>, policy: RetryPolicy) -> OpenRouterEngine {
    OpenRouterEngine::builder()
        .api_key("k")
        .cache_backend(Box::new(MemoryCache::new()))
        .transport(transport)
        .retry_policy(policy)
        .build()
        .unwrap()
}

#[test]
fn recovers_after_fewer_than_five_failures() {
    for failures in 0..5 {
        let transport = ScriptedTransport::flaky(failures, "recovered");
        let engine = engine_with(transport.clone(), RetryPolicy::immediate(5));

        let generation = engine
            .generate_detailed("p", None, &Default::default())
            .unwrap();
        assert_eq!(generation.text, "recovered");
        assert_eq!(generation.attempts as usize, failures + 1);
        assert_eq!(transport.calls(), failures + 1, "failures = {failures}");
    }
}

#[test]
fn five_failures_exhaust_the_budget() {
    let transport = ScriptedTransport::flaky(5, "too late");
    let engine = engine_with(transport.clone(), RetryPolicy::immediate(5));

    let err = engine.call("p").unwrap_err();
    assert_eq!(transport.calls(), 5);
    assert!(err.to_string().contains("connection reset #5"));
}

#[test]
fn always_failing_transport_reports_underlying_error() {
    let transport = ScriptedTransport::down();
    let engine = engine_with(transport.clone(), RetryPolicy::immediate(DEFAULT_MAX_ATTEMPTS));

    let err = engine.call("p").unwrap_err();
    assert_eq!(transport.calls(), 5);
    match err {
        Error::Generation { attempts, message, .. } => {
            assert_eq!(attempts, 5);
            assert!(message.contains("upstream unreachable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn cached_prompt_does_not_retry_or_call() {
    let transport = ScriptedTransport::flaky(0, "first");
    let engine = engine_with(transport.clone(), RetryPolicy::immediate(5));
    engine.call("p").unwrap();
    engine.call("p").unwrap();
    engine.call("p").unwrap();
    assert_eq!(transport.calls(), 1);
}

struct Recording(Mutex<Vec<u32>>);

impl Backoff for Recording {
    fn delay(&self, attempt: u32) -> Duration {
        self.0.lock().unwrap().push(attempt);
        Duration::ZERO
    }
}

#[test]
fn backoff_policy_is_consulted_between_attempts() {
    let recording = Arc::new(Recording(Mutex::new(Vec::new())));
    let transport = ScriptedTransport::flaky(3, "ok");
    let engine = engine_with(transport, RetryPolicy::new(5, recording.clone()));

    engine.call("p").unwrap();
    assert_eq!(*recording.0.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn constant_backoff_waits_between_attempts() {
    let transport = ScriptedTransport::flaky(2, "ok");
    let engine = engine_with(
        transport,
        RetryPolicy::new(5, Arc::new(ConstantBackoff(Duration::from_millis(20)))),
    );

    let start = std::time::Instant::now();
    engine.call("p").unwrap();
    assert!(start.elapsed() >= Duration::from_millis(40));
}
