//! Generate path over real HTTP against mockito.

use crate::mock_server::{MockServerFixture, COMPLETIONS_PATH};
use mockito::Matcher;
use openrouter_engine::client::config::{DEFAULT_SITE_NAME, DEFAULT_SITE_URL, DEFAULT_SYSTEM_PROMPT};
use openrouter_engine::{Error, GenerationParams};
use serde_json::json;

#[test]
fn two_plus_two_is_fetched_once_then_cached() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_completion("4", 1);
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture.builder(dir.path()).build().unwrap();

    assert_eq!(engine.call("2+2=").unwrap(), "4");
    assert_eq!(engine.call("2+2=").unwrap(), "4");

    mock.assert();
    let stats = engine.cache_stats();
    assert_eq!((stats.hits, stats.misses, stats.sets), (1, 1, 1));
}

#[test]
fn default_routing_headers_are_sent() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_with_headers(DEFAULT_SITE_URL, DEFAULT_SITE_NAME, "ok");
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture.builder(dir.path()).build().unwrap();

    assert_eq!(engine.call("hello").unwrap(), "ok");
    mock.assert();
}

#[test]
fn configured_routing_headers_are_sent() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_with_headers("https://optimizer.dev", "Prompt Optimizer", "ok");
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture
        .builder(dir.path())
        .site_url("https://optimizer.dev")
        .site_name("Prompt Optimizer")
        .build()
        .unwrap();

    assert_eq!(engine.call("hello").unwrap(), "ok");
    mock.assert();
}

#[test]
fn payload_carries_model_messages_and_merged_params() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", COMPLETIONS_PATH)
        .match_body(Matcher::Json(json!({
            "model": "deepseek/deepseek-r1",
            "messages": [
                {"role": "system", "content": "Grade strictly."},
                {"role": "user", "content": "Essay text"}
            ],
            "temperature": 0.0,
            "max_tokens": 256,
            "top_p": 1.0,
            "seed": 11
        })))
        .with_status(200)
        .with_body(crate::mock_server::completion_body("B+"))
        .expect(1)
        .create();
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture
        .builder(dir.path())
        .model("deepseek/deepseek-r1")
        .max_tokens(256)
        .build()
        .unwrap();

    let text = engine
        .generate(
            "Essay text",
            Some("Grade strictly."),
            &GenerationParams::new().temperature(0.0).param("seed", 11),
        )
        .unwrap();
    assert_eq!(text, "B+");
    mock.assert();
}

#[test]
fn default_system_prompt_used_without_override() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", COMPLETIONS_PATH)
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"role": "system", "content": DEFAULT_SYSTEM_PROMPT},
                {"role": "user", "content": "hi"}
            ]
        })))
        .with_status(200)
        .with_body(crate::mock_server::completion_body("hello"))
        .create();
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture.builder(dir.path()).build().unwrap();

    assert_eq!(engine.call("hi").unwrap(), "hello");
    mock.assert();
}

#[test]
fn usage_reported_on_miss_only() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_completion("x", 1);
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture.builder(dir.path()).build().unwrap();

    let miss = engine
        .generate_detailed("p", None, &GenerationParams::new())
        .unwrap();
    assert_eq!(miss.usage.map(|u| u.total_tokens), Some(11));
    assert_eq!(miss.attempts, 1);

    let hit = engine
        .generate_detailed("p", None, &GenerationParams::new())
        .unwrap();
    assert!(hit.cached);
    assert_eq!(hit.usage, None);
}

#[test]
fn server_errors_exhaust_after_five_attempts() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_error(500, r#"{"error":{"message":"boom"}}"#, 5);
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture.builder(dir.path()).build().unwrap();

    let err = engine.call("p").unwrap_err();
    mock.assert();

    match &err {
        Error::Generation {
            attempts,
            status,
            body,
            message,
        } => {
            assert_eq!(*attempts, 5);
            assert_eq!(*status, Some(500));
            assert_eq!(body.as_deref(), Some(r#"{"error":{"message":"boom"}}"#));
            assert!(message.contains("500 Internal Server Error"));
            assert!(message.contains("| Status: 500 | Response: "));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(engine.cache_stats().sets, 0);
}

#[test]
fn malformed_success_body_fails_without_retry() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", COMPLETIONS_PATH)
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant"}}]}"#)
        .expect(1)
        .create();
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture.builder(dir.path()).build().unwrap();

    let err = engine.call("p").unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
    mock.assert();
}

#[test]
fn unreachable_host_surfaces_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let engine = openrouter_engine::OpenRouterEngine::builder()
        .api_key("k")
        .base_url("http://127.0.0.1:1")
        .cache_dir(dir.path())
        .retry_policy(openrouter_engine::RetryPolicy::immediate(2))
        .build()
        .unwrap();

    let err = engine.call("p").unwrap_err();
    match err {
        Error::Generation {
            attempts, status, ..
        } => {
            assert_eq!(attempts, 2);
            assert_eq!(status, None);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_overrides_fall_back_to_defaults() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", COMPLETIONS_PATH)
        .match_header("http-referer", DEFAULT_SITE_URL)
        .match_header("x-title", DEFAULT_SITE_NAME)
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"role": "system", "content": "SYS"},
                {"role": "user", "content": "q"}
            ]
        })))
        .with_status(200)
        .with_body(crate::mock_server::completion_body("answer"))
        .expect(1)
        .create();
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture
        .builder(dir.path())
        .system_prompt("SYS")
        .site_url("")
        .site_name("")
        .build()
        .unwrap();

    let text = engine
        .generate("q", Some(""), &GenerationParams::new())
        .unwrap();
    assert_eq!(text, "answer");
    // Same fingerprint as no override at all.
    assert_eq!(engine.call("q").unwrap(), "answer");
    mock.assert();
}

#[test]
fn error_object_in_success_body_is_retried_then_reported() {
    let body = r#"{"error":{"code":429,"message":"Rate limit exceeded upstream"}}"#;
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_error(200, body, 5);
    let dir = tempfile::tempdir().unwrap();
    let engine = fixture.builder(dir.path()).build().unwrap();

    let err = engine.call("p").unwrap_err();
    mock.assert();

    match &err {
        Error::Generation {
            attempts,
            status,
            message,
            ..
        } => {
            assert_eq!(*attempts, 5);
            assert_eq!(*status, Some(429));
            assert!(message.contains("Rate limit exceeded upstream"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(engine.cache_stats().sets, 0);
}
