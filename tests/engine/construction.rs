//! Construction-time behavior: credentials and cache placement.

use crate::mock_server::ScriptedTransport;
use openrouter_engine::client::config::cache_file_name;
use openrouter_engine::{Error, OpenRouterEngine};

#[test]
fn missing_credential_fails_before_cache_or_network() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("textgrad");
    let transport = ScriptedTransport::down();

    let err = OpenRouterEngine::builder()
        .env_lookup(|_| None)
        .cache_dir(&cache_dir)
        .transport(transport.clone())
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    assert!(!cache_dir.exists());
    assert_eq!(transport.calls(), 0);
}

#[test]
fn credential_from_injected_environment() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::flaky(0, "ok");
    let engine = OpenRouterEngine::builder()
        .env_lookup(|name| (name == "OPENROUTER_API_KEY").then(|| "sk-or-env".to_string()))
        .cache_dir(dir.path())
        .transport(transport.clone())
        .build()
        .unwrap();

    engine.call("p").unwrap();
    let requests = transport.requests();
    assert_eq!(requests[0].header("authorization"), Some("Bearer sk-or-env"));
}

#[test]
fn cache_file_scoped_by_model() {
    let dir = tempfile::tempdir().unwrap();
    let a = OpenRouterEngine::builder()
        .api_key("k")
        .model("deepseek/deepseek-chat")
        .cache_dir(dir.path())
        .build()
        .unwrap();
    let b = OpenRouterEngine::builder()
        .api_key("k")
        .model("deepseek/deepseek-r1")
        .cache_dir(dir.path())
        .build()
        .unwrap();

    assert_ne!(a.cache_path(), b.cache_path());
    assert_eq!(
        a.cache_path().and_then(|p| p.file_name()).and_then(|n| n.to_str()),
        Some(cache_file_name("deepseek", "deepseek/deepseek-chat").as_str())
    );
    assert!(a.cache_path().map(|p| p.exists()).unwrap_or(false));
}
