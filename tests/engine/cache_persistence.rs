//! Cache behavior across engine instances and key strategies.

use crate::mock_server::MockServerFixture;
use openrouter_engine::cache::NullCache;
use openrouter_engine::{CacheKeyStrategy, GenerationParams};

#[test]
fn answers_survive_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_completion("persisted", 1);

    {
        let engine = fixture.builder(dir.path()).build().unwrap();
        assert_eq!(engine.call("remember me").unwrap(), "persisted");
    }

    let engine = fixture.builder(dir.path()).build().unwrap();
    assert_eq!(engine.call("remember me").unwrap(), "persisted");
    mock.assert();
}

#[test]
fn concatenated_key_reuses_answer_across_param_changes() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_completion("stale", 1);
    let engine = fixture.builder(dir.path()).build().unwrap();

    engine.call("p").unwrap();
    let again = engine
        .call_with("p", &GenerationParams::new().temperature(1.5))
        .unwrap();
    assert_eq!(again, "stale");
    mock.assert();
}

#[test]
fn namespaced_key_separates_param_changes() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_completion("fresh", 2);
    let engine = fixture
        .builder(dir.path())
        .cache_key_strategy(CacheKeyStrategy::Namespaced)
        .build()
        .unwrap();

    engine.call("p").unwrap();
    engine
        .call_with("p", &GenerationParams::new().temperature(1.5))
        .unwrap();
    engine.call("p").unwrap();
    mock.assert();
}

#[test]
fn clear_cache_forces_refetch() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_completion("again", 2);
    let engine = fixture.builder(dir.path()).build().unwrap();

    engine.call("p").unwrap();
    engine.clear_cache().unwrap();
    engine.call("p").unwrap();
    mock.assert();
}

#[test]
fn null_cache_always_calls_upstream() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_completion("uncached", 2);
    let engine = fixture
        .builder(dir.path())
        .cache_backend(Box::new(NullCache::new()))
        .build()
        .unwrap();

    engine.call("p").unwrap();
    engine.call("p").unwrap();
    mock.assert();
    assert!(engine.cache_path().is_none());
    assert_eq!(engine.cache_stats().misses, 2);
}
