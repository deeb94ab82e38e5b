use crate::cache::{CacheBackend, CacheKeyStrategy, CacheManager, SqliteCache};
use crate::client::config::{self, EngineConfig, RoutingMetadata};
use crate::client::core::OpenRouterEngine;
use crate::protocol::GenerationParams;
use crate::resilience::RetryPolicy;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builder for [`OpenRouterEngine`].
///
/// Everything is optional except a credential, which comes from
/// [`api_key`](Self::api_key) or the `OPENROUTER_API_KEY` environment variable.
pub struct EngineBuilder {
    model: String,
    system_prompt: String,
    api_key: Option<String>,
    site_url: Option<String>,
    site_name: Option<String>,
    params: GenerationParams,
    base_url: String,
    timeout: Duration,
    app_name: String,
    cache_provider: String,
    cache_dir: Option<PathBuf>,
    cache: Option<Box<dyn CacheBackend>>,
    transport: Option<Arc<dyn Transport>>,
    retry: RetryPolicy,
    key_strategy: CacheKeyStrategy,
    env: EnvLookup,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            model: config::DEFAULT_MODEL.to_string(),
            system_prompt: config::DEFAULT_SYSTEM_PROMPT.to_string(),
            api_key: None,
            site_url: None,
            site_name: None,
            params: GenerationParams::new(),
            base_url: config::DEFAULT_BASE_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            app_name: config::DEFAULT_APP_NAME.to_string(),
            cache_provider: config::DEFAULT_CACHE_PROVIDER.to_string(),
            cache_dir: None,
            cache: None,
            transport: None,
            retry: RetryPolicy::default(),
            key_strategy: CacheKeyStrategy::default(),
            env: Arc::new(|name: &str| std::env::var(name).ok()),
        }
    }

    /// OpenRouter model id, e.g. `deepseek/deepseek-chat-v3-0324:free`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sent as `HTTP-Referer`. Empty means the default.
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    /// Sent as `X-Title`. Empty means the default.
    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.params.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.params.max_tokens = Some(max);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.params.top_p = Some(top_p);
        self
    }

    /// Default generation parameters layered over the built-in defaults.
    pub fn params(mut self, params: GenerationParams) -> Self {
        self.params = self.params.merged(&params);
        self
    }

    /// Override the API base URL (mock servers, self-hosted gateways).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-attempt HTTP timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory name under the platform cache dir.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Provider tag in the cache file name.
    pub fn cache_provider(mut self, provider: impl Into<String>) -> Self {
        self.cache_provider = provider.into();
        self
    }

    /// Directory holding the cache file, replacing `<platform cache dir>/<app_name>`.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Use this backend instead of the on-disk SQLite store.
    pub fn cache_backend(mut self, backend: Box<dyn CacheBackend>) -> Self {
        self.cache = Some(backend);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn cache_key_strategy(mut self, strategy: CacheKeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Replace the environment lookup used to find `OPENROUTER_API_KEY`.
    pub fn env_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env = Arc::new(lookup);
        self
    }

    /// Resolve the credential, open the cache, and assemble the engine.
    ///
    /// The credential is checked before the cache is touched, so a missing key
    /// never creates files on disk.
    pub fn build(self) -> Result<OpenRouterEngine> {
        let api_key = config::resolve_api_key(self.api_key.as_deref(), &*self.env)?;
        config::validate_base_url(&self.base_url)?;

        let defaults = GenerationParams::defaults().merged(&self.params);
        let routing = RoutingMetadata {
            site_url: self
                .site_url
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| config::DEFAULT_SITE_URL.to_string()),
            site_name: self
                .site_name
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| config::DEFAULT_SITE_NAME.to_string()),
        };
        let cfg = EngineConfig {
            model: self.model,
            system_prompt: self.system_prompt,
            api_key,
            routing,
            defaults,
            base_url: self.base_url,
            timeout: self.timeout,
        };

        let (backend, cache_path): (Box<dyn CacheBackend>, Option<PathBuf>) = match self.cache {
            Some(backend) => (backend, None),
            None => {
                let dir = self
                    .cache_dir
                    .unwrap_or_else(|| config::app_cache_dir(&self.app_name));
                let path = config::cache_path(&dir, &self.cache_provider, &cfg.model);
                (Box::new(SqliteCache::open(&path)?), Some(path))
            }
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new()?),
        };

        debug!(
            model = %cfg.model,
            cache = backend.name(),
            max_attempts = self.retry.max_attempts,
            "engine ready"
        );

        Ok(OpenRouterEngine {
            config: cfg,
            cache: CacheManager::new(backend),
            cache_path,
            transport,
            retry: self.retry,
            key_strategy: self.key_strategy,
        })
    }
}
