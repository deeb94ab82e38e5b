use crate::cache::{CacheKeyStrategy, CacheManager, CacheStats};
use crate::client::config::EngineConfig;
use crate::protocol::{ChatCompletionRequest, ChatCompletionResponse, Completion, GenerationParams, Usage};
use crate::resilience::RetryPolicy;
use crate::transport::{HttpRequest, Transport};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Chat-completion engine that talks to OpenRouter, caching every answer.
///
/// Calls are synchronous: a cache miss blocks the calling thread through every
/// HTTP attempt and backoff wait.
pub struct OpenRouterEngine {
    pub(crate) config: EngineConfig,
    pub(crate) cache: CacheManager,
    pub(crate) cache_path: Option<PathBuf>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) retry: RetryPolicy,
    pub(crate) key_strategy: CacheKeyStrategy,
}

/// Result of one [`OpenRouterEngine::generate_detailed`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    /// Served from the cache without any network call.
    pub cached: bool,
    /// HTTP attempts made; 0 on a cache hit.
    pub attempts: u32,
    pub usage: Option<Usage>,
}

impl OpenRouterEngine {
    pub fn builder() -> crate::client::builder::EngineBuilder {
        crate::client::builder::EngineBuilder::new()
    }

    /// Engine with all defaults and the key from `OPENROUTER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// On-disk cache file, when the default SQLite store is in use.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }

    /// Generate a completion for `prompt`.
    ///
    /// `system_prompt` overrides the configured one for this call (an empty
    /// override counts as none); `params` override the configured generation
    /// parameters key by key.
    pub fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String> {
        self.generate_detailed(prompt, system_prompt, params)
            .map(|g| g.text)
    }

    /// `generate(prompt, None, &GenerationParams::default())`.
    pub fn call(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, None, &GenerationParams::default())
    }

    /// `generate(prompt, None, params)`.
    pub fn call_with(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        self.generate(prompt, None, params)
    }

    pub fn generate_detailed(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
    ) -> Result<Generation> {
        let system_prompt = system_prompt
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.config.system_prompt);
        let params = self.config.defaults.merged(params);
        let key = self
            .key_strategy
            .key(&self.config.model, &params, system_prompt, prompt);

        if let Some(text) = self.cache.lookup(&key) {
            return Ok(Generation {
                text,
                cached: true,
                attempts: 0,
                usage: None,
            });
        }

        let request_id = Uuid::new_v4().to_string();
        let payload =
            ChatCompletionRequest::new(&self.config.model, system_prompt, prompt, params);
        let request = HttpRequest {
            url: self.config.endpoint(),
            headers: self.config.headers(&request_id),
            body: payload.to_json()?,
            timeout: self.config.timeout,
        };

        let (completion, attempts) = self
            .retry
            .run(|attempt| self.attempt_once(&request, &request_id, attempt))?;

        self.cache.store(&key, &completion.text);
        Ok(Generation {
            text: completion.text,
            cached: false,
            attempts,
            usage: completion.usage,
        })
    }

    /// One HTTP round trip; no retry.
    fn attempt_once(&self, request: &HttpRequest, request_id: &str, attempt: u32) -> Result<Completion> {
        let start = std::time::Instant::now();
        let resp = self.transport.post_json(request).map_err(Error::Transport)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            request_id,
            attempt,
            model = %self.config.model,
            status = resp.status,
            elapsed_ms,
            "chat completion response"
        );

        if !resp.is_success() {
            let reason = reqwest::StatusCode::from_u16(resp.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown Status");
            return Err(Error::Remote {
                status: resp.status,
                message: format!("{} {} for url: {}", resp.status, reason, request.url),
                body: resp.body,
            });
        }

        let completion = ChatCompletionResponse::parse(resp.status, &resp.body)?;
        debug!(request_id, chars = completion.text.len(), "completion extracted");
        Ok(completion)
    }
}

impl std::fmt::Debug for OpenRouterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterEngine")
            .field("config", &self.config)
            .field("cache", &self.cache.backend_name())
            .field("cache_path", &self.cache_path)
            .field("retry", &self.retry)
            .field("key_strategy", &self.key_strategy)
            .finish()
    }
}

impl crate::client::engine::Engine for OpenRouterEngine {
    fn model_name(&self) -> &str {
        self.model()
    }

    fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String> {
        OpenRouterEngine::generate(self, prompt, system_prompt, params)
    }
}
