//! # openrouter-engine
//!
//! 通过 OpenRouter 调用远程大模型聊天接口的引擎，带本地响应缓存与失败重试。
//!
//! Chat-completion engine for prompt-optimization frameworks: one call turns a
//! prompt into generated text through OpenRouter, with a persistent local
//! response cache and bounded retry with randomized exponential backoff.
//!
//! ## Overview
//!
//! - **Cache first**: a prompt already answered is served from the on-disk
//!   cache with no network call
//! - **Bounded retry**: transport failures and non-2xx responses are retried up
//!   to 5 times, waiting 1 to 5 seconds in between
//! - **Synchronous**: the caller's thread blocks for the whole call
//! - **Injectable seams**: cache backend, HTTP transport, retry policy and
//!   environment lookup can all be swapped, which keeps tests deterministic
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openrouter_engine::{GenerationParams, OpenRouterEngine};
//!
//! fn main() -> openrouter_engine::Result<()> {
//!     let engine = OpenRouterEngine::builder()
//!         .api_key("sk-or-...")
//!         .site_name("My Optimizer")
//!         .build()?;
//!
//!     let answer = engine.call("2+2=")?;
//!     let terse = engine.generate(
//!         "Name a prime.",
//!         Some("Answer with one word."),
//!         &GenerationParams::new().temperature(0.0),
//!     )?;
//!     println!("{answer} {terse}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Engine, builder, configuration, and the [`Engine`] trait |
//! | [`cache`] | Response cache backends and key strategies |
//! | [`protocol`] | Chat-completion request/response wire format |
//! | [`resilience`] | Retry policy and backoff |
//! | [`transport`] | HTTP transport seam |
//! | [`types`] | Chat message types |

pub mod cache;
pub mod client;
pub mod protocol;
pub mod resilience;
pub mod transport;
pub mod types;

pub use cache::{CacheBackend, CacheKeyStrategy, CacheStats};
pub use client::{Engine, EngineBuilder, EngineConfig, Generation, OpenRouterEngine};
pub use protocol::GenerationParams;
pub use resilience::RetryPolicy;
pub use types::{Message, MessageRole};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
