//! 客户端模块：带缓存与重试的 OpenRouter 聊天补全引擎。
//!
//! Engine construction and the generate path.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;

pub use self::builder::EngineBuilder;
pub use self::config::{EngineConfig, RoutingMetadata};
pub use self::core::{Generation, OpenRouterEngine};
pub use self::engine::Engine;
