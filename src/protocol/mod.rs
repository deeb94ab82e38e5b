//! 协议层：OpenAI 兼容的聊天补全请求与响应格式。
//!
//! # Protocol Layer
//!
//! Wire format for the OpenAI-compatible `chat/completions` endpoint that
//! OpenRouter exposes.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`request`] | Request payload and [`GenerationParams`] merging |
//! | [`response`] | Response parsing and completion-text extraction |

pub mod request;
pub mod response;

pub use request::{ChatCompletionRequest, GenerationParams};
pub use response::{ChatCompletionResponse, Completion, Usage};
