//! 类型模块：聊天消息的核心数据类型。
//!
//! # Types Module
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role and text content |
//! | [`MessageRole`] | Message role (system, user, assistant) |
//!
//! ```rust
//! use openrouter_engine::types::{Message, MessageRole};
//!
//! let system = Message::system("You are a helpful assistant");
//! assert_eq!(system.role, MessageRole::System);
//! ```

pub mod message;

pub use message::{Message, MessageRole};
