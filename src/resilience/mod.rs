//! 弹性模块：有界重试与随机指数退避。
//!
//! # Resilience Module
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RetryPolicy`] | Attempt budget plus a [`Backoff`] |
//! | [`RandomExponentialBackoff`] | Default randomized exponential wait (1s to 5s) |
//! | [`ConstantBackoff`] | Fixed wait, handy for deterministic tests |
//!
//! ```rust
//! use openrouter_engine::resilience::RetryPolicy;
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.max_attempts, 5);
//!
//! let (value, attempts) = RetryPolicy::immediate(3).run(|_| Ok::<_, openrouter_engine::Error>(42))?;
//! assert_eq!((value, attempts), (42, 1));
//! # Ok::<(), openrouter_engine::Error>(())
//! ```

pub mod retry;

pub use retry::{Backoff, ConstantBackoff, RandomExponentialBackoff, RetryPolicy};
