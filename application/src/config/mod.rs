//! Application-level configuration.
//!
//! - [`SessionConfig`]: greeting and fallback text used by the chat session

pub mod session_config;

pub use session_config::SessionConfig;
