//! Infrastructure layer for mex-assist
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAssistantConfig, FileAuthConfig, FileConfig,
    FileLoggingConfig, FileRoutesConfig, FileSessionConfig,
};
pub use http::HttpAssistantTransport;
pub use logging::JsonlConversationLogger;
