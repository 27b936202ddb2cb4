//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing keys fall back to defaults.
//!
//! ```toml
//! [assistant]
//! endpoint = "http://localhost:9000/api/chat"
//! timeout_seconds = 60
//!
//! [session]
//! greeting = ""                 # empty: start with an empty conversation
//! fallback_message = "Sorry, I couldn't connect. Please try again."
//!
//! [routes]
//! customers = "/customers"
//!
//! [auth]
//! token = "..."
//!
//! [logging]
//! conversation_log = "~/.local/share/mex-assist/chat.jsonl"
//! ```

use mex_application::SessionConfig;
use mex_application::config::session_config::{DEFAULT_FALLBACK_MESSAGE, DEFAULT_GREETING};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("assistant.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("assistant.endpoint must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),

    #[error("session.fallback_message cannot be empty")]
    EmptyFallbackMessage,

    #[error("routes.{name} must start with '/', got '{value}'")]
    InvalidRoute { name: &'static str, value: String },
}

/// Raw assistant service configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssistantConfig {
    /// Chat endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileAssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9000/api/chat".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl FileAssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Raw chat session configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Greeting seeded on mount; empty disables seeding
    pub greeting: String,
    /// Apology shown when a request fails
    pub fallback_message: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Raw dashboard routes from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutesConfig {
    /// Customers view, target of `show_customers`
    pub customers: String,
}

impl Default for FileRoutesConfig {
    fn default() -> Self {
        Self {
            customers: "/customers".to_string(),
        }
    }
}

/// Raw auth configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuthConfig {
    /// Already-issued bearer token
    pub token: Option<String>,
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Path of the JSONL chat transcript
    pub conversation_log: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub assistant: FileAssistantConfig,
    pub session: FileSessionConfig,
    pub routes: FileRoutesConfig,
    pub auth: FileAuthConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.assistant.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        let endpoint = self.assistant.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidEndpoint(endpoint.to_string()));
        }

        if self.session.fallback_message.trim().is_empty() {
            return Err(ConfigValidationError::EmptyFallbackMessage);
        }

        if !self.routes.customers.starts_with('/') {
            return Err(ConfigValidationError::InvalidRoute {
                name: "customers",
                value: self.routes.customers.clone(),
            });
        }

        Ok(())
    }

    /// Session settings for the chat controller
    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::default().with_fallback_message(&self.session.fallback_message);
        if self.session.greeting.trim().is_empty() {
            config.without_greeting()
        } else {
            config.with_greeting(&self.session.greeting)
        }
    }
}
