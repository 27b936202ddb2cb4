//! Configuration file loading for mex-assist
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MEX_`-prefixed environment variables (`MEX_ASSISTANT__ENDPOINT`, ...)
//! 2. `--config <path>` specified file
//! 3. Project root: `./mex.toml` or `./.mex.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/mex-assist/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAssistantConfig, FileAuthConfig, FileConfig, FileLoggingConfig,
    FileRoutesConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
