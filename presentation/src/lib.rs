//! Presentation layer for mex-assist
//!
//! This crate contains CLI definitions, the console stand-ins for the
//! dashboard's router and modal, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod collaborators;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatRepl, TranscriptCursor};
pub use cli::commands::Cli;
pub use collaborators::{ConsoleEffects, ConsoleModal, ConsoleNavigator};
pub use output::console::ConsoleFormatter;
