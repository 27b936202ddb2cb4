//! Interactive chat module
//!
//! Provides a readline-based stand-in for the dashboard's assistant panel.

mod cursor;
mod repl;

pub use cursor::TranscriptCursor;
pub use repl::ChatRepl;
