//! Chat session domain.
//!
//! - [`state::SessionState`]: single-flight state machine of a chat panel

pub mod state;
