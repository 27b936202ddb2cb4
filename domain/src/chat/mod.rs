//! Conversation domain.
//!
//! - [`message::Message`]: a single turn, user or assistant
//! - [`history::ConversationHistory`]: the ordered, versioned log of turns
//! - [`exchange`]: request/reply bodies exchanged with the assistant service

pub mod exchange;
pub mod history;
pub mod message;
