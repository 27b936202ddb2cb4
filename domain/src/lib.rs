//! Domain layer for mex-assist
//!
//! This crate contains the conversation entities, server directives and the
//! session state machine. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A [`ConversationHistory`] is an append-only, versioned log of
//! [`Message`]s. Requests to the assistant carry a snapshot of it as context.
//!
//! ## Directives
//!
//! The assistant may attach one [`ActionDirective`] to a reply. It names a
//! client-side effect (navigation, modal activation) and carries primitive
//! arguments.
//!
//! ## Single-flight session
//!
//! [`SessionState`] tracks whether a request is outstanding
//! (`Idle` / `AwaitingResponse`) and fences stale replies by generation.

pub mod chat;
pub mod directive;
pub mod navigation;
pub mod session;

// Re-export commonly used types
pub use chat::{
    exchange::{ChatReply, ChatRequest},
    history::ConversationHistory,
    message::{Message, Sender},
};
pub use directive::{
    entities::{ActionDirective, ArgValue, DirectiveArgs},
    names::{DAYS_AGO_ARG, SEND_EMAILS, SHOW_CUSTOMERS},
};
pub use navigation::NavigationTarget;
pub use session::state::{Rejection, RequestTicket, SessionPhase, SessionState};
