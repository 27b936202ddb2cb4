//! Port for the structured chat transcript.
//!
//! [`ConversationLogger`] records what crossed the wire and what the session
//! did with it. It complements `tracing`: tracing carries human-readable
//! diagnostics, this port carries a machine-readable transcript (JSONL).

use mex_domain::{ActionDirective, ChatReply, ChatRequest};
use serde_json::{Value, json};

/// A structured transcript event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "chat_request", "chat_failure").
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn request(generation: u64, request: &ChatRequest) -> Self {
        Self::new(
            "chat_request",
            json!({
                "generation": generation,
                "message": request.message,
                "history_len": request.history.len(),
            }),
        )
    }

    pub fn reply(generation: u64, reply: &ChatReply) -> Self {
        Self::new(
            "chat_reply",
            json!({
                "generation": generation,
                "response": reply.response,
                "function_call": reply.function_call.as_ref().map(|d| &d.name),
                "data": reply.data,
                "suggested_actions": reply.suggested_actions,
            }),
        )
    }

    pub fn failure(generation: u64, kind: &str, detail: &str) -> Self {
        Self::new(
            "chat_failure",
            json!({
                "generation": generation,
                "kind": kind,
                "detail": detail,
            }),
        )
    }

    pub fn directive(directive: &ActionDirective, handled: bool) -> Self {
        let event_type = if handled {
            "directive_dispatched"
        } else {
            "directive_ignored"
        };
        Self::new(
            event_type,
            json!({
                "name": directive.name,
                "args": directive.args,
            }),
        )
    }
}

/// Records transcript events.
///
/// `log` is synchronous and infallible so it never disturbs the session;
/// implementations swallow their own write failures.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
