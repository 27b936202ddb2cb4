//! Request and reply bodies for the assistant chat endpoint
//!
//! ```text
//! request:  { "message": string, "history": [ { "sender": "user"|"bot", "text": string } ] }
//! reply:    { "response": string, "function_call"?: { "name", "args"? }, "data"?, "suggested_actions"? }
//! ```

use super::message::Message;
use crate::directive::entities::ActionDirective;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Outgoing chat request.
///
/// `history` is the conversation as it stood *before* `message` was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Message>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, history: Vec<Message>) -> Self {
        Self {
            message: message.into(),
            history,
        }
    }
}

/// Parsed reply from the assistant service.
///
/// Only `response` is required; a body without a string `response` does not
/// deserialize. `null` optional parts read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant text to append to the conversation
    pub response: String,
    /// Optional directive to execute on the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<ActionDirective>,
    /// Structured data computed server-side (kept, not rendered)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Follow-up prompts the user may pick next
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub suggested_actions: Vec<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatReply {
    pub fn from_text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            function_call: None,
            data: None,
            suggested_actions: Vec::new(),
        }
    }

    pub fn with_directive(mut self, directive: ActionDirective) -> Self {
        self.function_call = Some(directive);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggested_actions = suggestions;
        self
    }
}
