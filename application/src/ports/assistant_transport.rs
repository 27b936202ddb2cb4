//! Assistant transport port
//!
//! Defines the single request/response exchange with the remote assistant
//! service. The HTTP adapter lives in the infrastructure layer.

use crate::ports::credential::Credential;
use async_trait::async_trait;
use mex_domain::{ActionDirective, ChatReply, ChatRequest};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// The exchange did not produce an HTTP success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP {status}: {status_text}")]
    Status { status: u16, status_text: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,
}

impl TransportError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The server answered with success, but the body is not a valid reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed reply ({reason}): {payload}")]
pub struct ProtocolError {
    /// Raw body that failed validation
    pub payload: String,
    pub reason: String,
}

impl ProtocolError {
    pub fn new(payload: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            reason: reason.into(),
        }
    }
}

/// Any failed exchange. The session treats both kinds the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ExchangeError {
    /// Short label for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::Transport(_) => "transport",
            ExchangeError::Protocol(_) => "protocol",
        }
    }
}

/// Validate a success body as a [`ChatReply`].
///
/// The body must be a JSON object with a non-empty string `response`. The
/// optional parts are read leniently: `null` counts as absent, and a
/// malformed `function_call` or `suggested_actions` is dropped with a warning
/// while the reply text is kept.
pub fn parse_reply(body: &str) -> Result<ChatReply, ProtocolError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ProtocolError::new(body, e.to_string()))?;

    let response = match value.get("response") {
        Some(Value::String(text)) if text.is_empty() => {
            return Err(ProtocolError::new(body, "empty `response`"));
        }
        Some(Value::String(text)) => text.clone(),
        Some(_) => return Err(ProtocolError::new(body, "`response` is not a string")),
        None => return Err(ProtocolError::new(body, "missing field `response`")),
    };

    let mut reply = ChatReply::from_text(response);
    reply.function_call = parse_directive(&value);
    reply.data = value.get("data").filter(|d| !d.is_null()).cloned();
    reply.suggested_actions = parse_suggestions(&value);
    Ok(reply)
}

fn parse_directive(reply: &Value) -> Option<ActionDirective> {
    let raw = reply.get("function_call").filter(|v| !v.is_null())?;
    match serde_json::from_value(raw.clone()) {
        Ok(directive) => Some(directive),
        Err(e) => {
            warn!("Ignoring malformed function_call {}: {}", raw, e);
            None
        }
    }
}

fn parse_suggestions(reply: &Value) -> Vec<String> {
    let Some(raw) = reply.get("suggested_actions").filter(|v| !v.is_null()) else {
        return Vec::new();
    };
    match serde_json::from_value(raw.clone()) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!("Ignoring malformed suggested_actions {}: {}", raw, e);
            Vec::new()
        }
    }
}

/// Transport for one chat exchange.
///
/// Implementations are bound to a single endpoint at construction and must
/// attach `credential`, when present, as a bearer authorization header.
#[async_trait]
pub trait AssistantTransport: Send + Sync {
    async fn exchange(
        &self,
        request: &ChatRequest,
        credential: Option<&Credential>,
    ) -> Result<ChatReply, ExchangeError>;
}
