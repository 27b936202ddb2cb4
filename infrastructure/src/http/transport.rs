//! `POST` transport for the assistant chat endpoint
//!
//! One exchange is one JSON request and one JSON reply. Non-2xx statuses,
//! connection failures and timeouts surface as [`TransportError`]; a 2xx
//! body that is not a valid reply surfaces as a protocol error.

use async_trait::async_trait;
use mex_application::ports::assistant_transport::{
    AssistantTransport, ExchangeError, TransportError, parse_reply,
};
use mex_application::ports::credential::Credential;
use mex_domain::{ChatReply, ChatRequest};
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use tracing::debug;

/// Assistant transport over HTTP, bound to one endpoint.
pub struct HttpAssistantTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAssistantTransport {
    /// Build a transport with its own client and a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Reuse an existing client (shares its connection pool and timeout).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(error.to_string())
    }
}

#[async_trait]
impl AssistantTransport for HttpAssistantTransport {
    async fn exchange(
        &self,
        request: &ChatRequest,
        credential: Option<&Credential>,
    ) -> Result<ChatReply, ExchangeError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(credential) = credential {
            builder = builder.header(AUTHORIZATION, credential.bearer());
        }

        debug!(
            "POST {} (history: {} messages)",
            self.endpoint,
            request.history.len()
        );

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
            .into());
        }

        let body = response.text().await.map_err(classify)?;
        Ok(parse_reply(&body)?)
    }
}
