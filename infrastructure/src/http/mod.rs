//! HTTP adapter for the assistant chat endpoint.

mod transport;

pub use transport::HttpAssistantTransport;
