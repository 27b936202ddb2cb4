//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod assistant_transport;
pub mod collaborators;
pub mod conversation_logger;
pub mod credential;
