//! Application layer for mex-assist
//!
//! This crate contains the chat session controller, the directive dispatcher,
//! the history store and the port definitions they depend on.
//! It depends only on the domain layer.

pub mod config;
pub mod dispatch;
pub mod history;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionConfig;
pub use dispatch::{
    dispatcher::{ActionDispatcher, DispatchOutcome},
    handlers::{ActionHandler, FilteredViewHandler, IgnoreDirective, OpenModalHandler},
};
pub use history::MessageHistoryStore;
pub use ports::{
    assistant_transport::{
        AssistantTransport, ExchangeError, ProtocolError, TransportError, parse_reply,
    },
    collaborators::{ModalOpener, Navigator},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    credential::{Credential, CredentialSource, NoCredential, SharedCredential},
};
pub use use_cases::chat_session::ChatSessionController;
