//! Single-flight session state machine
//!
//! ```text
//!            begin (accepted)
//!   Idle ─────────────────────▶ AwaitingResponse
//!    ▲                                 │
//!    └──────── settle (any outcome) ───┘
//!
//!   begin while AwaitingResponse → Rejection::RequestPending (no transition)
//!   reset → Idle, generation + 1 (outstanding tickets become stale)
//! ```

use std::collections::BTreeSet;
use thiserror::Error;

/// Phase of the request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Why a send was not accepted. Silent no-ops, never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("message is empty")]
    EmptyInput,

    #[error("a request is already in flight")]
    RequestPending,
}

/// Proof that a request was accepted, tied to the session generation
/// that accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Mutable state of one chat session besides its history.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: SessionPhase,
    generation: u64,
    suggested_actions: BTreeSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == SessionPhase::AwaitingResponse
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn suggested_actions(&self) -> &BTreeSet<String> {
        &self.suggested_actions
    }

    /// Try to move `Idle → AwaitingResponse` for `text`.
    ///
    /// On success the suggested actions are cleared.
    pub fn begin(&mut self, text: &str) -> Result<RequestTicket, Rejection> {
        if text.trim().is_empty() {
            return Err(Rejection::EmptyInput);
        }
        if self.is_pending() {
            return Err(Rejection::RequestPending);
        }

        self.phase = SessionPhase::AwaitingResponse;
        self.suggested_actions.clear();
        Ok(RequestTicket {
            generation: self.generation,
        })
    }

    /// Whether a reply for `ticket` may still be applied.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Return to `Idle` when `ticket` is current. Returns `false` for stale tickets.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = SessionPhase::Idle;
        true
    }

    pub fn set_suggested_actions<I>(&mut self, actions: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.suggested_actions = actions
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect();
    }

    /// Start a new generation: back to `Idle`, suggestions cleared.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = SessionPhase::Idle;
        self.suggested_actions.clear();
    }
}
