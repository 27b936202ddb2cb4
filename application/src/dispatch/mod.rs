//! Directive dispatch
//!
//! Maps directive names issued by the assistant service to client-side
//! side-effect handlers.
//!
//! - [`dispatcher::ActionDispatcher`]: name → handler registry
//! - [`handlers`]: the [`ActionHandler`](handlers::ActionHandler) contract and
//!   the dashboard's handlers

pub mod dispatcher;
pub mod handlers;
