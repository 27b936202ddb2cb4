//! Server-issued directives.
//!
//! A directive is a named, argument-bearing instruction attached to an
//! assistant reply, asking the client to perform one side effect.

pub mod entities;
pub mod names;
