//! Credential source port
//!
//! The session never acquires credentials itself. An external auth
//! collaborator owns the bearer token; the session reads it once per request
//! and drops it when the exchange settles.

use std::fmt;
use std::sync::RwLock;

/// Bearer credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token; blank tokens yield `None`.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Read-only accessor for the current credential.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

/// Source for unauthenticated sessions
pub struct NoCredential;

impl CredentialSource for NoCredential {
    fn credential(&self) -> Option<Credential> {
        None
    }
}

/// Credential slot shared with the auth collaborator, which may replace or
/// clear it at any time.
#[derive(Default)]
pub struct SharedCredential {
    inner: RwLock<Option<Credential>>,
}

impl SharedCredential {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            inner: RwLock::new(credential),
        }
    }

    pub fn set(&self, credential: Option<Credential>) {
        match self.inner.write() {
            Ok(mut slot) => *slot = credential,
            Err(poisoned) => *poisoned.into_inner() = credential,
        }
    }
}

impl CredentialSource for SharedCredential {
    fn credential(&self) -> Option<Credential> {
        match self.inner.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
