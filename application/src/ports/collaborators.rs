//! Dashboard collaborators triggered by directive handlers
//!
//! Implementations live in the presentation layer (router, modal state).

use mex_domain::NavigationTarget;

/// Requests navigation to a dashboard route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &NavigationTarget);
}

/// Zero-argument signal that opens a modal.
pub trait ModalOpener: Send + Sync {
    fn open(&self);
}
