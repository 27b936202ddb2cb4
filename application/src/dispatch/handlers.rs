//! Directive handlers
//!
//! Each handler performs exactly one external side effect per execution.

use crate::ports::collaborators::{ModalOpener, Navigator};
use mex_domain::{DirectiveArgs, NavigationTarget};
use std::sync::Arc;
use tracing::{debug, warn};

/// Side effect bound to a directive name.
pub trait ActionHandler: Send + Sync {
    fn execute(&self, args: &DirectiveArgs);
}

/// Identity handler for unrecognized directives.
pub struct IgnoreDirective;

impl ActionHandler for IgnoreDirective {
    fn execute(&self, _args: &DirectiveArgs) {}
}

/// Navigates to a view, filtered by a numeric argument when one is given.
///
/// `daysAgo: 30` → `/customers?daysAgo=30`; no `daysAgo` → `/customers`.
pub struct FilteredViewHandler {
    navigator: Arc<dyn Navigator>,
    route: String,
    param: String,
}

impl FilteredViewHandler {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        route: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        Self {
            navigator,
            route: route.into(),
            param: param.into(),
        }
    }

    fn target(&self, args: &DirectiveArgs) -> NavigationTarget {
        let base = NavigationTarget::new(self.route.clone());
        match args.get_i64(&self.param) {
            Some(value) => base.with_query(self.param.clone(), value),
            None => {
                if let Some(raw) = args.get(&self.param) {
                    warn!(
                        "Ignoring non-numeric '{}' argument {:?}, opening unfiltered view",
                        self.param, raw
                    );
                }
                base
            }
        }
    }
}

impl ActionHandler for FilteredViewHandler {
    fn execute(&self, args: &DirectiveArgs) {
        let target = self.target(args);
        debug!("Navigating to {}", target);
        self.navigator.navigate(&target);
    }
}

/// Fires a modal-open signal; arguments are ignored.
pub struct OpenModalHandler {
    modal: Arc<dyn ModalOpener>,
}

impl OpenModalHandler {
    pub fn new(modal: Arc<dyn ModalOpener>) -> Self {
        Self { modal }
    }
}

impl ActionHandler for OpenModalHandler {
    fn execute(&self, _args: &DirectiveArgs) {
        debug!("Opening modal");
        self.modal.open();
    }
}
