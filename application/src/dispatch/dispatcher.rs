//! Directive registry

use super::handlers::{ActionHandler, FilteredViewHandler, IgnoreDirective, OpenModalHandler};
use crate::ports::collaborators::{ModalOpener, Navigator};
use mex_domain::{ActionDirective, DAYS_AGO_ARG, SEND_EMAILS, SHOW_CUSTOMERS};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// What happened to a dispatched directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A registered handler ran
    Handled,
    /// No handler is registered for the name; nothing happened
    Ignored,
}

/// Registry mapping directive names to handlers.
///
/// Unknown names resolve to [`IgnoreDirective`], so servers can introduce new
/// directives without breaking older clients.
pub struct ActionDispatcher {
    handlers: HashMap<String, Box<dyn ActionHandler>>,
    fallback: IgnoreDirective,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDispatcher {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: IgnoreDirective,
        }
    }

    /// Registry with the dashboard's directives:
    ///
    /// - `show_customers` → navigate to `customers_route`, filtered by `daysAgo`
    /// - `send_emails` → open the email preview modal
    pub fn dashboard(
        navigator: Arc<dyn Navigator>,
        email_modal: Arc<dyn ModalOpener>,
        customers_route: impl Into<String>,
    ) -> Self {
        Self::new()
            .with_handler(
                SHOW_CUSTOMERS,
                FilteredViewHandler::new(navigator, customers_route, DAYS_AGO_ARG),
            )
            .with_handler(SEND_EMAILS, OpenModalHandler::new(email_modal))
    }

    /// Register a handler, replacing any previous one for `name`.
    pub fn register(&mut self, name: impl Into<String>, handler: impl ActionHandler + 'static) {
        let name = name.into();
        if self.handlers.insert(name.clone(), Box::new(handler)).is_some() {
            debug!("Replaced handler for directive '{}'", name);
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_handler(
        mut self,
        name: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) -> Self {
        self.register(name, handler);
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered directive names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn handler_for(&self, name: &str) -> (&dyn ActionHandler, DispatchOutcome) {
        match self.handlers.get(name) {
            Some(handler) => (handler.as_ref(), DispatchOutcome::Handled),
            None => (&self.fallback as &dyn ActionHandler, DispatchOutcome::Ignored),
        }
    }

    /// Run the handler registered for `directive.name` with its arguments.
    pub fn dispatch(&self, directive: &ActionDirective) -> DispatchOutcome {
        let (handler, outcome) = self.handler_for(&directive.name);
        match outcome {
            DispatchOutcome::Handled => info!("Dispatching directive '{}'", directive.name),
            DispatchOutcome::Ignored => {
                debug!("No handler for directive '{}', ignoring", directive.name)
            }
        }
        handler.execute(&directive.args);
        outcome
    }
}
