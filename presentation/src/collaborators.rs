//! Console stand-ins for the dashboard's router and modal
//!
//! In the dashboard, `show_customers` changes the route and `send_emails`
//! opens the email preview. In the terminal both describe what would happen
//! in a shared [`ConsoleEffects`] buffer, which the REPL prints after the
//! reply that triggered them. The navigator also remembers where the user
//! "is" for the prompt.

use crate::output::console::ConsoleFormatter;
use mex_application::{ModalOpener, Navigator};
use mex_domain::NavigationTarget;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Lines produced by directive side effects, waiting to be printed.
#[derive(Default)]
pub struct ConsoleEffects {
    lines: Mutex<Vec<String>>,
}

impl ConsoleEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: impl Into<String>) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.into());
    }

    /// Take every pending line, oldest first
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

/// Reports navigation requests and tracks the current location.
pub struct ConsoleNavigator {
    current: Mutex<Option<NavigationTarget>>,
    effects: Arc<ConsoleEffects>,
}

impl ConsoleNavigator {
    pub fn new(effects: Arc<ConsoleEffects>) -> Self {
        Self {
            current: Mutex::new(None),
            effects,
        }
    }

    /// Last target navigated to, if any
    pub fn current(&self) -> Option<NavigationTarget> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: &NavigationTarget) {
        info!("Navigating to {}", target);
        self.effects.push(ConsoleFormatter::navigation(target));
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(target.clone());
    }
}

/// Reports modal activations.
pub struct ConsoleModal {
    name: String,
    opened: AtomicUsize,
    effects: Arc<ConsoleEffects>,
}

impl ConsoleModal {
    pub fn new(name: impl Into<String>, effects: Arc<ConsoleEffects>) -> Self {
        Self {
            name: name.into(),
            opened: AtomicUsize::new(0),
            effects,
        }
    }

    /// Email preview modal opened by `send_emails`
    pub fn email_preview(effects: Arc<ConsoleEffects>) -> Self {
        Self::new("email preview", effects)
    }

    pub fn times_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl ModalOpener for ConsoleModal {
    fn open(&self) {
        info!("Opening {} modal", self.name);
        self.effects.push(ConsoleFormatter::modal_opened(&self.name));
        self.opened.fetch_add(1, Ordering::SeqCst);
    }
}
