//! Message history store
//!
//! Owns the session's [`ConversationHistory`] and publishes its version on a
//! `watch` channel after every change, so the presentation layer can react
//! (e.g. scroll to the newest message) without polling.

use mex_domain::{ConversationHistory, Message};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// Thread-safe owner of the conversation log.
///
/// The lock is only held for the duration of a single append or copy, never
/// across an `.await`.
pub struct MessageHistoryStore {
    log: Mutex<ConversationHistory>,
    changes: watch::Sender<u64>,
}

impl MessageHistoryStore {
    pub fn new(history: ConversationHistory) -> Self {
        let (changes, _) = watch::channel(history.version());
        Self {
            log: Mutex::new(history),
            changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConversationHistory> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append to the end of the log and notify subscribers.
    pub fn append(&self, message: Message) -> u64 {
        let version = self.lock().append(message);
        self.changes.send_replace(version);
        version
    }

    /// Copy of every message appended before this call.
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().snapshot()
    }

    /// Copy of the messages at or after position `index`.
    pub fn since(&self, index: usize) -> Vec<Message> {
        self.lock().since(index).to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn version(&self) -> u64 {
        self.lock().version()
    }

    /// Discard the log and start over, optionally seeded with a greeting
    /// (panel remount). Subscribers are notified.
    pub fn restart(&self, greeting: Option<&str>) {
        let version = self.lock().restart(greeting);
        self.changes.send_replace(version);
    }

    /// Receiver that observes the version after every change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
