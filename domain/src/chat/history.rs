//! Versioned conversation log

use super::message::Message;

/// Ordered, append-only conversation log (Entity)
///
/// Every [`append`](Self::append) bumps the version, so observers can tell
/// whether anything changed since they last looked. [`snapshot`](Self::snapshot)
/// hands out an owned copy; later appends never show up in it.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
    version: u64,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log seeded with an assistant greeting.
    ///
    /// A `None` or blank greeting yields an empty log.
    pub fn seeded(greeting: Option<&str>) -> Self {
        let mut history = Self::new();
        if let Some(text) = greeting
            && !text.trim().is_empty()
        {
            history.append(Message::assistant(text));
        }
        history
    }

    /// Append a message and return the new version.
    pub fn append(&mut self, message: Message) -> u64 {
        self.messages.push(message);
        self.version += 1;
        self.version
    }

    /// Drop every message and re-seed. The version keeps increasing so
    /// observers never see it go backwards.
    pub fn restart(&mut self, greeting: Option<&str>) -> u64 {
        self.messages.clear();
        self.version += 1;
        if let Some(text) = greeting
            && !text.trim().is_empty()
        {
            self.append(Message::assistant(text));
        }
        self.version
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended at or after position `index`.
    pub fn since(&self, index: usize) -> &[Message] {
        self.messages.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
