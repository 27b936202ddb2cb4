//! Tracks which part of the conversation has already been printed

use mex_domain::Message;

/// Position in the history up to which messages have been shown.
///
/// The history only grows, except on reset, when it is replaced by the
/// seeded greeting. A history shorter than the cursor is treated as a fresh
/// conversation.
#[derive(Debug, Default)]
pub struct TranscriptCursor {
    printed: usize,
}

impl TranscriptCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn printed(&self) -> usize {
        self.printed
    }

    /// Messages not yet shown, moving the cursor to the end.
    pub fn advance<'a>(&mut self, history: &'a [Message]) -> &'a [Message] {
        if history.len() < self.printed {
            self.printed = 0;
        }
        let unseen = &history[self.printed..];
        self.printed = history.len();
        unseen
    }

    /// Start over from the first message.
    pub fn rewind(&mut self) {
        self.printed = 0;
    }
}
