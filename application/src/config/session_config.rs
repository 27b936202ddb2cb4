//! Chat session behavior settings

/// Greeting seeded into every freshly mounted panel.
pub const DEFAULT_GREETING: &str = "Hello! I'm MEX, your personal virtual assistant.
I can help you analyze sales data, forecast performance and manage customer retention campaigns.

How can I assist you today?";

/// Apology shown when a request fails for any reason.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, I couldn't connect. Please try again.";

/// Controls what the session shows the user outside of assistant replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Assistant greeting seeded on mount; `None` starts with an empty history
    pub greeting: Option<String>,
    /// Fixed text appended when a request fails
    pub fallback_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: Some(DEFAULT_GREETING.to_string()),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn without_greeting(mut self) -> Self {
        self.greeting = None;
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }
}
