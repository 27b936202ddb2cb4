//! Console output formatter for the chat transcript

use colored::Colorize;
use mex_domain::{Message, NavigationTarget, Sender};

/// Formats chat messages and panel events for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One message, speaker label on the first line and the text indented
    /// beneath it.
    pub fn message(message: &Message) -> String {
        let label = match message.sender() {
            Sender::User => "you".cyan().bold(),
            Sender::Assistant => "MEX".green().bold(),
        };
        format!("{}\n{}", label, Self::indent(message.text(), "  "))
    }

    /// The whole conversation, separated by blank lines
    pub fn transcript(messages: &[Message]) -> String {
        messages
            .iter()
            .map(Self::message)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Follow-up prompts offered with the latest reply
    pub fn suggestions(suggestions: &[String]) -> String {
        let mut output = format!("{}\n", "Suggestions:".dimmed());
        for suggestion in suggestions {
            output.push_str(&format!("  * {}\n", suggestion));
        }
        output
    }

    pub fn pending() -> String {
        "MEX is typing...".dimmed().italic().to_string()
    }

    pub fn navigation(target: &NavigationTarget) -> String {
        format!("{} {}", "-> opening".yellow().bold(), target)
    }

    pub fn modal_opened(name: &str) -> String {
        format!("{} {}", "-> opening".yellow().bold(), name)
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
