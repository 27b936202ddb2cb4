//! REPL (Read-Eval-Print Loop) for interactive chat

use super::cursor::TranscriptCursor;
use crate::ConsoleFormatter;
use crate::collaborators::{ConsoleEffects, ConsoleNavigator};
use colored::Colorize;
use mex_application::{AssistantTransport, ChatSessionController};
use mex_domain::Message;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tokio::sync::watch;

/// Interactive chat REPL
pub struct ChatRepl<T: AssistantTransport + 'static> {
    controller: Arc<ChatSessionController<T>>,
    navigator: Option<Arc<ConsoleNavigator>>,
    effects: Arc<ConsoleEffects>,
}

impl<T: AssistantTransport + 'static> ChatRepl<T> {
    /// Create a new ChatRepl
    pub fn new(controller: Arc<ChatSessionController<T>>) -> Self {
        Self {
            controller,
            navigator: None,
            effects: Arc::new(ConsoleEffects::new()),
        }
    }

    /// Print lines left by the console collaborators after each reply
    pub fn with_effects(mut self, effects: Arc<ConsoleEffects>) -> Self {
        self.effects = effects;
        self
    }

    /// Show the navigator's current location in the prompt
    pub fn with_navigator(mut self, navigator: Arc<ConsoleNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("mex-assist").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        let mut changes = self.controller.subscribe();
        let mut cursor = TranscriptCursor::new();
        changes.borrow_and_update();
        self.print_transcript(&mut cursor, true);

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line, &mut cursor) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    self.process_message(line, &mut changes, &mut cursor).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Send one message and return the assistant messages it produced.
    pub async fn one_shot(&self, message: &str) -> Vec<Message> {
        let before = self.controller.history().len();
        self.controller.send_message(message).await;
        self.controller
            .history_since(before)
            .into_iter()
            .filter(|m| !m.is_user())
            .collect()
    }

    /// Side-effect lines produced since the last call
    pub fn take_effects(&self) -> Vec<String> {
        self.effects.drain()
    }

    fn prompt(&self) -> String {
        match self.navigator.as_ref().and_then(|n| n.current()) {
            Some(target) => format!("[{}] you> ", target),
            None => "you> ".to_string(),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            MEX Assist - Chat Panel          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Type a message, or /help for commands.");
        println!();
    }

    /// Print messages appended since the cursor. The user's own lines are
    /// skipped unless `include_user` is set, since they were just typed.
    fn print_transcript(&self, cursor: &mut TranscriptCursor, include_user: bool) {
        let history = self.controller.history();
        for message in cursor.advance(&history) {
            if include_user || !message.is_user() {
                println!("{}", ConsoleFormatter::message(message));
                println!();
            }
        }
    }

    async fn process_message(
        &self,
        line: &str,
        changes: &mut watch::Receiver<u64>,
        cursor: &mut TranscriptCursor,
    ) {
        println!("{}", ConsoleFormatter::pending());
        self.controller.send_message(line).await;
        println!();

        if changes.has_changed().unwrap_or(false) {
            changes.borrow_and_update();
            self.print_transcript(cursor, false);
        }

        let effects = self.take_effects();
        for line in &effects {
            println!("{}", line);
        }
        if !effects.is_empty() {
            println!();
        }

        let suggestions = self.controller.suggested_actions();
        if !suggestions.is_empty() {
            println!("{}", ConsoleFormatter::suggestions(&suggestions));
        }
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, cmd: &str, cursor: &mut TranscriptCursor) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?     - Show this help");
                println!("  /history          - Show the whole conversation");
                println!("  /reset            - Start a new conversation");
                println!("  /quit, /exit, /q  - Exit chat");
                println!();
                false
            }
            "/history" => {
                println!();
                println!("{}", ConsoleFormatter::transcript(&self.controller.history()));
                println!();
                false
            }
            "/reset" => {
                self.controller.reset();
                cursor.rewind();
                println!("{}", "Conversation reset.".dimmed());
                println!();
                self.print_transcript(cursor, true);
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }
}
