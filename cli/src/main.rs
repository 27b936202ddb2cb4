//! CLI entrypoint for MEX Assist
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow};
use clap::Parser;
use mex_application::{
    ActionDispatcher, ChatSessionController, ConversationLogger, Credential, SharedCredential,
};
use mex_infrastructure::{
    ConfigLoader, FileConfig, HttpAssistantTransport, JsonlConversationLogger,
};
use mex_presentation::{
    ChatRepl, Cli, ConsoleEffects, ConsoleFormatter, ConsoleModal, ConsoleNavigator,
};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;

    info!("Starting MEX Assist (endpoint: {})", config.assistant.endpoint);

    // === Dependency Injection ===
    let transport = Arc::new(HttpAssistantTransport::new(
        config.assistant.endpoint.clone(),
        config.assistant.timeout(),
    )?);

    let credentials = Arc::new(SharedCredential::new(
        config.auth.token.as_deref().and_then(Credential::new),
    ));

    let effects = Arc::new(ConsoleEffects::new());
    let navigator = Arc::new(ConsoleNavigator::new(effects.clone()));
    let dispatcher = ActionDispatcher::dashboard(
        navigator.clone(),
        Arc::new(ConsoleModal::email_preview(effects.clone())),
        config.routes.customers.clone(),
    );

    let mut controller = ChatSessionController::new(transport, credentials, dispatcher)
        .with_config(config.session_config());
    if let Some(logger) = open_transcript(&config) {
        controller = controller.with_logger(logger);
    }
    let controller = Arc::new(controller);

    let repl = ChatRepl::new(controller)
        .with_navigator(navigator)
        .with_effects(effects);

    // One-shot mode
    if let Some(message) = cli.message {
        for reply in repl.one_shot(&message).await {
            println!("{}", ConsoleFormatter::message(&reply));
        }
        for line in repl.take_effects() {
            println!("{}", line);
        }
        return Ok(());
    }

    repl.run().await?;
    Ok(())
}

/// Initialize logging based on verbosity level, optionally mirrored to a file.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow!("Cannot open log file {}: {}", path.display(), e))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::new(level)),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Merge config sources, apply command-line overrides and validate.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if let Some(endpoint) = &cli.endpoint {
        config.assistant.endpoint = endpoint.clone();
    }
    if let Some(token) = &cli.token {
        config.auth.token = Some(token.clone());
    }

    config.validate()?;
    Ok(config)
}

fn open_transcript(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = config.logging.conversation_log.as_ref()?;
    match JsonlConversationLogger::create(path) {
        Ok(logger) => {
            info!("Writing chat transcript to {}", logger.path().display());
            Some(Arc::new(logger))
        }
        Err(e) => {
            warn!("Could not open chat transcript {}: {}", path, e);
            None
        }
    }
}
