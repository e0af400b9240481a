mod assistant;
mod chat;
mod config;
mod data;
mod leads;
mod logging;
mod paths;
mod places;
mod server;
mod session;
mod specui;
mod store;
mod tui;
mod widgets;

use crate::assistant::AssistantClient;
use crate::config::Config;
use crate::leads::LeadSink;
use crate::places::PlacesClient;
use crate::session::ChatSession;
use crate::store::ConversationStore;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "hearth", version)]
#[command(about = "Hearth — conversational assistant for a real-estate site", long_about = None)]
struct Cli {
    /// Port for the API server
    #[arg(long)]
    port: Option<u16>,

    /// API server only, no terminal chat
    #[arg(long, default_value_t = false)]
    web: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delete the saved conversation history
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_path) = Config::load_with_path().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config, using defaults: {e}");
        (Config::default(), None)
    });
    config.validate()?;

    let cli = Cli::parse();

    // Lightweight subcommands — no tracing needed.
    if let Some(Command::Clear) = &cli.cmd {
        ConversationStore::new().clear();
        println!("Conversation history cleared.");
        return Ok(());
    }

    // Suppress stdout logging in TUI mode — ratatui owns the terminal.
    let will_run_tui = !cli.web;
    let log_dir = match logging::setup_tracing_with_settings(logging::LoggingSettings {
        level: config.logging.level.as_deref(),
        directory: config.logging.directory.as_deref(),
        retention_days: config.logging.retention_days,
        suppress_stdout: will_run_tui,
    }) {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("Failed to initialize logging: {err}");
            None
        }
    };

    let port = cli.port.unwrap_or(config.server.port);
    let assistant = AssistantClient::new(
        config.assistant.url.clone(),
        config.assistant.model.clone(),
        config.assistant.api_key.clone(),
    );
    let places = PlacesClient::new(&config.places);
    let leads = LeadSink::new(&config.leads);
    let session = ChatSession::new(
        ConversationStore::new(),
        assistant,
        places,
        config.agent.clone(),
    );

    let state = Arc::new(server::ServerState {
        session: session.clone(),
        leads: leads.clone(),
    });

    if cli.web {
        tracing::info!("--- Hearth Startup ---");
        if let Some(path) = config_path.as_ref() {
            tracing::info!("Config File: {}", path.display());
        } else {
            tracing::info!("Config File: (default)");
        }
        tracing::info!("Server Port: {}", port);
        tracing::info!("Assistant: {} ({})", config.assistant.url, config.assistant.model);
        tracing::info!("Agent: {} <{}>", config.agent.name, config.agent.email);
        if let Some(dir) = log_dir.as_ref() {
            tracing::info!("Log Directory: {}", dir.display());
        }
        tracing::info!("----------------------");

        server::start_server(state, port).await?;
    } else {
        // Terminal chat + embedded server (default)
        let handle = server::prepare_server(state, port).await?;
        let result = tui::run_tui(session, leads).await;
        handle.task.abort();
        result?;
    }

    Ok(())
}
