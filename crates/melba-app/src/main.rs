//! Melba application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Either serve the chat API over HTTP or run a terminal chat

mod cli;

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use melba_api::state::AppState;
use melba_chat::ChatOrchestrator;
use melba_core::config::MelbaConfig;

use cli::{CliArgs, Command};

/// How often idle sessions are swept.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = MelbaConfig::load_or_default(&config_file);
    config.server.port = args.resolve_port(config.server.port);
    let log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Melba v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    match args.command() {
        Command::Serve => serve(config).await?,
        Command::Chat => terminal_chat(config).await?,
    }

    Ok(())
}

/// Run the HTTP API with a background sweep of expired sessions.
async fn serve(config: MelbaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config);

    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = orchestrator.purge_expired() {
                tracing::warn!(error = %e, "Session purge failed");
            }
        }
    });

    melba_api::start_server(state).await?;
    Ok(())
}

/// Read lines from stdin and answer each one on stdout, in a single session.
async fn terminal_chat(config: MelbaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = ChatOrchestrator::new(config.chat.clone(), config.agency.clone());
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let opened = orchestrator.open_session()?;
    let mut session_id = opened.session_id;
    stdout
        .write_all(format!("{}: {}\n> ", config.agency.name, opened.welcome).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        match orchestrator.handle_message(line, Some(session_id)) {
            Ok((response, sid)) => {
                session_id = sid;
                let delay_ms = orchestrator.config().reply_delay_ms;
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                stdout
                    .write_all(format!("{}: {}\n", config.agency.name, response.reply).as_bytes())
                    .await?;
            }
            Err(e) => {
                stdout.write_all(format!("error: {}\n", e).as_bytes()).await?;
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    tracing::info!(session_id = %session_id, "Terminal chat ended");
    Ok(())
}
