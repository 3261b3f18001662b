//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use melba_chat::ChatOrchestrator;
use melba_core::config::MelbaConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup.
    pub config: Arc<MelbaConfig>,
    /// Chat session registry and responder.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Build state with an orchestrator derived from the config.
    pub fn new(config: MelbaConfig) -> Self {
        let orchestrator = ChatOrchestrator::new(config.chat.clone(), config.agency.clone());
        Self::with_orchestrator(config, orchestrator)
    }

    /// Build state around a prepared orchestrator.
    pub fn with_orchestrator(config: MelbaConfig, orchestrator: ChatOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }
}
