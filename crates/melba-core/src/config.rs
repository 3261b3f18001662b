use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MelbaError, Result};

/// Top-level configuration for the Melba chat service.
///
/// Loaded from `~/.melba/config.toml` by default. Every section falls back to
/// its defaults, so a partial (or empty) file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MelbaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub agency: AgencyConfig,
}

impl MelbaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MelbaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MelbaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Extra CORS origins allowed to call the chat API (the site itself is
    /// always allowed).
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: Vec::new(),
        }
    }
}

/// Chat widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether the chat endpoints accept messages.
    pub enabled: bool,
    /// Maximum accepted message length, in characters.
    pub max_message_length: usize,
    /// Idle minutes after which a session is discarded.
    pub session_timeout_minutes: u32,
    /// Messages kept per session history (user and assistant combined).
    pub history_limit: usize,
    /// Cosmetic pause before a reply is sent, in milliseconds.
    pub reply_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_message_length: 2000,
            session_timeout_minutes: 30,
            history_limit: 200,
            reply_delay_ms: 0,
        }
    }
}

/// Agency profile interpolated into canned replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyConfig {
    /// Agency display name.
    pub name: String,
    /// Sales contact email.
    pub email: String,
    /// Sales contact phone number.
    pub phone: String,
    /// Human-readable business hours.
    pub business_hours: String,
    /// Promised callback window after a handoff, in minutes.
    pub callback_minutes: u32,
    /// Promised email response window, in hours.
    pub response_hours: u32,
    /// Site path of the contact page.
    pub contact_page: String,
}

impl Default for AgencyConfig {
    fn default() -> Self {
        Self {
            name: "MelbaSolution".to_string(),
            email: "contact@melbasolution.com".to_string(),
            phone: "+1 (206) 240-9455".to_string(),
            business_hours: "9 AM - 6 PM EST".to_string(),
            callback_minutes: 15,
            response_hours: 2,
            contact_page: "/contact".to_string(),
        }
    }
}
