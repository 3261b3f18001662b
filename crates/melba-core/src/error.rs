use thiserror::Error;

/// Top-level error type for the Melba chat service.
///
/// Subsystem crates define their own error types; the binary and the HTTP
/// server surface failures through this type so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MelbaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MelbaError {
    fn from(err: toml::de::Error) -> Self {
        MelbaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MelbaError {
    fn from(err: toml::ser::Error) -> Self {
        MelbaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MelbaError {
    fn from(err: serde_json::Error) -> Self {
        MelbaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Melba operations.
pub type Result<T> = std::result::Result<T, MelbaError>;
