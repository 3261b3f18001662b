//! Error types for the chat engine.
//!
//! The responder itself never fails; these errors come from the session
//! layer in front of it.

use melba_core::error::MelbaError;

/// Errors from the chat session layer.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ChatError> for MelbaError {
    fn from(err: ChatError) -> Self {
        MelbaError::Chat(err.to_string())
    }
}
