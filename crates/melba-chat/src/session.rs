//! Chat session lifecycle.
//!
//! Creates sessions with a blank conversation context and decides when an
//! idle session has expired.

use chrono::Local;
use uuid::Uuid;

use crate::types::{ChatSession, ConversationContext};

/// Creates and ages chat sessions.
pub struct SessionManager {
    /// Session timeout in minutes.
    pub session_timeout_minutes: u32,
}

impl SessionManager {
    pub fn new(session_timeout_minutes: u32) -> Self {
        Self {
            session_timeout_minutes,
        }
    }

    /// Create a fresh session with a blank context.
    pub fn create_session(&self) -> ChatSession {
        let now = Local::now().timestamp();
        ChatSession {
            id: Uuid::new_v4(),
            started_at: now,
            last_message_at: now,
            context: ConversationContext::default(),
        }
    }

    /// Check whether a session has been idle longer than the timeout.
    pub fn is_expired(&self, session: &ChatSession) -> bool {
        self.is_expired_at(session, Local::now().timestamp())
    }

    /// Expiry check against an explicit clock reading (epoch seconds).
    pub fn is_expired_at(&self, session: &ChatSession, now: i64) -> bool {
        let timeout_secs = i64::from(self.session_timeout_minutes) * 60;
        now - session.last_message_at > timeout_secs
    }

    /// Record activity on a session.
    pub fn touch(&self, session: &mut ChatSession) {
        session.last_message_at = Local::now().timestamp();
    }
}

// =============================================================================
// Tests
// =============================================================================
