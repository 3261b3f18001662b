//! Chat orchestrator: owns sessions and routes messages through the responder.
//!
//! Every session holds exactly one conversation context. Transports (HTTP,
//! terminal) talk to this type only.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Local, TimeZone};
use melba_core::config::{AgencyConfig, ChatConfig};
use uuid::Uuid;

use crate::error::ChatError;
use crate::quick_reply::QuickReply;
use crate::replies::ReplyBook;
use crate::responder::Responder;
use crate::session::SessionManager;
use crate::types::{
    ChatMessage, ChatResponse, ChatSession, ChatSessionSummary, Reply, SessionOpened,
};

/// Central chat coordinator shared by every transport.
pub struct ChatOrchestrator {
    responder: Responder,
    session_manager: SessionManager,
    sessions: Mutex<HashMap<Uuid, ChatSession>>,
    messages: Mutex<HashMap<Uuid, Vec<ChatMessage>>>,
    config: ChatConfig,
}

impl ChatOrchestrator {
    /// Create an orchestrator with a randomly picking responder.
    pub fn new(config: ChatConfig, agency: AgencyConfig) -> Self {
        Self::with_responder(config, Responder::new(ReplyBook::new(agency)))
    }

    /// Create an orchestrator around a prepared responder.
    pub fn with_responder(config: ChatConfig, responder: Responder) -> Self {
        Self {
            responder,
            session_manager: SessionManager::new(config.session_timeout_minutes),
            sessions: Mutex::new(HashMap::new()),
            messages: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Open a new session and return its welcome line.
    pub fn open_session(&self) -> Result<SessionOpened, ChatError> {
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }

        let session = self.session_manager.create_session();
        let sid = session.id;
        let welcome = self.responder.welcome();
        {
            let mut sessions = self.lock_sessions()?;
            sessions.insert(sid, session);
            self.record(&sessions, sid, None, &welcome)?;
        }
        tracing::info!(session_id = %sid, "Chat session opened");

        Ok(SessionOpened {
            session_id: sid,
            welcome: welcome.text,
        })
    }

    /// Handle an incoming chat message.
    ///
    /// Returns the reply and the session ID (new or existing). Unknown or
    /// expired session IDs silently start a new session.
    pub fn handle_message(
        &self,
        message: &str,
        session_id: Option<Uuid>,
    ) -> Result<(ChatResponse, Uuid), ChatError> {
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let (reply, context, sid) = {
            let mut sessions = self.lock_sessions()?;
            let sid = self.resolve_session(&mut sessions, session_id);
            let session = sessions
                .get_mut(&sid)
                .ok_or_else(|| ChatError::Internal(format!("session {} vanished", sid)))?;

            let reply = self.responder.reply_to(&mut session.context, message);
            self.session_manager.touch(session);
            let context = session.context.clone();

            self.record(&sessions, sid, Some(message), &reply)?;
            (reply, context, sid)
        };

        tracing::debug!(
            session_id = %sid,
            kind = ?reply.kind,
            message_count = context.message_count,
            "Chat message handled"
        );

        Ok((
            ChatResponse {
                reply: reply.text,
                kind: reply.kind,
                context,
            },
            sid,
        ))
    }

    /// Answer a quick-reply button. Same session semantics as
    /// [`handle_message`](Self::handle_message) but leaves the context as is.
    pub fn quick_reply(
        &self,
        reply_type: QuickReply,
        session_id: Option<Uuid>,
    ) -> Result<(ChatResponse, Uuid), ChatError> {
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }

        let reply = reply_type.reply(self.responder.book());
        let (context, sid) = {
            let mut sessions = self.lock_sessions()?;
            let sid = self.resolve_session(&mut sessions, session_id);
            let session = sessions
                .get_mut(&sid)
                .ok_or_else(|| ChatError::Internal(format!("session {} vanished", sid)))?;
            self.session_manager.touch(session);
            let context = session.context.clone();

            self.record(&sessions, sid, None, &reply)?;
            (context, sid)
        };

        tracing::debug!(session_id = %sid, kind = ?reply.kind, "Quick reply sent");

        Ok((
            ChatResponse {
                reply: reply.text,
                kind: reply.kind,
                context,
            },
            sid,
        ))
    }

    /// Get a session by ID.
    pub fn get_session(&self, session_id: Uuid) -> Option<ChatSession> {
        self.sessions
            .lock()
            .ok()
            .and_then(|s| s.get(&session_id).cloned())
    }

    /// List all sessions as summaries, most recently active first.
    pub fn list_sessions(&self) -> Vec<ChatSessionSummary> {
        let sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut list: Vec<&ChatSession> = sessions.values().collect();
        list.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        list.into_iter().map(summarize).collect()
    }

    /// Number of sessions currently held.
    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Delete a session and its history.
    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        let mut sessions = self.lock_sessions()?;
        if sessions.remove(&session_id).is_none() {
            return Err(ChatError::SessionNotFound(session_id));
        }
        if let Ok(mut msgs) = self.messages.lock() {
            msgs.remove(&session_id);
        }
        tracing::info!(session_id = %session_id, "Chat session deleted");
        Ok(())
    }

    /// Get message history for a session, oldest first.
    pub fn get_history(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        if !self.lock_sessions()?.contains_key(&session_id) {
            return Err(ChatError::SessionNotFound(session_id));
        }

        let msgs = self
            .messages
            .lock()
            .map_err(|e| ChatError::Internal(format!("messages lock poisoned: {}", e)))?;
        Ok(msgs.get(&session_id).cloned().unwrap_or_default())
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, ChatError> {
        let mut sessions = self.lock_sessions()?;
        let expired: Vec<Uuid> = sessions
            .values()
            .filter(|s| self.session_manager.is_expired(s))
            .map(|s| s.id)
            .collect();

        for sid in &expired {
            sessions.remove(sid);
        }
        if let Ok(mut msgs) = self.messages.lock() {
            for sid in &expired {
                msgs.remove(sid);
            }
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Purged expired chat sessions");
        }
        Ok(expired.len())
    }

    // -- Private helpers --

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, ChatSession>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::Internal(format!("session lock poisoned: {}", e)))
    }

    /// Reuse the requested session if it is live, otherwise start a new one.
    fn resolve_session(
        &self,
        sessions: &mut HashMap<Uuid, ChatSession>,
        requested: Option<Uuid>,
    ) -> Uuid {
        if let Some(sid) = requested {
            if let Some(session) = sessions.get(&sid) {
                if !self.session_manager.is_expired(session) {
                    return sid;
                }
                sessions.remove(&sid);
                if let Ok(mut msgs) = self.messages.lock() {
                    msgs.remove(&sid);
                }
                tracing::debug!(session_id = %sid, "Chat session expired");
            }
        }

        let session = self.session_manager.create_session();
        let sid = session.id;
        sessions.insert(sid, session);
        tracing::info!(session_id = %sid, "Chat session opened");
        sid
    }

    /// Append the user message (if any) and the reply to session history.
    ///
    /// Called with the sessions lock held; history is only kept for sessions
    /// still present in `sessions`.
    fn record(
        &self,
        sessions: &HashMap<Uuid, ChatSession>,
        sid: Uuid,
        user: Option<&str>,
        reply: &Reply,
    ) -> Result<(), ChatError> {
        if !sessions.contains_key(&sid) {
            tracing::debug!(session_id = %sid, "Skipping history for removed session");
            return Ok(());
        }

        let now = Local::now().timestamp();
        let mut msgs = self
            .messages
            .lock()
            .map_err(|e| ChatError::Internal(format!("messages lock poisoned: {}", e)))?;
        let entry = msgs.entry(sid).or_default();

        if let Some(content) = user {
            entry.push(ChatMessage {
                id: Uuid::new_v4(),
                session_id: sid,
                role: "user".to_string(),
                content: content.to_string(),
                kind: None,
                created_at: now,
            });
        }
        entry.push(ChatMessage {
            id: Uuid::new_v4(),
            session_id: sid,
            role: "assistant".to_string(),
            content: reply.text.clone(),
            kind: Some(reply.kind),
            created_at: now,
        });

        if entry.len() > self.config.history_limit {
            let excess = entry.len() - self.config.history_limit;
            entry.drain(..excess);
        }
        Ok(())
    }
}

/// Listing entry for a session.
pub fn summarize(session: &ChatSession) -> ChatSessionSummary {
    ChatSessionSummary {
        id: session.id,
        started_at: format_epoch(session.started_at),
        last_message_at: format_epoch(session.last_message_at),
        message_count: session.context.message_count,
        topic: session.context.current_topic,
    }
}

/// Format epoch seconds as an RFC 3339 string.
pub fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.to_rfc3339())
        .unwrap_or_else(|| epoch.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::FixedPicker;
    use crate::types::{ProductType, ReplyKind, Topic};
    use std::sync::Arc;

    fn default_config() -> ChatConfig {
        ChatConfig::default()
    }

    fn make_orchestrator(config: ChatConfig) -> ChatOrchestrator {
        let responder = Responder::with_picker(ReplyBook::default(), Box::new(FixedPicker(0)));
        ChatOrchestrator::with_responder(config, responder)
    }

    // ---- Construction ----

    #[test]
    fn test_new_orchestrator() {
        let orch = ChatOrchestrator::new(default_config(), AgencyConfig::default());
        assert!(orch.list_sessions().is_empty());
        assert_eq!(orch.active_sessions(), 0);
    }

    // ---- Validation ----

    #[test]
    fn test_disabled_returns_error() {
        let orch = make_orchestrator(ChatConfig {
            enabled: false,
            ..ChatConfig::default()
        });
        assert!(matches!(
            orch.handle_message("hello", None).unwrap_err(),
            ChatError::Disabled
        ));
        assert!(matches!(orch.open_session().unwrap_err(), ChatError::Disabled));
        assert!(matches!(
            orch.quick_reply(QuickReply::Services, None).unwrap_err(),
            ChatError::Disabled
        ));
    }

    #[test]
    fn test_empty_message_returns_error() {
        let orch = make_orchestrator(default_config());
        assert!(matches!(
            orch.handle_message("", None).unwrap_err(),
            ChatError::EmptyMessage
        ));
    }

    #[test]
    fn test_whitespace_only_message_is_empty() {
        let orch = make_orchestrator(default_config());
        assert!(matches!(
            orch.handle_message("   \n\t", None).unwrap_err(),
            ChatError::EmptyMessage
        ));
        assert_eq!(orch.active_sessions(), 0);
    }

    #[test]
    fn test_message_too_long_returns_error() {
        let orch = make_orchestrator(default_config());
        let long_msg = "a".repeat(2001);
        assert!(matches!(
            orch.handle_message(&long_msg, None).unwrap_err(),
            ChatError::MessageTooLong(2000)
        ));
    }

    #[test]
    fn test_message_at_max_length_ok() {
        let orch = make_orchestrator(default_config());
        let msg = "a".repeat(2000);
        assert!(orch.handle_message(&msg, None).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let orch = make_orchestrator(ChatConfig {
            max_message_length: 5,
            ..ChatConfig::default()
        });
        assert!(orch.handle_message("héllo", None).is_ok());
        assert!(orch.handle_message("héllos", None).is_err());
    }

    // ---- Sessions ----

    #[test]
    fn test_open_session_returns_welcome() {
        let orch = make_orchestrator(default_config());
        let opened = orch.open_session().unwrap();
        assert!(!opened.welcome.is_empty());
        let session = orch.get_session(opened.session_id).unwrap();
        assert_eq!(session.context.message_count, 0);

        let history = orch.get_history(opened.session_id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, "assistant");
        assert_eq!(history[0].kind, Some(ReplyKind::Welcome));
    }

    #[test]
    fn test_handle_message_creates_session() {
        let orch = make_orchestrator(default_config());
        let (resp, sid) = orch.handle_message("hello", None).unwrap();
        assert_eq!(resp.kind, ReplyKind::GreetingFirst);
        assert_eq!(resp.context.message_count, 1);
        assert_ne!(sid, Uuid::nil());
        assert_eq!(orch.list_sessions().len(), 1);
    }

    #[test]
    fn test_same_session_id_reuses_session() {
        let orch = make_orchestrator(default_config());
        let (_, sid1) = orch.handle_message("hello", None).unwrap();
        let (resp, sid2) = orch.handle_message("hello", Some(sid1)).unwrap();
        assert_eq!(sid1, sid2);
        assert_eq!(resp.kind, ReplyKind::GreetingLater);
        assert_eq!(resp.context.message_count, 2);
        assert_eq!(orch.list_sessions().len(), 1);
    }

    #[test]
    fn test_invalid_session_id_creates_new() {
        let orch = make_orchestrator(default_config());
        let fake_sid = Uuid::new_v4();
        let (resp, sid) = orch.handle_message("hello", Some(fake_sid)).unwrap();
        assert_ne!(sid, fake_sid);
        assert_eq!(resp.context.message_count, 1);
    }

    #[test]
    fn test_expired_session_creates_new() {
        let orch = make_orchestrator(default_config());
        let (_, sid) = orch.handle_message("tell me about branding", None).unwrap();

        {
            let mut sessions = orch.sessions.lock().unwrap();
            let session = sessions.get_mut(&sid).unwrap();
            session.last_message_at -= 31 * 60;
        }

        let (resp, new_sid) = orch.handle_message("hello", Some(sid)).unwrap();
        assert_ne!(new_sid, sid);
        assert_eq!(resp.kind, ReplyKind::GreetingFirst);
        assert_eq!(resp.context.current_topic, None);
        assert!(orch.get_session(sid).is_none());
    }

    #[test]
    fn test_sessions_do_not_share_context() {
        let orch = make_orchestrator(default_config());
        let (_, a) = orch.handle_message("i need an online store", None).unwrap();
        let (resp, b) = orch.handle_message("we sell jeans", None).unwrap();
        assert_ne!(a, b);
        assert_eq!(resp.context.product_type, None);

        let (resp, _) = orch.handle_message("we sell jeans", Some(a)).unwrap();
        assert_eq!(resp.kind, ReplyKind::ClothingStore);
        assert_eq!(resp.context.product_type, Some(ProductType::Clothing));
    }

    #[test]
    fn test_get_session_nonexistent() {
        let orch = make_orchestrator(default_config());
        assert!(orch.get_session(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_list_sessions_summaries() {
        let orch = make_orchestrator(default_config());
        let (_, sid) = orch.handle_message("tell me about marketing", None).unwrap();
        orch.handle_message("hello", None).unwrap();

        let list = orch.list_sessions();
        assert_eq!(list.len(), 2);
        let summary = list.iter().find(|s| s.id == sid).unwrap();
        assert_eq!(summary.message_count, 1);
        assert_eq!(summary.topic, Some(Topic::Marketing));
        assert!(summary.started_at.contains('T'));
    }

    #[test]
    fn test_delete_session() {
        let orch = make_orchestrator(default_config());
        let (_, sid) = orch.handle_message("hello", None).unwrap();
        orch.delete_session(sid).unwrap();
        assert!(orch.get_session(sid).is_none());
        assert!(matches!(
            orch.get_history(sid).unwrap_err(),
            ChatError::SessionNotFound(_)
        ));
    }

    #[test]
    fn test_delete_session_not_found() {
        let orch = make_orchestrator(default_config());
        let sid = Uuid::new_v4();
        match orch.delete_session(sid).unwrap_err() {
            ChatError::SessionNotFound(id) => assert_eq!(id, sid),
            other => panic!("unexpected error: {other}"),
        }
    }

    // ---- History ----

    #[test]
    fn test_get_history_records_both_roles() {
        let orch = make_orchestrator(default_config());
        let (resp, sid) = orch.handle_message("  Hello  ", None).unwrap();
        let history = orch.get_history(sid).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[0].content, "Hello");
        assert_eq!(history[0].kind, None);
        assert_eq!(history[1].role, "assistant");
        assert_eq!(history[1].content, resp.reply);
        assert_eq!(history[1].kind, Some(ReplyKind::GreetingFirst));
    }

    #[test]
    fn test_history_is_bounded() {
        let orch = make_orchestrator(ChatConfig {
            history_limit: 4,
            ..ChatConfig::default()
        });
        let (_, sid) = orch.handle_message("first", None).unwrap();
        for text in ["second", "third", "fourth"] {
            orch.handle_message(text, Some(sid)).unwrap();
        }
        let history = orch.get_history(sid).unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "third");
        assert_eq!(history[2].content, "fourth");
    }

    #[test]
    fn test_get_history_session_not_found() {
        let orch = make_orchestrator(default_config());
        assert!(matches!(
            orch.get_history(Uuid::new_v4()).unwrap_err(),
            ChatError::SessionNotFound(_)
        ));
    }

    // ---- Quick replies ----

    #[test]
    fn test_quick_reply_leaves_context_untouched() {
        let orch = make_orchestrator(default_config());
        let (before, sid) = orch.handle_message("i want to speak to an agent", None).unwrap();
        let (resp, same) = orch.quick_reply(QuickReply::Contact, Some(sid)).unwrap();
        assert_eq!(same, sid);
        assert_eq!(resp.kind, ReplyKind::QuickReplyContact);
        assert_eq!(resp.context, before.context);
        assert_eq!(orch.get_history(sid).unwrap().len(), 3);
    }

    #[test]
    fn test_quick_reply_without_session_opens_one() {
        let orch = make_orchestrator(default_config());
        let (resp, sid) = orch.quick_reply(QuickReply::Services, None).unwrap();
        assert_eq!(resp.kind, ReplyKind::QuickReplyServices);
        assert_eq!(resp.context.message_count, 0);
        assert!(orch.get_session(sid).is_some());
    }

    // ---- Conversation flow ----

    #[test]
    fn test_handoff_then_contact_flow() {
        let orch = make_orchestrator(default_config());
        let (resp, sid) = orch.handle_message("I want to speak to an agent", None).unwrap();
        assert_eq!(resp.kind, ReplyKind::Handoff);
        assert!(resp.context.transfer_requested);
        assert!(resp.context.awaiting_contact);

        let (resp, _) = orch.handle_message("reach me at jane@x.com", Some(sid)).unwrap();
        assert_eq!(resp.kind, ReplyKind::ContactReceived);
        assert!(resp.context.contact_provided);
        assert!(!resp.context.awaiting_contact);

        let stored = orch.get_session(sid).unwrap();
        assert_eq!(stored.context, resp.context);
    }

    // ---- Expiry ----

    #[test]
    fn test_purge_expired() {
        let orch = make_orchestrator(default_config());
        let (_, old) = orch.handle_message("hello", None).unwrap();
        let (_, fresh) = orch.handle_message("hello", None).unwrap();
        {
            let mut sessions = orch.sessions.lock().unwrap();
            sessions.get_mut(&old).unwrap().last_message_at -= 60 * 60;
        }

        assert_eq!(orch.purge_expired().unwrap(), 1);
        assert!(orch.get_session(old).is_none());
        assert!(orch.get_session(fresh).is_some());
        assert_eq!(orch.purge_expired().unwrap(), 0);
    }

    // ---- Concurrency ----

    #[test]
    fn test_concurrent_sessions() {
        let orch = Arc::new(make_orchestrator(default_config()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let orch = Arc::clone(&orch);
                std::thread::spawn(move || {
                    let (_, sid) = orch.handle_message("hello", None).unwrap();
                    for _ in 0..4 {
                        orch.handle_message("tell me about pricing", Some(sid)).unwrap();
                    }
                    sid
                })
            })
            .collect();

        for handle in handles {
            let sid = handle.join().unwrap();
            let session = orch.get_session(sid).unwrap();
            assert_eq!(session.context.message_count, 5);
        }
        assert_eq!(orch.active_sessions(), 8);
    }

    #[test]
    fn test_record_skips_removed_session() {
        let orch = make_orchestrator(default_config());
        let sid = Uuid::new_v4();
        let reply = Reply::new(ReplyKind::Menu, "menu");

        orch.record(&HashMap::new(), sid, Some("hello"), &reply).unwrap();
        assert!(orch.messages.lock().unwrap().get(&sid).is_none());
    }

    #[test]
    fn test_delete_racing_messages_leaves_no_orphan_history() {
        let orch = Arc::new(make_orchestrator(default_config()));
        let (_, sid) = orch.handle_message("hello", None).unwrap();

        let writer = {
            let orch = Arc::clone(&orch);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    orch.handle_message("tell me about branding", Some(sid)).unwrap();
                }
            })
        };
        let deleter = {
            let orch = Arc::clone(&orch);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let _ = orch.delete_session(sid);
                    let _ = orch.purge_expired();
                }
            })
        };
        writer.join().unwrap();
        deleter.join().unwrap();

        let sessions = orch.sessions.lock().unwrap();
        let msgs = orch.messages.lock().unwrap();
        assert!(msgs.keys().all(|id| sessions.contains_key(id)));
    }

    // ---- Helpers ----

    #[test]
    fn test_format_epoch_valid() {
        let s = format_epoch(1_700_000_000);
        assert!(s.starts_with("2023-11-1"));
    }

    #[test]
    fn test_format_epoch_zero() {
        assert!(!format_epoch(0).is_empty());
    }
}
