//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its body or path via axum extractors, calls the chat
//! orchestrator, and returns JSON.

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use melba_chat::orchestrator::summarize;
use melba_chat::{
    ChatMessage, ChatResponse, ChatSessionSummary, ConversationContext, QuickReply, ReplyKind,
    Topic,
};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Unknown or malformed ids start a new session.
    pub session_id: Option<String>,
}

/// Request body for POST /api/chat/quick-reply.
#[derive(Debug, Deserialize)]
pub struct QuickReplyRequest {
    #[serde(default)]
    pub reply_type: String,
    pub session_id: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub active_sessions: usize,
}

/// Reply to a chat message or quick reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReplyResponse {
    pub success: bool,
    pub response: String,
    pub kind: ReplyKind,
    pub session_id: Uuid,
    pub topic: Option<Topic>,
    pub awaiting_contact: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionOpenedResponse {
    pub session_id: Uuid,
    pub welcome: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<ChatSessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub summary: ChatSessionSummary,
    pub context: ConversationContext,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid session id: {}", raw)))
}

fn optional_session_id(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Cosmetic pause before a reply, configured per deployment.
async fn reply_delay(state: &AppState) {
    let ms = state.orchestrator.config().reply_delay_ms;
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

fn to_reply_response(response: ChatResponse, session_id: Uuid) -> ChatReplyResponse {
    ChatReplyResponse {
        success: true,
        response: response.reply,
        kind: response.kind,
        session_id,
        topic: response.context.current_topic,
        awaiting_contact: response.context.awaiting_contact,
        timestamp: Utc::now(),
    }
}

// =============================================================================
// Health
// =============================================================================

/// GET /health - liveness and session count.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.orchestrator.active_sessions(),
    })
}

// =============================================================================
// Chat
// =============================================================================

/// POST /api/chat - answer one visitor message.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReplyResponse>, ApiError> {
    let Json(req) = payload?;
    let requested = optional_session_id(req.session_id.as_deref());
    let (response, sid) = state.orchestrator.handle_message(&req.message, requested)?;
    reply_delay(&state).await;
    Ok(Json(to_reply_response(response, sid)))
}

/// POST /api/chat/quick-reply - answer a quick-reply button.
pub async fn quick_reply(
    State(state): State<AppState>,
    payload: Result<Json<QuickReplyRequest>, JsonRejection>,
) -> Result<Json<ChatReplyResponse>, ApiError> {
    let Json(req) = payload?;
    let requested = optional_session_id(req.session_id.as_deref());
    let kind = QuickReply::parse(&req.reply_type);
    let (response, sid) = state.orchestrator.quick_reply(kind, requested)?;
    reply_delay(&state).await;
    Ok(Json(to_reply_response(response, sid)))
}

/// POST /api/chat/sessions - open a session and fetch its welcome line.
pub async fn open_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionOpenedResponse>), ApiError> {
    let opened = state.orchestrator.open_session()?;
    Ok((
        StatusCode::CREATED,
        Json(SessionOpenedResponse {
            session_id: opened.session_id,
            welcome: opened.welcome,
        }),
    ))
}

/// GET /api/chat/sessions - list sessions.
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.orchestrator.list_sessions(),
    })
}

/// GET /api/chat/sessions/{id} - session summary and context.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetailResponse>, ApiError> {
    let sid = parse_session_id(&id)?;
    let session = state
        .orchestrator
        .get_session(sid)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", sid)))?;

    Ok(Json(SessionDetailResponse {
        summary: summarize(&session),
        context: session.context,
    }))
}

/// DELETE /api/chat/sessions/{id} - end a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let sid = parse_session_id(&id)?;
    state.orchestrator.delete_session(sid)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/chat/sessions/{id}/history - message history.
pub async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let sid = parse_session_id(&id)?;
    let messages = state.orchestrator.get_history(sid)?;
    Ok(Json(HistoryResponse { messages }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_session_id_ignores_garbage() {
        assert_eq!(optional_session_id(None), None);
        assert_eq!(optional_session_id(Some("not-a-uuid")), None);
        let id = Uuid::new_v4();
        assert_eq!(optional_session_id(Some(&id.to_string())), Some(id));
    }

    #[test]
    fn test_parse_session_id_rejects_garbage() {
        assert!(matches!(
            parse_session_id("nope"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
