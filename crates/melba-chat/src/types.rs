//! Shared data types for the chat engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Conversation context
// =============================================================================

/// Coarse subject area of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Website,
    Branding,
    Marketing,
    Ecommerce,
}

impl Topic {
    /// Lower-case name used in reply text and over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Website => "website",
            Topic::Branding => "branding",
            Topic::Marketing => "marketing",
            Topic::Ecommerce => "ecommerce",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product category recognized inside an e-commerce conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Clothing,
}

/// Kind of project the visitor described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    NewWebsite,
}

/// Per-session conversation state read and updated by the responder.
///
/// Invariant: `contact_provided` implies `!awaiting_contact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Last recognized subject area.
    pub current_topic: Option<Topic>,
    /// Inbound user messages processed so far.
    pub message_count: u32,
    /// The visitor asked for a human agent. Never reset within a session.
    pub transfer_requested: bool,
    /// The responder asked for an email or phone number and is waiting on it.
    pub awaiting_contact: bool,
    /// Contact details arrived while `awaiting_contact` was set.
    pub contact_provided: bool,
    /// Product category, only set inside an e-commerce conversation.
    pub product_type: Option<ProductType>,
    /// Project category detected by the website rules.
    pub project_type: Option<ProjectType>,
}

// =============================================================================
// Replies
// =============================================================================

/// Which rule (or canned source) produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Handoff,
    HandoffContactOnFile,
    ContactReceived,
    Clarification,
    GreetingFirst,
    GreetingLater,
    ClothingStore,
    WebsiteTechnology,
    WebsiteNew,
    WebsiteCost,
    Website,
    HelpWebsite,
    Help,
    Consultation,
    AffirmativeClothingStore,
    AffirmativeWebsite,
    AffirmativeContactRequest,
    Affirmative,
    Services,
    Branding,
    Marketing,
    Ecommerce,
    Pricing,
    Timeline,
    Contact,
    Portfolio,
    About,
    Process,
    LowSignalEcommerce,
    LowSignal,
    Escalation,
    TopicDefault,
    Menu,
    QuickReplyServices,
    QuickReplyContact,
    QuickReplyHelp,
    Welcome,
}

/// A reply produced by the responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Reply text; may contain `<ol>`, `<ul>`, `<li>` and `<a>` markup.
    pub text: String,
    pub kind: ReplyKind,
}

impl Reply {
    pub fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Reply plus the context it left behind, as returned to transports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub kind: ReplyKind,
    pub context: ConversationContext,
}

// =============================================================================
// Sessions
// =============================================================================

/// A chat session owning exactly one conversation context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    /// Epoch seconds.
    pub started_at: i64,
    /// Epoch seconds.
    pub last_message_at: i64,
    pub context: ConversationContext,
}

/// Session listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub id: Uuid,
    pub started_at: String,
    pub last_message_at: String,
    pub message_count: u32,
    pub topic: Option<Topic>,
}

/// A message stored in session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    /// Set on assistant messages.
    pub kind: Option<ReplyKind>,
    pub created_at: i64,
}

/// Result of opening a session: its id and the welcome line shown first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOpened {
    pub session_id: Uuid,
    pub welcome: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_blank() {
        let ctx = ConversationContext::default();
        assert_eq!(ctx.current_topic, None);
        assert_eq!(ctx.message_count, 0);
        assert!(!ctx.transfer_requested);
        assert!(!ctx.awaiting_contact);
        assert!(!ctx.contact_provided);
        assert_eq!(ctx.product_type, None);
        assert_eq!(ctx.project_type, None);
    }

    #[test]
    fn test_topic_names() {
        assert_eq!(Topic::Website.as_str(), "website");
        assert_eq!(Topic::Branding.to_string(), "branding");
        assert_eq!(Topic::Marketing.as_str(), "marketing");
        assert_eq!(Topic::Ecommerce.to_string(), "ecommerce");
    }

    #[test]
    fn test_topic_serializes_snake_case() {
        let json = serde_json::to_string(&Topic::Ecommerce).unwrap();
        assert_eq!(json, "\"ecommerce\"");
        let kind = serde_json::to_string(&ReplyKind::AffirmativeContactRequest).unwrap();
        assert_eq!(kind, "\"affirmative_contact_request\"");
    }

    #[test]
    fn test_context_json_shape() {
        let ctx = ConversationContext {
            current_topic: Some(Topic::Ecommerce),
            message_count: 3,
            product_type: Some(ProductType::Clothing),
            ..ConversationContext::default()
        };
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["current_topic"], "ecommerce");
        assert_eq!(value["message_count"], 3);
        assert_eq!(value["product_type"], "clothing");
        assert!(value["project_type"].is_null());
    }
}
