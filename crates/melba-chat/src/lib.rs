//! Scripted conversational responder for the MelbaSolution chat widget.
//!
//! Maps free-text visitor messages to canned replies through an ordered
//! keyword rule table, tracks per-session conversation context, and manages
//! chat sessions for the transports in front of it.

pub mod error;
pub mod orchestrator;
pub mod picker;
pub mod quick_reply;
pub mod replies;
pub mod responder;
pub mod session;
pub mod types;
pub mod utterance;

pub use error::ChatError;
pub use orchestrator::ChatOrchestrator;
pub use picker::{FixedPicker, RandomPicker, ReplyPicker};
pub use quick_reply::QuickReply;
pub use replies::ReplyBook;
pub use responder::Responder;
pub use session::SessionManager;
pub use types::{
    ChatMessage, ChatResponse, ChatSession, ChatSessionSummary, ConversationContext, ProductType,
    ProjectType, Reply, ReplyKind, SessionOpened, Topic,
};
pub use utterance::Utterance;
