//! Melba API crate - axum HTTP server and chat route handlers.
//!
//! Exposes the chat orchestrator over JSON: session management, message
//! handling, quick replies, history, and a health check.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
