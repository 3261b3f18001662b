//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use melba_core::config::ServerConfig;
use melba_core::error::MelbaError;

use crate::handlers;
use crate::state::AppState;

/// Request bodies above this size are rejected before reaching a handler.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    let chat_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/chat/quick-reply", post(handlers::quick_reply))
        .route(
            "/chat/sessions",
            get(handlers::list_sessions).post(handlers::open_session),
        )
        .route(
            "/chat/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/chat/sessions/{id}/history", get(handlers::session_history));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", chat_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured origins plus the server's own localhost address.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    for host in ["127.0.0.1", "localhost"] {
        if let Ok(v) = format!("http://{}:{}", host, server.port).parse::<HeaderValue>() {
            origins.push(v);
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Start the HTTP server on the configured address.
pub async fn start_server(state: AppState) -> Result<(), MelbaError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MelbaError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| MelbaError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
