//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin renderer access.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/frames` -- `WebSocket` frame summary stream
/// - `GET /api/snapshot` -- full world snapshot
/// - `GET /api/agents` -- list roaming agents
/// - `GET /api/agents/:id` -- single agent
/// - `GET /api/messages` -- currently live messages
/// - `POST /api/messages` -- submit a floating message
/// - `GET /api/session` -- session identity
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/frames", get(ws::ws_frames))
        // REST API
        .route("/api/snapshot", get(handlers::get_snapshot))
        .route("/api/agents", get(handlers::list_agents))
        .route("/api/agents/{id}", get(handlers::get_agent))
        .route(
            "/api/messages",
            get(handlers::list_messages).post(handlers::submit_message),
        )
        .route("/api/session", get(handlers::get_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
