//! REST API endpoint handlers for the Observer server.
//!
//! All reads are served from the in-memory [`WorldSnapshot`] held by the
//! shared [`AppState`]; the engine swaps in a fresh snapshot after each
//! frame. The one write endpoint, `POST /api/messages`, never touches
//! world state directly: it forwards the text over the submission
//! channel and the engine applies it between frames.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/snapshot` | Full world snapshot |
//! | `GET` | `/api/agents` | List all roaming agents |
//! | `GET` | `/api/agents/:id` | Single agent |
//! | `GET` | `/api/messages` | Currently live messages |
//! | `GET` | `/api/session` | Session identity |
//! | `POST` | `/api/messages` | Submit a floating message |
//!
//! [`WorldSnapshot`]: crabtown_types::WorldSnapshot

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use tracing::debug;
use uuid::Uuid;

use crabtown_types::AgentId;

use crate::error::ObserverError;
use crate::state::{AppState, SubmitCommand};

/// Request body for `POST /api/messages`.
#[derive(Debug, serde::Deserialize)]
pub struct SubmitRequest {
    /// The message text to float above the town.
    pub text: String,
}

/// Response body for an accepted submission.
#[derive(Debug, serde::Serialize)]
pub struct SubmitResponse {
    /// Always `"accepted"`; the message appears in the next snapshot.
    pub status: &'static str,
}

/// Serve a minimal HTML page showing world status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let handle = snapshot.session_handle.clone();
    let frame = snapshot.frame;
    let elapsed = format!("{:.1}", snapshot.elapsed_secs);
    let agent_count = snapshot.agents.len();
    let message_count = snapshot.messages.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Crab Town Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #ff7675; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #ff7675; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Crab Town Observer</h1>
    <p class="subtitle">A tiny persistent world of wandering crabs</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Session</div>
            <div class="value">{handle}</div>
        </div>
        <div class="metric">
            <div class="label">Frame</div>
            <div class="value">{frame}</div>
        </div>
        <div class="metric">
            <div class="label">Elapsed (s)</div>
            <div class="value">{elapsed}</div>
        </div>
        <div class="metric">
            <div class="label">Crabs</div>
            <div class="value">{agent_count}</div>
        </div>
        <div class="metric">
            <div class="label">Messages</div>
            <div class="value">{message_count}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/snapshot">/api/snapshot</a> -- Full world snapshot</li>
        <li><a href="/api/agents">/api/agents</a> -- List all roaming agents</li>
        <li><a href="/api/agents/:id">/api/agents/:id</a> -- Single agent detail</li>
        <li><a href="/api/messages">/api/messages</a> -- Currently live messages</li>
        <li><a href="/api/session">/api/session</a> -- Session identity</li>
    </ul>
    <p><code>POST /api/messages</code> with <code>{{"text": "..."}}</code> floats a message above the town.</p>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws/frames</code> -- Live frame summary stream</li>
    </ul>
</body>
</html>"#
    ))
}

/// Return the full world snapshot: session handle, elapsed time, every
/// agent's pose, and the live messages with their display attributes.
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&*snapshot)?))
}

/// List all roaming agents with their current poses.
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&snapshot.agents)?))
}

/// Return a single agent by ID.
///
/// # Errors
///
/// Returns 400 for a malformed UUID and 404 for an unknown agent.
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let uuid = Uuid::parse_str(&id)
        .map_err(|_| ObserverError::InvalidUuid(format!("not a valid agent ID: {id}")))?;
    let agent_id = AgentId::from(uuid);

    let snapshot = state.snapshot.read().await;
    let agent = snapshot
        .agents
        .iter()
        .find(|a| a.id == agent_id)
        .ok_or_else(|| ObserverError::NotFound(format!("no agent with ID {id}")))?;

    Ok(Json(serde_json::to_value(agent)?))
}

/// List the currently live messages (already filtered to opacity > 0).
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&snapshot.messages)?))
}

/// Return the session identity (handle and start time).
///
/// # Errors
///
/// Returns 404 until the engine has registered the session.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let session = state.session.read().await;
    let info = session
        .as_ref()
        .ok_or_else(|| ObserverError::NotFound(String::from("session not started yet")))?;
    Ok(Json(serde_json::to_value(info)?))
}

/// Submit a floating message.
///
/// The text is forwarded to the simulation task; the message appears in
/// the next snapshot after the engine processes it. Empty or
/// whitespace-only text is rejected here so the client gets immediate
/// feedback instead of a silent drop.
///
/// # Errors
///
/// Returns 400 for empty text and 500 if the simulation task is gone.
pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    if request.text.trim().is_empty() {
        return Err(ObserverError::InvalidRequest(String::from(
            "message text is empty",
        )));
    }

    debug!(chars = request.text.chars().count(), "Forwarding message submission");

    state
        .submit_tx
        .send(SubmitCommand { text: request.text })
        .await
        .map_err(|_| ObserverError::Internal(String::from("simulation task is not running")))?;

    Ok((StatusCode::ACCEPTED, Json(SubmitResponse { status: "accepted" })))
}
