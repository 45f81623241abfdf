//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use crabtown_observer::router::build_router;
use crabtown_observer::state::{AppState, SubmitCommand};
use crabtown_types::{
    AgentId, AgentView, AirPoint, GroundPoint, LiveMessage, MessageId, MotionMode, SessionInfo,
    WorldSnapshot,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

fn sample_agent(id: AgentId) -> AgentView {
    AgentView {
        id,
        name: String::from("Grumpy Pinchy"),
        color: String::from("#e17055"),
        speed: 1.25,
        position: GroundPoint { x: 2.0, z: -3.5 },
        heading: 0.75,
        gait_phase: 12.0,
        gesture_phase: 4.0,
        mode: MotionMode::Waiting {
            remaining_secs: 2.0,
        },
    }
}

fn sample_message(id: MessageId) -> LiveMessage {
    LiveMessage {
        id,
        text: String::from("Hello town"),
        author: String::from("WaveCrab42"),
        position: AirPoint {
            x: 1.0,
            y: 4.0,
            z: -2.0,
        },
        age_secs: 3.0,
        opacity: 0.8,
        float_offset: 0.2,
    }
}

async fn make_test_state() -> (Arc<AppState>, mpsc::Receiver<SubmitCommand>) {
    let (state, submit_rx) = AppState::new();
    let state = Arc::new(state);

    let agent_id = AgentId::new();
    let message_id = MessageId::new();

    state
        .update_snapshot(WorldSnapshot {
            session_handle: String::from("WaveCrab42"),
            elapsed_secs: 3.5,
            frame: 210,
            agents: vec![sample_agent(agent_id)],
            messages: vec![sample_message(message_id)],
        })
        .await;

    state
        .set_session(SessionInfo {
            handle: String::from("WaveCrab42"),
            started_at: Utc::now(),
        })
        .await;

    (state, submit_rx)
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let router = build_router(state);
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn index_serves_html_with_session_handle() {
    let (state, _rx) = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Crab Town Observer"));
    assert!(html.contains("WaveCrab42"));
}

#[tokio::test]
async fn snapshot_returns_the_full_world() {
    let (state, _rx) = make_test_state().await;
    let (status, body) = get_json(state, "/api/snapshot").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_handle"], "WaveCrab42");
    assert_eq!(body["frame"], 210);
    assert_eq!(body["agents"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn agents_endpoint_lists_poses() {
    let (state, _rx) = make_test_state().await;
    let (status, body) = get_json(state, "/api/agents").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Grumpy Pinchy");
    assert_eq!(body[0]["color"], "#e17055");
    assert!(body[0]["mode"]["Waiting"].is_object());
}

#[tokio::test]
async fn single_agent_lookup_by_id() {
    let (state, _rx) = make_test_state().await;
    let id = state.snapshot.read().await.agents.first().unwrap().id;
    let (status, body) = get_json(state, &format!("/api/agents/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Grumpy Pinchy");
}

#[tokio::test]
async fn unknown_agent_is_404_and_bad_uuid_is_400() {
    let (state, _rx) = make_test_state().await;

    let missing = uuid::Uuid::now_v7();
    let (status, _) = get_json(Arc::clone(&state), &format!("/api/agents/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(state, "/api/agents/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn messages_endpoint_lists_live_messages() {
    let (state, _rx) = make_test_state().await;
    let (status, body) = get_json(state, "/api/messages").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["text"], "Hello town");
    assert_eq!(body[0]["author"], "WaveCrab42");
    assert!(body[0]["opacity"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn session_endpoint_reports_identity() {
    let (state, _rx) = make_test_state().await;
    let (status, body) = get_json(state, "/api/session").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handle"], "WaveCrab42");
}

#[tokio::test]
async fn session_is_404_before_the_engine_registers_it() {
    let (state, _rx) = AppState::new();
    let (status, _) = get_json(Arc::new(state), "/api/session").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_forwards_text_over_the_channel() {
    let (state, mut rx) = make_test_state().await;
    let router = build_router(state);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/messages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text": "Nice beach today"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let command = rx.recv().await.unwrap();
    assert_eq!(command.text, "Nice beach today");
}

#[tokio::test]
async fn empty_submission_is_rejected_with_400() {
    let (state, mut rx) = make_test_state().await;
    let router = build_router(state);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/messages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text": "   "}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(rx.try_recv().is_err());
}
