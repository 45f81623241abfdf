//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for frame summaries, the
//! current [`WorldSnapshot`] served by the REST endpoints, and the
//! submission channel that carries message text to the simulation task.
//! The engine owns the only mutable world; the observer sees whole
//! snapshots swapped in after each frame, so REST reads never observe a
//! half-updated world.

use std::sync::Arc;

use crabtown_types::{SessionInfo, WorldSnapshot};
use tokio::sync::{broadcast, mpsc, RwLock};

/// Capacity of the broadcast channel for frame summaries.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// Capacity of the message submission channel.
const SUBMIT_CAPACITY: usize = 64;

/// JSON-serializable frame summary pushed over the `WebSocket`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FrameBroadcast {
    /// The frame number.
    pub frame: u64,
    /// Seconds since session start.
    pub elapsed_secs: f64,
    /// Number of roaming agents.
    pub agents: u32,
    /// Number of currently live messages.
    pub live_messages: u32,
    /// Number of messages pruned this frame.
    pub pruned: u32,
}

/// A message submission forwarded to the simulation task.
///
/// The observer never mutates world state directly; submissions cross
/// this channel and the engine applies them between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCommand {
    /// Raw message text as received from the client.
    pub text: String,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for frame summary messages.
    pub tx: broadcast::Sender<FrameBroadcast>,
    /// The current world snapshot (swapped whole after each frame).
    pub snapshot: Arc<RwLock<WorldSnapshot>>,
    /// Session identity, set once when the session starts.
    pub session: Arc<RwLock<Option<SessionInfo>>>,
    /// Sender half of the message submission channel.
    pub submit_tx: mpsc::Sender<SubmitCommand>,
}

impl AppState {
    /// Create a new application state with an empty snapshot.
    ///
    /// Returns the state and the receiver half of the submission
    /// channel, which the engine drains between frames.
    pub fn new() -> (Self, mpsc::Receiver<SubmitCommand>) {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (submit_tx, submit_rx) = mpsc::channel(SUBMIT_CAPACITY);
        (
            Self {
                tx,
                snapshot: Arc::new(RwLock::new(WorldSnapshot::default())),
                session: Arc::new(RwLock::new(None)),
                submit_tx,
            },
            submit_rx,
        )
    }

    /// Record the session identity served by `GET /api/session`.
    pub async fn set_session(&self, info: SessionInfo) {
        let mut session = self.session.write().await;
        *session = Some(info);
    }

    /// Swap in a fresh world snapshot.
    pub async fn update_snapshot(&self, snapshot: WorldSnapshot) {
        let mut current = self.snapshot.write().await;
        *current = snapshot;
    }

    /// Subscribe to the frame broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<FrameBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a frame summary to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, summary: &FrameBroadcast) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}
