//! Observer API server for the Crab Town world.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/frames`) for real-time frame summary
//!   streaming via [`tokio::sync::broadcast`]
//! - **REST endpoints** for reading world state (snapshot, agents, live
//!   messages, session identity)
//! - **A submit endpoint** (`POST /api/messages`) that forwards message
//!   text to the simulation task over an mpsc channel
//! - **Minimal HTML status page** (`GET /`) showing the session handle,
//!   frame count, and population
//!
//! # Architecture
//!
//! The observer reads from an in-memory [`WorldSnapshot`] that the
//! engine swaps in whole after each frame, so REST reads never block
//! the frame loop and never observe a half-updated world. The one write
//! path goes through the submission channel; the engine applies queued
//! submissions between frames, keeping all world mutation on a single
//! task.
//!
//! [`WorldSnapshot`]: crabtown_types::WorldSnapshot

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::{AppState, FrameBroadcast, SubmitCommand};
