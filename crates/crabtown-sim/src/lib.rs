//! Crab Town simulation core.
//!
//! A persistent-world simulation of a small crab town: autonomous agents
//! wander between random targets and pause on arrival, while visitors
//! float short-lived messages in the air above them. This crate holds
//! the pure simulation logic; the observer crate exposes it over HTTP
//! and WebSocket, and the engine binary drives the frame loop.
//!
//! Modules:
//! - [`clock`]: per-frame delta time and the maintenance cadence
//! - [`config`]: YAML configuration with defaults and validation
//! - [`message`]: ephemeral message lifecycle (submit, live view, prune)
//! - [`motion`]: the wander/wait motion state machine
//! - [`naming`]: crab names and session handles from fixed vocabularies
//! - [`spawn`]: session-start population creation
//! - [`session`]: the single owner of all mutable world state

pub mod clock;
pub mod config;
pub mod message;
pub mod motion;
pub mod naming;
pub mod session;
pub mod spawn;

pub use clock::{ClockError, FrameClock, FrameDelta};
pub use config::{ConfigError, SimConfig};
pub use message::{MessageBoard, MessageParams};
pub use motion::{MotionError, MotionParams};
pub use session::{FrameSummary, SessionError, SessionState};
pub use spawn::{SpawnError, SpawnParams, SpawnedCrab};
