//! Core entity structs for the Crabtown simulation.
//!
//! Records split the same way the simulation does: immutable identity
//! ([`Crab`], [`Message`]) versus mutable motion state ([`CrabPose`]),
//! plus the read-only projections served to the renderer ([`AgentView`],
//! [`LiveMessage`], [`WorldSnapshot`]).
//!
//! Derived display attributes (opacity, float offset) appear only on the
//! view types -- they are computed from `(record, now)` at read time and
//! never stored on the records themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{AgentId, MessageId};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point on the ground plane (y is fixed at 0 for all agents).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GroundPoint {
    /// Horizontal x coordinate.
    pub x: f32,
    /// Horizontal z coordinate.
    pub z: f32,
}

/// A point in the air above the town (message spawn positions).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AirPoint {
    /// Horizontal x coordinate.
    pub x: f32,
    /// Height above the ground plane.
    pub y: f32,
    /// Horizontal z coordinate.
    pub z: f32,
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// The two states of an agent's motion state machine.
///
/// Each variant carries the state it needs: a wandering crab knows its
/// target, a waiting crab knows how long it has left to wait. There is
/// no separate "state tag plus scratch fields" -- the enum is the tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MotionMode {
    /// Walking in a straight line toward a target in the roaming square.
    Wandering {
        /// The point the agent is heading toward.
        target: GroundPoint,
    },
    /// Standing still until the wait counter runs out.
    Waiting {
        /// Seconds of waiting remaining.
        remaining_secs: f32,
    },
}

/// Immutable identity of a roaming agent, fixed at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Crab {
    /// Unique agent identifier.
    pub id: AgentId,
    /// Display name, e.g. "Grumpy Pinchy".
    pub name: String,
    /// Base movement speed in world units per second (always positive).
    pub speed: f32,
    /// Shell color as a hex string. Cosmetic: consumed only by the renderer.
    pub color: String,
    /// Wall-clock time the agent was created.
    pub created_at: DateTime<Utc>,
}

/// Mutable motion state of an agent, updated once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CrabPose {
    /// The agent this pose belongs to.
    pub agent_id: AgentId,
    /// Current position on the ground plane.
    pub position: GroundPoint,
    /// Heading angle in radians (only updated while wandering).
    pub heading: f32,
    /// Gait phase accumulator driving leg animation. Monotonically
    /// increasing; wrap-safe since only its sine is consumed.
    pub gait_phase: f32,
    /// Gesture phase accumulator driving idle claw animation.
    pub gesture_phase: f32,
    /// Current motion state.
    pub mode: MotionMode,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// An ephemeral floating message, immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Message text, trimmed and truncated at submission.
    pub text: String,
    /// Handle of the session that submitted the message.
    pub author: String,
    /// Session time (seconds since session start) the message was created.
    pub created_secs: f64,
    /// Wall-clock creation timestamp, kept for the record.
    pub created_at: DateTime<Utc>,
    /// Where the message floats in the air.
    pub position: AirPoint,
}

/// A still-live message with its derived display attributes.
///
/// Produced by the live view for a specific `now`; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LiveMessage {
    /// Unique message identifier.
    pub id: MessageId,
    /// Message text.
    pub text: String,
    /// Author handle.
    pub author: String,
    /// Spawn position.
    pub position: AirPoint,
    /// Seconds since the message was created.
    pub age_secs: f64,
    /// Visibility scalar in [0, 1], non-increasing with age.
    pub opacity: f64,
    /// Vertical display offset: bounded oscillation plus slow upward drift.
    pub float_offset: f64,
}

// ---------------------------------------------------------------------------
// Snapshot views
// ---------------------------------------------------------------------------

/// Identity and pose of one agent as served to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentView {
    /// Unique agent identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Shell color hex string.
    pub color: String,
    /// Base movement speed in units per second.
    pub speed: f32,
    /// Current position on the ground plane.
    pub position: GroundPoint,
    /// Heading angle in radians.
    pub heading: f32,
    /// Gait phase accumulator (drives procedural leg motion).
    pub gait_phase: f32,
    /// Gesture phase accumulator (drives procedural claw motion).
    pub gesture_phase: f32,
    /// Current motion state.
    pub mode: MotionMode,
}

/// The per-frame read-only snapshot pulled by the renderer.
///
/// Agents appear in spawn order, messages in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// The session's generated author handle.
    pub session_handle: String,
    /// Seconds since session start at the time the snapshot was taken.
    pub elapsed_secs: f64,
    /// Frame number the snapshot was produced on.
    pub frame: u64,
    /// All agents with their current pose.
    pub agents: Vec<AgentView>,
    /// All currently-live messages with derived display attributes.
    pub messages: Vec<LiveMessage>,
}

/// Session identity exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionInfo {
    /// The generated author handle, stable for the session's lifetime.
    pub handle: String,
    /// Wall-clock time the session started.
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_mode_serde_roundtrip() {
        let mode = MotionMode::Wandering {
            target: GroundPoint { x: 3.5, z: -2.0 },
        };
        let json = serde_json::to_string(&mode).ok();
        assert!(json.is_some());
        let restored: Result<MotionMode, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(mode));
    }

    #[test]
    fn snapshot_default_is_empty() {
        let snapshot = WorldSnapshot::default();
        assert!(snapshot.agents.is_empty());
        assert!(snapshot.messages.is_empty());
        assert_eq!(snapshot.frame, 0);
    }
}
