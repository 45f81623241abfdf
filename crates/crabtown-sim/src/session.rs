//! Session state: the single owner of all mutable world state.
//!
//! One [`SessionState`] holds the crab population, the message board,
//! and the frame clock. All mutation flows through [`SessionState::advance_frame`]
//! and [`SessionState::submit_message`], which the engine calls from a
//! single task; readers get immutable [`WorldSnapshot`] values instead of
//! access to the live structures.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, warn};

use crabtown_types::{AgentId, AgentView, Crab, CrabPose, MessageId, SessionInfo, WorldSnapshot};

use crate::clock::{ClockError, FrameClock};
use crate::config::SimConfig;
use crate::message::MessageBoard;
use crate::motion::{self, MotionError, MotionParams};
use crate::spawn::{self, SpawnError};

/// Errors that can occur while running a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The frame clock rejected an input or overflowed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A crab's motion update failed.
    #[error("motion error: {source}")]
    Motion {
        /// The underlying motion error.
        #[from]
        source: MotionError,
    },

    /// Spawning the initial population failed.
    #[error("spawn error: {source}")]
    Spawn {
        /// The underlying spawn error.
        #[from]
        source: SpawnError,
    },
}

/// Per-frame bookkeeping returned by [`SessionState::advance_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    /// Frame number.
    pub frame: u64,
    /// Seconds elapsed since the previous frame.
    pub delta_secs: f64,
    /// Number of agents updated.
    pub agents: u32,
    /// Number of live messages after this frame.
    pub live_messages: u32,
    /// Number of messages pruned this frame (0 unless maintenance ran).
    pub pruned: u32,
}

/// The complete mutable state of one running session.
#[derive(Debug)]
pub struct SessionState {
    /// Session author handle, generated once at start.
    handle: String,
    /// Wall-clock time the session started.
    started_at: DateTime<Utc>,
    /// Immutable crab identities, in spawn order.
    crabs: Vec<Crab>,
    /// Mutable pose per crab.
    poses: BTreeMap<AgentId, CrabPose>,
    /// The floating message collection.
    board: MessageBoard,
    /// Frame timing and maintenance cadence.
    clock: FrameClock,
    /// Motion state machine parameters.
    motion: MotionParams,
}

impl SessionState {
    /// Start a new session: generate a handle and spawn the population.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the configuration produces an invalid
    /// clock or spawn setup.
    pub fn start(config: &SimConfig, rng: &mut impl Rng) -> Result<Self, SessionError> {
        let handle = crate::naming::generate_handle(rng);
        let clock = FrameClock::new(config.messages.prune_interval_secs)?;
        let motion_params = config.motion_params();
        let spawned = spawn::spawn_crabs(&config.spawn_params(), &motion_params, rng)?;

        let mut crabs = Vec::with_capacity(spawned.len());
        let mut poses = BTreeMap::new();
        for s in spawned {
            poses.insert(s.crab.id, s.pose);
            crabs.push(s.crab);
        }

        info!(
            handle = %handle,
            agents = crabs.len(),
            world = %config.world.name,
            "Session started"
        );

        Ok(Self {
            handle,
            started_at: Utc::now(),
            crabs,
            poses,
            board: MessageBoard::new(config.message_params()),
            clock,
            motion: motion_params,
        })
    }

    /// Submit a message at session time `now`, authored by the session
    /// handle. Returns `None` for empty or whitespace-only text.
    pub fn submit_message(
        &mut self,
        raw_text: &str,
        now: f64,
        rng: &mut impl Rng,
    ) -> Option<MessageId> {
        self.board.submit(raw_text, &self.handle, now, rng)
    }

    /// Advance the whole world to session time `now`.
    ///
    /// Updates every crab's motion state, and runs the message prune pass
    /// when the maintenance cadence says it is due.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the clock rejects `now` or a motion
    /// update fails. State mutated before the failing agent stays
    /// mutated; callers treat any error here as fatal.
    pub fn advance_frame(
        &mut self,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<FrameSummary, SessionError> {
        let fd = self.clock.frame(now)?;

        // Motion math runs in f32; delta times are frame-scale values
        // where the truncation is far below any meaningful precision.
        #[allow(clippy::cast_possible_truncation)]
        let delta = fd.delta_secs as f32;

        for crab in &self.crabs {
            if let Some(pose) = self.poses.get_mut(&crab.id) {
                motion::advance(crab, pose, delta, &self.motion, rng)?;
            } else {
                warn!(agent_id = %crab.id, "Crab has no pose entry");
            }
        }

        let pruned = if fd.maintenance_due {
            self.board.prune(now)
        } else {
            0
        };

        Ok(FrameSummary {
            frame: fd.frame,
            delta_secs: fd.delta_secs,
            agents: u32::try_from(self.crabs.len()).unwrap_or(u32::MAX),
            live_messages: u32::try_from(self.board.live_view(now).len()).unwrap_or(u32::MAX),
            pruned: u32::try_from(pruned).unwrap_or(u32::MAX),
        })
    }

    /// Build an immutable snapshot of the world at session time `now`.
    ///
    /// Agents appear in spawn order; messages in submission order with
    /// their derived display attributes.
    pub fn snapshot(&self, now: f64) -> WorldSnapshot {
        let agents = self
            .crabs
            .iter()
            .filter_map(|crab| {
                let pose = self.poses.get(&crab.id)?;
                Some(AgentView {
                    id: crab.id,
                    name: crab.name.clone(),
                    color: crab.color.clone(),
                    speed: crab.speed,
                    position: pose.position,
                    heading: pose.heading,
                    gait_phase: pose.gait_phase,
                    gesture_phase: pose.gesture_phase,
                    mode: pose.mode,
                })
            })
            .collect();

        WorldSnapshot {
            session_handle: self.handle.clone(),
            elapsed_secs: now,
            frame: self.clock.frames(),
            agents,
            messages: self.board.live_view(now),
        }
    }

    /// Session identity for the info endpoint.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            handle: self.handle.clone(),
            started_at: self.started_at,
        }
    }

    /// The session author handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Number of crabs in the town.
    pub const fn agent_count(&self) -> usize {
        self.crabs.len()
    }

    /// Number of frames processed so far.
    pub const fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// The message board, read-only.
    pub const fn board(&self) -> &MessageBoard {
        &self.board
    }
}
