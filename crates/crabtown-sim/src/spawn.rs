//! Session-start agent spawning.
//!
//! Creates the town's crab population once at session start: random
//! names, positions inside the roaming square, speeds from the configured
//! range, and shell colors from the palette. Agents are never destroyed
//! afterwards; the motion module is the only thing that mutates them.

use chrono::Utc;
use rand::Rng;
use tracing::info;

use crabtown_types::{AgentId, Crab, CrabPose, GroundPoint, MotionMode};

use crate::motion::MotionParams;
use crate::naming;

/// Parameters for the session-start spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    /// Number of crabs to create.
    pub agent_count: u32,
    /// Lower bound (inclusive) of the base speed range, units/second.
    pub speed_min: f32,
    /// Upper bound (exclusive) of the base speed range, units/second.
    pub speed_max: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            agent_count: 12,
            speed_min: 0.5,
            speed_max: 2.0,
        }
    }
}

/// Errors that can occur during spawning.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The speed range is empty or contains non-positive values.
    #[error("invalid speed range: [{min}, {max})")]
    InvalidSpeedRange {
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },

    /// The roaming square has a non-positive half-extent.
    #[error("invalid roaming half-extent: {half_extent}")]
    InvalidRoamExtent {
        /// Configured half-extent.
        half_extent: f32,
    },
}

/// A freshly spawned crab: identity plus initial pose.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedCrab {
    /// Immutable identity.
    pub crab: Crab,
    /// Initial motion state.
    pub pose: CrabPose,
}

/// Spawn the session's crab population.
///
/// Each crab starts at a random position in the roaming square with
/// heading 0, zeroed phase accumulators, and a wander target equal to its
/// own position -- the first frame trips the arrival branch, so every
/// crab begins with a short wait before picking its first real target.
///
/// # Errors
///
/// Returns a [`SpawnError`] if the speed range or roaming extent is
/// invalid. An `agent_count` of 0 yields an empty town, not an error.
pub fn spawn_crabs(
    params: &SpawnParams,
    motion: &MotionParams,
    rng: &mut impl Rng,
) -> Result<Vec<SpawnedCrab>, SpawnError> {
    if !params.speed_min.is_finite()
        || !params.speed_max.is_finite()
        || params.speed_min <= 0.0
        || params.speed_max <= params.speed_min
    {
        return Err(SpawnError::InvalidSpeedRange {
            min: params.speed_min,
            max: params.speed_max,
        });
    }
    let h = motion.roam_half_extent;
    if !h.is_finite() || h <= 0.0 {
        return Err(SpawnError::InvalidRoamExtent { half_extent: h });
    }

    let capacity = usize::try_from(params.agent_count).unwrap_or_default();
    let mut spawned = Vec::with_capacity(capacity);
    for _ in 0..params.agent_count {
        let id = AgentId::new();
        let name = naming::generate_crab_name(rng);
        let speed = rng.random_range(params.speed_min..params.speed_max);
        let color = naming::pick_shell_color(rng).to_owned();
        let position = GroundPoint {
            x: rng.random_range(-h..h),
            z: rng.random_range(-h..h),
        };

        info!(agent_id = %id, name = %name, speed, "Spawned crab");

        spawned.push(SpawnedCrab {
            crab: Crab {
                id,
                name,
                speed,
                color,
                created_at: Utc::now(),
            },
            pose: CrabPose {
                agent_id: id,
                position,
                heading: 0.0,
                gait_phase: 0.0,
                gesture_phase: 0.0,
                mode: MotionMode::Wandering { target: position },
            },
        });
    }

    Ok(spawned)
}
