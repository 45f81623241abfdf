//! The two-state wander/wait motion state machine.
//!
//! Each agent alternates between walking in a straight line toward a
//! randomly chosen target in the roaming square ([`MotionMode::Wandering`])
//! and standing still for a random interval ([`MotionMode::Waiting`]).
//! [`advance`] is a pure mutation of a single agent's pose driven by a
//! caller-owned frame loop; the module holds no timers or global state,
//! and agents never interact with each other.
//!
//! Randomness (wander targets, wait durations) goes through an injected
//! [`Rng`] so tests can supply a seeded generator.

use std::f32::consts::FRAC_PI_2;

use rand::Rng;

use crabtown_types::{AgentId, Crab, CrabPose, GroundPoint, MotionMode};

/// Tunable parameters of the motion state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Half-extent of the square from which wander targets are drawn.
    /// Targets lie in `[-roam_half_extent, roam_half_extent)` on both axes.
    pub roam_half_extent: f32,
    /// Distance below which an agent counts as having arrived at its target.
    pub arrival_threshold: f32,
    /// Lower bound (inclusive) of the wait duration drawn on arrival.
    pub wait_min_secs: f32,
    /// Upper bound (exclusive) of the wait duration drawn on arrival.
    pub wait_max_secs: f32,
    /// Gait phase advance per second per unit of speed.
    pub gait_rate: f32,
    /// Gesture phase advance per second. Independent of speed: the claw
    /// gesture is a cosmetic idle motion, not locomotion.
    pub gesture_rate: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            roam_half_extent: 9.0,
            arrival_threshold: 0.5,
            wait_min_secs: 1.0,
            wait_max_secs: 4.0,
            gait_rate: 15.0,
            gesture_rate: 2.0,
        }
    }
}

/// Errors that can occur when advancing an agent.
///
/// These all indicate a programming fault upstream (invalid delta time or
/// corrupted identity data), not a recoverable runtime condition.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    /// The frame delta was NaN or infinite.
    #[error("non-finite frame delta for agent {agent_id}: {delta}")]
    NonFiniteDelta {
        /// The agent being advanced.
        agent_id: AgentId,
        /// The offending delta value.
        delta: f32,
    },

    /// The frame delta was negative.
    #[error("negative frame delta for agent {agent_id}: {delta}")]
    NegativeDelta {
        /// The agent being advanced.
        agent_id: AgentId,
        /// The offending delta value.
        delta: f32,
    },

    /// The agent's base speed is not a positive finite number.
    #[error("invalid speed for agent {agent_id}: {speed}")]
    InvalidSpeed {
        /// The agent being advanced.
        agent_id: AgentId,
        /// The offending speed value.
        speed: f32,
    },
}

/// Draw a uniform wander target inside the roaming square.
pub fn random_target(params: &MotionParams, rng: &mut impl Rng) -> GroundPoint {
    let h = params.roam_half_extent;
    GroundPoint {
        x: rng.random_range(-h..h),
        z: rng.random_range(-h..h),
    }
}

/// Advance one agent's pose by `delta_secs` of simulated time.
///
/// Both phase accumulators always advance, regardless of motion state.
/// A waiting agent counts down and, on expiry, picks a fresh target and
/// starts wandering. A wandering agent steps `speed * delta` toward its
/// target and faces the walk direction offset by a quarter turn (crabs
/// walk sideways); within [`MotionParams::arrival_threshold`] of the
/// target it stops and waits. Overshooting the target on a large delta
/// is acceptable -- the next frame re-evaluates.
///
/// A zero distance to target never divides: it falls into the arrival
/// branch and the agent transitions to waiting.
///
/// # Errors
///
/// Returns a [`MotionError`] if `delta_secs` is negative or non-finite,
/// or if the agent's speed is invalid. Valid input cannot fail.
pub fn advance(
    crab: &Crab,
    pose: &mut CrabPose,
    delta_secs: f32,
    params: &MotionParams,
    rng: &mut impl Rng,
) -> Result<(), MotionError> {
    if !delta_secs.is_finite() {
        return Err(MotionError::NonFiniteDelta {
            agent_id: crab.id,
            delta: delta_secs,
        });
    }
    if delta_secs < 0.0 {
        return Err(MotionError::NegativeDelta {
            agent_id: crab.id,
            delta: delta_secs,
        });
    }
    if !crab.speed.is_finite() || crab.speed <= 0.0 {
        return Err(MotionError::InvalidSpeed {
            agent_id: crab.id,
            speed: crab.speed,
        });
    }

    pose.gait_phase += delta_secs * crab.speed * params.gait_rate;
    pose.gesture_phase += delta_secs * params.gesture_rate;

    match pose.mode {
        MotionMode::Waiting { remaining_secs } => {
            let remaining = remaining_secs - delta_secs;
            if remaining <= 0.0 {
                pose.mode = MotionMode::Wandering {
                    target: random_target(params, rng),
                };
            } else {
                pose.mode = MotionMode::Waiting {
                    remaining_secs: remaining,
                };
            }
        }
        MotionMode::Wandering { target } => {
            let dx = target.x - pose.position.x;
            let dz = target.z - pose.position.z;
            let dist = dx.hypot(dz);

            if dist < params.arrival_threshold {
                pose.mode = MotionMode::Waiting {
                    remaining_secs: rng
                        .random_range(params.wait_min_secs..params.wait_max_secs),
                };
            } else {
                let step = crab.speed * delta_secs;
                pose.position.x += (dx / dist) * step;
                pose.position.z += (dz / dist) * step;
                // Quarter-turn offset: the gait is lateral.
                pose.heading = dx.atan2(dz) + FRAC_PI_2;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use chrono::Utc;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    fn test_crab(speed: f32) -> Crab {
        Crab {
            id: AgentId::new(),
            name: String::from("Grumpy Pinchy"),
            speed,
            color: String::from("#e17055"),
            created_at: Utc::now(),
        }
    }

    fn pose_at(crab: &Crab, x: f32, z: f32, mode: MotionMode) -> CrabPose {
        CrabPose {
            agent_id: crab.id,
            position: GroundPoint { x, z },
            heading: 0.0,
            gait_phase: 0.0,
            gesture_phase: 0.0,
            mode,
        }
    }

    #[test]
    fn wandering_moves_toward_target_at_speed() {
        // Agent at origin, speed 2, target (10, 0), delta 3s => (6, 0),
        // still wandering since the remaining distance is 4.
        let crab = test_crab(2.0);
        let mut pose = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Wandering {
                target: GroundPoint { x: 10.0, z: 0.0 },
            },
        );
        let mut rng = SmallRng::seed_from_u64(1);

        advance(&crab, &mut pose, 3.0, &MotionParams::default(), &mut rng).unwrap();

        assert!((pose.position.x - 6.0).abs() < 1e-5);
        assert!(pose.position.z.abs() < 1e-5);
        assert!(matches!(pose.mode, MotionMode::Wandering { .. }));
    }

    #[test]
    fn arrival_transitions_to_waiting_with_bounded_duration() {
        let crab = test_crab(1.0);
        let mut pose = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Wandering {
                target: GroundPoint { x: 0.3, z: 0.0 },
            },
        );
        let mut rng = SmallRng::seed_from_u64(2);

        advance(&crab, &mut pose, 0.016, &MotionParams::default(), &mut rng).unwrap();

        match pose.mode {
            MotionMode::Waiting { remaining_secs } => {
                assert!((1.0..4.0).contains(&remaining_secs));
            }
            MotionMode::Wandering { .. } => panic!("expected waiting state"),
        }
    }

    #[test]
    fn zero_distance_to_target_waits_without_dividing() {
        let crab = test_crab(1.5);
        let mut pose = pose_at(
            &crab,
            2.0,
            -3.0,
            MotionMode::Wandering {
                target: GroundPoint { x: 2.0, z: -3.0 },
            },
        );
        let mut rng = SmallRng::seed_from_u64(3);

        advance(&crab, &mut pose, 0.016, &MotionParams::default(), &mut rng).unwrap();

        assert!(matches!(pose.mode, MotionMode::Waiting { .. }));
        assert!(pose.position.x.is_finite() && pose.position.z.is_finite());
        assert_eq!(pose.position.x, 2.0);
        assert_eq!(pose.position.z, -3.0);
    }

    #[test]
    fn wait_expiry_picks_target_inside_roaming_square() {
        let crab = test_crab(1.0);
        let params = MotionParams::default();
        let mut rng = SmallRng::seed_from_u64(4);

        for seed in 0..50_u64 {
            let mut rng_inner = SmallRng::seed_from_u64(seed);
            let mut pose = pose_at(
                &crab,
                0.0,
                0.0,
                MotionMode::Waiting { remaining_secs: 0.01 },
            );
            advance(&crab, &mut pose, 0.02, &params, &mut rng_inner).unwrap();
            match pose.mode {
                MotionMode::Wandering { target } => {
                    assert!(target.x.abs() <= params.roam_half_extent);
                    assert!(target.z.abs() <= params.roam_half_extent);
                }
                MotionMode::Waiting { .. } => panic!("expected wandering state"),
            }
        }

        // Waiting with time left just counts down.
        let mut pose = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Waiting { remaining_secs: 2.0 },
        );
        advance(&crab, &mut pose, 0.5, &params, &mut rng).unwrap();
        match pose.mode {
            MotionMode::Waiting { remaining_secs } => {
                assert!((remaining_secs - 1.5).abs() < 1e-5);
            }
            MotionMode::Wandering { .. } => panic!("expected waiting state"),
        }
    }

    #[test]
    fn phases_advance_in_both_states() {
        let crab = test_crab(2.0);
        let params = MotionParams::default();
        let mut rng = SmallRng::seed_from_u64(5);

        let mut waiting = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Waiting { remaining_secs: 10.0 },
        );
        advance(&crab, &mut waiting, 0.1, &params, &mut rng).unwrap();
        // gait: dt * speed * gait_rate = 0.1 * 2 * 15 = 3
        assert!((waiting.gait_phase - 3.0).abs() < 1e-5);
        // gesture: dt * gesture_rate = 0.1 * 2 = 0.2, speed-independent
        assert!((waiting.gesture_phase - 0.2).abs() < 1e-5);

        let mut wandering = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Wandering {
                target: GroundPoint { x: 5.0, z: 5.0 },
            },
        );
        advance(&crab, &mut wandering, 0.1, &params, &mut rng).unwrap();
        assert!(wandering.gait_phase > 0.0);
        assert!(wandering.gesture_phase > 0.0);
    }

    #[test]
    fn heading_only_changes_while_wandering() {
        let crab = test_crab(1.0);
        let params = MotionParams::default();
        let mut rng = SmallRng::seed_from_u64(6);

        let mut waiting = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Waiting { remaining_secs: 5.0 },
        );
        waiting.heading = 1.25;
        advance(&crab, &mut waiting, 0.1, &params, &mut rng).unwrap();
        assert_eq!(waiting.heading, 1.25);

        // Walking in +x: heading = atan2(dx, dz) + pi/2 = pi/2 + pi/2.
        let mut wandering = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Wandering {
                target: GroundPoint { x: 10.0, z: 0.0 },
            },
        );
        advance(&crab, &mut wandering, 0.1, &params, &mut rng).unwrap();
        assert!((wandering.heading - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn positions_stay_finite_under_many_random_frames() {
        let crab = test_crab(1.7);
        let params = MotionParams::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut pose = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Wandering {
                target: GroundPoint { x: 0.0, z: 0.0 },
            },
        );

        for _ in 0..10_000 {
            let dt: f32 = rng.random_range(0.0..0.05);
            advance(&crab, &mut pose, dt, &params, &mut rng).unwrap();
            assert!(pose.position.x.is_finite());
            assert!(pose.position.z.is_finite());
            assert!(pose.heading.is_finite());
        }
    }

    #[test]
    fn zero_delta_is_a_valid_input() {
        let crab = test_crab(1.0);
        let mut pose = pose_at(
            &crab,
            1.0,
            1.0,
            MotionMode::Wandering {
                target: GroundPoint { x: 5.0, z: 5.0 },
            },
        );
        let before = pose.position;
        let mut rng = SmallRng::seed_from_u64(8);

        advance(&crab, &mut pose, 0.0, &MotionParams::default(), &mut rng).unwrap();

        assert_eq!(pose.position.x, before.x);
        assert_eq!(pose.position.z, before.z);
    }

    #[test]
    fn invalid_inputs_fail_loudly() {
        let crab = test_crab(1.0);
        let params = MotionParams::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut pose = pose_at(
            &crab,
            0.0,
            0.0,
            MotionMode::Waiting { remaining_secs: 1.0 },
        );

        assert!(advance(&crab, &mut pose, f32::NAN, &params, &mut rng).is_err());
        assert!(advance(&crab, &mut pose, -0.5, &params, &mut rng).is_err());

        let stopped = test_crab(0.0);
        assert!(advance(&stopped, &mut pose, 0.016, &params, &mut rng).is_err());
    }
}
