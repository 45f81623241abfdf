//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `crabtown-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, with serde defaults on every field so a missing
//! file or a partial file both produce a runnable simulation.

use std::path::Path;

use serde::Deserialize;

use crate::message::MessageParams;
use crate::motion::MotionParams;
use crate::spawn::SpawnParams;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but contains invalid values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `crabtown-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimConfig {
    /// World-level settings (name, seed, frame cadence, population).
    #[serde(default)]
    pub world: WorldSection,

    /// Motion state machine parameters.
    #[serde(default)]
    pub motion: MotionSection,

    /// Message lifecycle parameters.
    #[serde(default)]
    pub messages: MessageSection,

    /// Observer server settings.
    #[serde(default)]
    pub server: ServerSection,
}

impl SimConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed YAML or
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid { reason };

        if self.world.frame_interval_ms == 0 {
            return Err(invalid(String::from("world.frame_interval_ms must be at least 1")));
        }
        if !(self.motion.roam_half_extent.is_finite() && self.motion.roam_half_extent > 0.0) {
            return Err(invalid(format!(
                "motion.roam_half_extent must be positive, got {}",
                self.motion.roam_half_extent
            )));
        }
        if !(self.motion.arrival_threshold.is_finite() && self.motion.arrival_threshold > 0.0) {
            return Err(invalid(format!(
                "motion.arrival_threshold must be positive, got {}",
                self.motion.arrival_threshold
            )));
        }
        if self.motion.wait_max_secs <= self.motion.wait_min_secs
            || self.motion.wait_min_secs < 0.0
        {
            return Err(invalid(format!(
                "motion wait range [{}, {}) is empty or negative",
                self.motion.wait_min_secs, self.motion.wait_max_secs
            )));
        }
        if self.motion.speed_max <= self.motion.speed_min || self.motion.speed_min <= 0.0 {
            return Err(invalid(format!(
                "motion speed range [{}, {}) is empty or non-positive",
                self.motion.speed_min, self.motion.speed_max
            )));
        }
        if !(self.messages.ttl_secs.is_finite() && self.messages.ttl_secs > 0.0) {
            return Err(invalid(format!(
                "messages.ttl_secs must be positive, got {}",
                self.messages.ttl_secs
            )));
        }
        if self.messages.max_text_chars == 0 {
            return Err(invalid(String::from("messages.max_text_chars must be at least 1")));
        }
        if !(self.messages.spawn_half_extent.is_finite() && self.messages.spawn_half_extent > 0.0)
        {
            return Err(invalid(format!(
                "messages.spawn_half_extent must be positive, got {}",
                self.messages.spawn_half_extent
            )));
        }
        if !(self.messages.min_height.is_finite() && self.messages.min_height >= 0.0) {
            return Err(invalid(format!(
                "messages.min_height must be non-negative, got {}",
                self.messages.min_height
            )));
        }
        if self.messages.max_height <= self.messages.min_height {
            return Err(invalid(format!(
                "messages height range [{}, {}) is empty",
                self.messages.min_height, self.messages.max_height
            )));
        }
        if !(self.messages.prune_interval_secs.is_finite()
            && self.messages.prune_interval_secs > 0.0)
        {
            return Err(invalid(format!(
                "messages.prune_interval_secs must be positive, got {}",
                self.messages.prune_interval_secs
            )));
        }
        Ok(())
    }

    /// Project the motion section onto [`MotionParams`].
    pub const fn motion_params(&self) -> MotionParams {
        MotionParams {
            roam_half_extent: self.motion.roam_half_extent,
            arrival_threshold: self.motion.arrival_threshold,
            wait_min_secs: self.motion.wait_min_secs,
            wait_max_secs: self.motion.wait_max_secs,
            gait_rate: self.motion.gait_rate,
            gesture_rate: self.motion.gesture_rate,
        }
    }

    /// Project the message section onto [`MessageParams`].
    pub const fn message_params(&self) -> MessageParams {
        MessageParams {
            ttl_secs: self.messages.ttl_secs,
            max_text_chars: self.messages.max_text_chars,
            spawn_half_extent: self.messages.spawn_half_extent,
            min_height: self.messages.min_height,
            max_height: self.messages.max_height,
        }
    }

    /// Project the world section onto [`SpawnParams`].
    pub const fn spawn_params(&self) -> SpawnParams {
        SpawnParams {
            agent_count: self.world.agent_count,
            speed_min: self.motion.speed_min,
            speed_max: self.motion.speed_max,
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldSection {
    /// Human-readable world name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility; 0 means seed from OS entropy.
    #[serde(default)]
    pub seed: u64,

    /// Real-time milliseconds per frame (16 approximates 60 Hz).
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Number of crabs to spawn at session start.
    #[serde(default = "default_agent_count")]
    pub agent_count: u32,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: 0,
            frame_interval_ms: default_frame_interval_ms(),
            agent_count: default_agent_count(),
        }
    }
}

/// Motion state machine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotionSection {
    /// Half-extent of the roaming square; spawn positions and wander
    /// targets both use this single bound.
    #[serde(default = "default_roam_half_extent")]
    pub roam_half_extent: f32,

    /// Arrival distance threshold in world units.
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f32,

    /// Minimum wait duration on arrival, seconds (inclusive).
    #[serde(default = "default_wait_min_secs")]
    pub wait_min_secs: f32,

    /// Maximum wait duration on arrival, seconds (exclusive).
    #[serde(default = "default_wait_max_secs")]
    pub wait_max_secs: f32,

    /// Gait phase advance per second per unit of speed.
    #[serde(default = "default_gait_rate")]
    pub gait_rate: f32,

    /// Gesture phase advance per second.
    #[serde(default = "default_gesture_rate")]
    pub gesture_rate: f32,

    /// Minimum base speed, units/second (inclusive).
    #[serde(default = "default_speed_min")]
    pub speed_min: f32,

    /// Maximum base speed, units/second (exclusive).
    #[serde(default = "default_speed_max")]
    pub speed_max: f32,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            roam_half_extent: default_roam_half_extent(),
            arrival_threshold: default_arrival_threshold(),
            wait_min_secs: default_wait_min_secs(),
            wait_max_secs: default_wait_max_secs(),
            gait_rate: default_gait_rate(),
            gesture_rate: default_gesture_rate(),
            speed_min: default_speed_min(),
            speed_max: default_speed_max(),
        }
    }
}

/// Message lifecycle configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageSection {
    /// Seconds before a message expires.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: f64,

    /// Maximum stored text length in characters.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Half-extent of the horizontal spawn square.
    #[serde(default = "default_spawn_half_extent")]
    pub spawn_half_extent: f32,

    /// Minimum spawn height above the ground plane (inclusive).
    #[serde(default = "default_min_height")]
    pub min_height: f32,

    /// Maximum spawn height above the ground plane (exclusive).
    #[serde(default = "default_max_height")]
    pub max_height: f32,

    /// Seconds between prune passes.
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: f64,
}

impl Default for MessageSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_text_chars: default_max_text_chars(),
            spawn_half_extent: default_spawn_half_extent(),
            min_height: default_min_height(),
            max_height: default_max_height(),
            prune_interval_secs: default_prune_interval_secs(),
        }
    }
}

/// Observer server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_world_name() -> String {
    String::from("Crab Town")
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_agent_count() -> u32 {
    12
}

const fn default_roam_half_extent() -> f32 {
    9.0
}

const fn default_arrival_threshold() -> f32 {
    0.5
}

const fn default_wait_min_secs() -> f32 {
    1.0
}

const fn default_wait_max_secs() -> f32 {
    4.0
}

const fn default_gait_rate() -> f32 {
    15.0
}

const fn default_gesture_rate() -> f32 {
    2.0
}

const fn default_speed_min() -> f32 {
    0.5
}

const fn default_speed_max() -> f32 {
    2.0
}

const fn default_ttl_secs() -> f64 {
    15.0
}

const fn default_max_text_chars() -> usize {
    100
}

const fn default_spawn_half_extent() -> f32 {
    6.0
}

const fn default_min_height() -> f32 {
    3.0
}

const fn default_max_height() -> f32 {
    5.0
}

const fn default_prune_interval_secs() -> f64 {
    1.0
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.agent_count, 12);
        assert_eq!(config.messages.ttl_secs, 15.0);
        assert_eq!(config.motion.roam_half_extent, 9.0);
    }

    #[test]
    fn empty_yaml_parses_to_defaults() {
        let config = SimConfig::parse("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = r"
world:
  agent_count: 3
  seed: 42
messages:
  ttl_secs: 30.0
";
        let config = SimConfig::parse(yaml).unwrap();
        assert_eq!(config.world.agent_count, 3);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.messages.ttl_secs, 30.0);
        // Untouched fields keep their defaults.
        assert_eq!(config.world.frame_interval_ms, 16);
        assert_eq!(config.motion.arrival_threshold, 0.5);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(SimConfig::parse("motion:\n  wait_min_secs: 4.0\n  wait_max_secs: 1.0").is_err());
        assert!(SimConfig::parse("motion:\n  speed_min: 0.0").is_err());
        assert!(SimConfig::parse("motion:\n  roam_half_extent: -9.0").is_err());
        assert!(SimConfig::parse("messages:\n  ttl_secs: 0.0").is_err());
        assert!(SimConfig::parse("messages:\n  max_text_chars: 0").is_err());
        assert!(SimConfig::parse("world:\n  frame_interval_ms: 0").is_err());
    }

    #[test]
    fn degenerate_message_geometry_is_rejected() {
        // A non-positive spawn square or negative floor would hand the
        // message board an empty sampling range at submit time.
        assert!(SimConfig::parse("messages:\n  spawn_half_extent: -1.0").is_err());
        assert!(SimConfig::parse("messages:\n  spawn_half_extent: 0.0").is_err());
        assert!(SimConfig::parse("messages:\n  min_height: -3.0").is_err());
        assert!(
            SimConfig::parse("messages:\n  min_height: 5.0\n  max_height: 3.0").is_err()
        );
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = SimConfig::parse("world: [not, a, map");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn param_projections_carry_the_configured_values() {
        let yaml = r"
motion:
  roam_half_extent: 5.0
  speed_min: 1.0
  speed_max: 3.0
messages:
  spawn_half_extent: 2.5
";
        let config = SimConfig::parse(yaml).unwrap();
        assert_eq!(config.motion_params().roam_half_extent, 5.0);
        assert_eq!(config.message_params().spawn_half_extent, 2.5);
        assert_eq!(config.spawn_params().speed_min, 1.0);
        assert_eq!(config.spawn_params().speed_max, 3.0);
    }
}
