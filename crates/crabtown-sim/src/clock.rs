//! Frame clock: per-frame delta time and the fixed maintenance cadence.
//!
//! The clock is a pure time bookkeeper with no decision logic. The caller
//! (the engine's frame loop) supplies `now` as seconds since session start;
//! the clock answers two questions: how much time passed since the last
//! frame, and whether the periodic maintenance pass (message pruning) is
//! due. Render cadence and maintenance cadence stay independent -- a
//! faster or slower frame rate never changes how often maintenance runs.
//!
//! Non-finite time inputs indicate an upstream bug and are reported as
//! errors rather than silently absorbed.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The supplied time value was NaN or infinite.
    #[error("non-finite time value: {secs}")]
    NonFiniteTime {
        /// The offending time value in seconds.
        secs: f64,
    },

    /// Invalid clock configuration (e.g. non-positive maintenance period).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// Frame counter would overflow.
    #[error("frame counter overflow: cannot advance beyond u64::MAX")]
    FrameOverflow,
}

/// The result of one clock advance: delta time plus maintenance flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    /// Frame number (1-indexed; the first call to `frame` returns 1).
    pub frame: u64,
    /// Seconds elapsed since the previous frame, clamped to be
    /// non-negative. The first frame always reports 0.
    pub delta_secs: f64,
    /// Whether the periodic maintenance pass is due this frame.
    pub maintenance_due: bool,
}

/// Tracks frame-to-frame elapsed time and a fixed maintenance period.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    /// Session time of the previous frame, if any frame has run yet.
    last_frame: Option<f64>,
    /// Seconds between maintenance passes.
    maintenance_period: f64,
    /// Session time at which the next maintenance pass is due.
    next_maintenance: f64,
    /// Number of frames processed so far.
    frame: u64,
}

impl FrameClock {
    /// Create a new frame clock with the given maintenance period.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the period is not a
    /// positive finite number.
    pub fn new(maintenance_period_secs: f64) -> Result<Self, ClockError> {
        if !maintenance_period_secs.is_finite() || maintenance_period_secs <= 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "maintenance period must be positive and finite, got {maintenance_period_secs}"
                ),
            });
        }
        Ok(Self {
            last_frame: None,
            maintenance_period: maintenance_period_secs,
            next_maintenance: maintenance_period_secs,
            frame: 0,
        })
    }

    /// Advance the clock to `now` and report the frame delta.
    ///
    /// `now` is seconds since session start. A `now` earlier than the
    /// previous frame yields a zero delta rather than a negative one; the
    /// motion layer's precondition is `delta >= 0`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::NonFiniteTime`] if `now` is NaN or infinite,
    /// or [`ClockError::FrameOverflow`] if the frame counter would wrap.
    pub fn frame(&mut self, now: f64) -> Result<FrameDelta, ClockError> {
        if !now.is_finite() {
            return Err(ClockError::NonFiniteTime { secs: now });
        }

        let delta_secs = self
            .last_frame
            .map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);

        self.frame = self.frame.checked_add(1).ok_or(ClockError::FrameOverflow)?;

        let maintenance_due = now >= self.next_maintenance;
        if maintenance_due {
            self.next_maintenance = now + self.maintenance_period;
        }

        Ok(FrameDelta {
            frame: self.frame,
            delta_secs,
            maintenance_due,
        })
    }

    /// Return the number of frames processed so far.
    pub const fn frames(&self) -> u64 {
        self.frame
    }

    /// Return the configured maintenance period in seconds.
    pub const fn maintenance_period_secs(&self) -> f64 {
        self.maintenance_period
    }
}
