//! Error types for the world engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the frame loop.

/// Top-level error for the world engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crabtown_sim::ConfigError,
    },

    /// Session startup or a frame update failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: crabtown_sim::SessionError,
    },
}
