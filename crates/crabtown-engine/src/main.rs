//! World engine binary for Crab Town.
//!
//! This is the main entry point that wires together the session state,
//! the frame loop, and the observer server. It loads configuration,
//! spawns the crab population, and advances the world at the configured
//! frame cadence until the process is terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `crabtown-config.yaml`
//! 3. Seed the RNG (fixed seed or OS entropy)
//! 4. Start the session: handle, crab population, message board
//! 5. Start the Observer API server on its own task
//! 6. Run the frame loop until `Ctrl-C`
//!
//! All world mutation happens on this task. The observer reads whole
//! snapshots and forwards message submissions over a channel; queued
//! submissions are applied between frames.

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crabtown_observer::state::{AppState, FrameBroadcast};
use crabtown_observer::{start_server, ServerConfig};
use crabtown_sim::{SessionState, SimConfig};

use crate::error::EngineError;

/// Application entry point for the world engine.
///
/// Initializes all subsystems and runs the frame loop until terminated.
///
/// # Errors
///
/// Returns an error if any initialization step or a frame update fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("crabtown-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        frame_interval_ms = config.world.frame_interval_ms,
        agent_count = config.world.agent_count,
        "Configuration loaded"
    );

    // 3. Seed the RNG. Seed 0 means non-reproducible OS entropy.
    let mut rng = if config.world.seed == 0 {
        SmallRng::from_os_rng()
    } else {
        SmallRng::seed_from_u64(config.world.seed)
    };

    // 4. Start the session. SessionState::start logs the handle and
    // population itself.
    let mut session = SessionState::start(&config, &mut rng).map_err(EngineError::from)?;

    // 5. Start the Observer API server.
    let (app_state, mut submit_rx) = AppState::new();
    let app_state = Arc::new(app_state);
    app_state.set_session(session.info()).await;
    app_state.update_snapshot(session.snapshot(0.0)).await;

    // CRABTOWN_PORT overrides the configured port for containerized runs.
    let port = std::env::var("CRABTOWN_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port,
    };
    let server_state = Arc::clone(&app_state);
    tokio::spawn(async move {
        if let Err(e) = start_server(&server_config, server_state).await {
            warn!(error = %e, "Observer server stopped");
        }
    });
    info!(host = config.server.host, port, "Observer API server started");

    // 6. Run the frame loop.
    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.world.frame_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("Entering frame loop");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = started.elapsed().as_secs_f64();

                // Apply queued message submissions before advancing.
                while let Ok(command) = submit_rx.try_recv() {
                    if session.submit_message(&command.text, now, &mut rng).is_none() {
                        warn!("Dropped empty message submission");
                    }
                }

                let summary = session
                    .advance_frame(now, &mut rng)
                    .map_err(EngineError::from)?;

                app_state.update_snapshot(session.snapshot(now)).await;
                app_state.broadcast(&FrameBroadcast {
                    frame: summary.frame,
                    elapsed_secs: now,
                    agents: summary.agents,
                    live_messages: summary.live_messages,
                    pruned: summary.pruned,
                });
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for shutdown signal");
                }
                break;
            }
        }
    }

    info!(frames = session.frames(), "crabtown-engine shutdown complete");

    Ok(())
}

/// Load the simulation configuration from `crabtown-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// A missing file is not an error; defaults describe a complete town.
fn load_config() -> Result<SimConfig, EngineError> {
    let config_path = Path::new("crabtown-config.yaml");
    if config_path.exists() {
        let config = SimConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimConfig::default())
    }
}
