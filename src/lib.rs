#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! The simulation core of a first-person voxel world: chunked voxel storage,
//! deterministic terrain generation, chunk streaming around the player, and
//! box-versus-voxel physics.
//!
//! Rendering, windowing and input devices live outside this crate. A host
//! drives the simulation through [`EngineState::tick`] and reads the player's
//! state back from the returned [`TickReport`].
//!
//! ## Key Modules
//!
//! * `config` - Engine configuration loaded from JSON
//! * `engine_state` - The world, the player, physics and background workers
//! * `error` - The engine's error type
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     if let Err(err) = voxel_sandbox::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```
//!
//! `run()` starts a headless host loop. Embedders create an
//! [`EngineState`] themselves and call `tick` from their own frame loop.

use log::info;

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::EngineConfig;
pub use engine_state::{EngineState, PlayerAction, TickReport};
pub use error::{EngineError, EngineResult};

/// Runs the headless host loop.
///
/// Logging goes to stdout, filtered by `RUST_LOG`. The first command-line
/// argument, if present, is the path of a JSON config file; otherwise the
/// defaults are used. The loop simulates `host.frames` frames with the player
/// walking forward and jumping now and then, and logs progress as it goes.
pub fn run() -> EngineResult<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => {
            let config = EngineConfig::default();
            config.validate()?;
            config
        }
    };

    run_headless(&config);
    Ok(())
}

/// Simulates `config.host.frames` frames without a window.
fn run_headless(config: &EngineConfig) {
    let host = &config.host;
    let frame_time = web_time::Duration::from_secs_f32(host.frame_time);
    let mut engine = EngineState::new(config);
    let start = web_time::Instant::now();
    let mut last_frame = start;

    info!("Simulating {} frames", host.frames);

    for frame in 0..host.frames {
        let actions = PlayerAction {
            move_forward: true,
            jump: frame % 90 == 0,
            yaw_delta: if frame % 240 == 0 { 0.5 } else { 0.0 },
            controls_locked: true,
            ..PlayerAction::default()
        };

        let now = web_time::Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let report = engine.tick(dt, &actions);

        if host.stats_interval > 0 && frame % host.stats_interval == 0 {
            info!(
                "Frame {}: player at ({:.2}, {:.2}, {:.2}), on ground: {}, {} chunks loaded",
                frame,
                report.position.x,
                report.position.y,
                report.position.z,
                report.on_ground,
                report.loaded_chunks
            );
            engine.world.log_stats();
        }

        let elapsed = last_frame.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    info!(
        "Simulated {} frames in {:.2?}",
        engine.frame(),
        start.elapsed()
    );
    engine.world.log_stats();
}
