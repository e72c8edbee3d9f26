//! # Engine Configuration
//!
//! Tuning values for the world, physics, the player and the headless host loop.
//!
//! Every section falls back to its defaults for missing fields, so a config
//! file only needs to list what it changes:
//!
//! ```json
//! {
//!     "world": { "seed": 42, "stream_radius": 3, "generation": { "method": "flat", "height": 4 } },
//!     "physics": { "gravity": -20.0 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::generator::GenerationMethod;
use crate::error::{EngineError, EngineResult};

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub host: HostConfig,
}

/// Chunk storage, generation and streaming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed passed to the terrain generator
    pub seed: u32,
    /// How new chunks are filled
    pub generation: GenerationMethod,
    /// Chebyshev radius, in chunks, of the resident cube around the player
    pub stream_radius: i32,
    /// Upper bound on resident chunks; `None` for no bound
    pub max_resident_chunks: Option<usize>,
    /// Keep block edits across eviction
    pub retain_edits: bool,
    /// Worker threads for chunk generation; 0 generates inline
    pub background_workers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            generation: GenerationMethod::default(),
            stream_radius: 2,
            max_resident_chunks: None,
            retain_edits: false,
            background_workers: 0,
        }
    }
}

/// Integrator tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration in blocks per second squared (negative is down)
    pub gravity: f32,
    /// Longest simulated sub-step, in seconds
    pub max_substep: f32,
    /// Most sub-steps per frame
    pub max_substeps: u32,
    /// Most push-out attempts per sub-step for an embedded body
    pub depenetration_passes: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: -9.8,
            max_substep: 0.05,
            max_substeps: 8,
            depenetration_passes: 4,
        }
    }
}

/// The player's body and movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Bottom-centre of the player's box at startup
    pub spawn: [f32; 3],
    /// Box width and depth
    pub width: f32,
    /// Box height
    pub height: f32,
    /// Horizontal speed in blocks per second
    pub walk_speed: f32,
    /// Upward velocity given by a jump
    pub jump_speed: f32,
    /// Radians of yaw per unit of look input
    pub turn_sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            spawn: [0.5, 40.0, 0.5],
            width: 0.6,
            height: 1.8,
            walk_speed: 4.3,
            jump_speed: 6.0,
            turn_sensitivity: 1.0,
        }
    }
}

/// The headless loop started by `run()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Frames to simulate before exiting
    pub frames: u32,
    /// Target frame time in seconds
    pub frame_time: f32,
    /// Log world stats every this many frames; 0 disables
    pub stats_interval: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            frames: 600,
            frame_time: 1.0 / 60.0,
            stats_interval: 120,
        }
    }
}

impl EngineConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a JSON config string.
    pub fn from_json(contents: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> EngineResult<()> {
        let world = &self.world;
        if world.stream_radius < 0 {
            return Err(EngineError::invalid_config(
                "world.stream_radius",
                "must not be negative",
            ));
        }
        if world.max_resident_chunks == Some(0) {
            return Err(EngineError::invalid_config(
                "world.max_resident_chunks",
                "must allow at least one chunk",
            ));
        }
        if let GenerationMethod::Perlin(params) = &world.generation {
            if !(params.scale > 0.0) {
                return Err(EngineError::invalid_config(
                    "world.generation.scale",
                    "must be positive",
                ));
            }
            if params.dirt_depth < 0 {
                return Err(EngineError::invalid_config(
                    "world.generation.dirt_depth",
                    "must not be negative",
                ));
            }
        }

        let physics = &self.physics;
        if !physics.gravity.is_finite() {
            return Err(EngineError::invalid_config("physics.gravity", "must be finite"));
        }
        if !(physics.max_substep > 0.0) || !physics.max_substep.is_finite() {
            return Err(EngineError::invalid_config(
                "physics.max_substep",
                "must be a positive number of seconds",
            ));
        }
        if physics.max_substeps == 0 {
            return Err(EngineError::invalid_config(
                "physics.max_substeps",
                "must be at least 1",
            ));
        }

        let player = &self.player;
        if !(player.width > 0.0) || !(player.height > 0.0) {
            return Err(EngineError::invalid_config(
                "player.width/height",
                "must be positive",
            ));
        }
        if player.walk_speed < 0.0 || player.jump_speed < 0.0 {
            return Err(EngineError::invalid_config(
                "player.walk_speed/jump_speed",
                "must not be negative",
            ));
        }
        if player.spawn.iter().any(|component| !component.is_finite()) {
            return Err(EngineError::invalid_config("player.spawn", "must be finite"));
        }

        if !(self.host.frame_time > 0.0) || !self.host.frame_time.is_finite() {
            return Err(EngineError::invalid_config(
                "host.frame_time",
                "must be a positive number of seconds",
            ));
        }
        Ok(())
    }
}
