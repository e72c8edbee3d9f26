//! # Engine State Module
//!
//! The core engine module that owns the simulation and advances it one frame
//! at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `physics` - Box-versus-voxel collision and integration
//! * `player_state` - The player's body and input handling
//! * `task_management` - Worker threads for background chunk generation
//! * `voxels` - Voxel data, terrain generation and chunk streaming
//!
//! ## Architecture
//!
//! `EngineState` holds the world and the player. The host calls
//! [`EngineState::tick`] once per frame with the elapsed time and the actions
//! derived from its input devices. Each tick streams chunks around the player
//! first and then runs physics against the freshly streamed world, so the
//! player never collides with a chunk that is about to be evicted.
//!
//! Physics only runs while the host reports its controls as locked (pointer
//! captured). Streaming runs every frame regardless.

use cgmath::{Point3, Vector3};

use physics::integrator::{PhysicsIntegrator, StepReport};
use player_state::PlayerState;
use voxels::{streamer::StreamReport, world::World};

use crate::config::EngineConfig;

pub mod physics;
pub mod player_state;
pub mod task_management;
pub mod voxels;

/// Represents player actions derived from input.
///
/// The host fills this in from whatever input devices it has; the engine
/// never sees raw key codes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerAction {
    /// Movement actions - true while the key is held
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Jump; only has an effect while standing on something
    pub jump: bool,
    /// Horizontal look input for this frame
    pub yaw_delta: f32,
    /// Whether the host has captured the pointer. Physics and movement are
    /// paused while this is false.
    pub controls_locked: bool,
}

/// Snapshot of the simulation after one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Player position (bottom-centre of the box)
    pub position: Point3<f32>,
    /// Player velocity
    pub velocity: Vector3<f32>,
    /// Whether the player is standing on something
    pub on_ground: bool,
    /// Resident chunk count after streaming
    pub loaded_chunks: usize,
    /// What streaming did this tick
    pub stream: StreamReport,
    /// What physics did this tick; `None` while controls are unlocked
    pub physics: Option<StepReport>,
}

/// The main state container for the engine.
pub struct EngineState {
    /// The streamed voxel world
    pub world: World,
    /// The player
    pub player: PlayerState,
    /// Steps the player's body
    integrator: PhysicsIntegrator,
    /// Number of ticks processed
    frame: u64,
}

impl EngineState {
    /// Creates a new engine state from a configuration.
    ///
    /// No chunk is loaded until the first tick.
    ///
    /// # Arguments
    /// * `config` - The validated engine configuration
    pub fn new(config: &EngineConfig) -> Self {
        EngineState {
            world: World::new(&config.world),
            player: PlayerState::new(&config.player),
            integrator: PhysicsIntegrator::new(config.physics.clone()),
            frame: 0,
        }
    }

    /// Advances the simulation by one frame.
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous frame. Zero or negative values
    ///   stream the world but leave the player where it is.
    /// * `actions` - The player's actions for this frame
    ///
    /// # Returns
    /// A `TickReport` with the player's new state.
    pub fn tick(&mut self, dt: f32, actions: &PlayerAction) -> TickReport {
        self.frame += 1;

        let stream = self.world.update(self.player.position());

        let physics = if actions.controls_locked {
            self.player.intake_actions(actions);
            self.player.apply_controls();
            let field = self.world.collision_field();
            Some(self.integrator.update(dt, &mut self.player.body, &field))
        } else {
            None
        };

        let body = &self.player.body;
        TickReport {
            position: body.position,
            velocity: body.velocity,
            on_ground: body.on_ground,
            loaded_chunks: self.world.loaded_chunk_count(),
            stream,
            physics,
        }
    }

    /// Number of ticks processed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::generator::GenerationMethod;

    fn flat_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.world.generation = GenerationMethod::Flat { height: 1 };
        config.world.stream_radius = 1;
        config.player.spawn = [0.5, 4.0, 0.5];
        config
    }

    #[test]
    fn test_unlocked_controls_only_stream() {
        let mut engine = EngineState::new(&flat_config());
        let report = engine.tick(1.0 / 60.0, &PlayerAction::default());

        assert_eq!(report.loaded_chunks, 27);
        assert!(report.physics.is_none());
        assert_eq!(report.position, Point3::new(0.5, 4.0, 0.5));
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn test_locked_controls_fall_and_land() {
        let mut engine = EngineState::new(&flat_config());
        let actions = PlayerAction {
            controls_locked: true,
            ..PlayerAction::default()
        };

        let mut report = engine.tick(1.0 / 60.0, &actions);
        for _ in 0..120 {
            report = engine.tick(1.0 / 60.0, &actions);
        }
        assert_eq!(report.position.y, 1.0);
        assert!(report.on_ground);
        assert_eq!(report.velocity.y, 0.0);
    }

    #[test]
    fn test_zero_dt_tick_keeps_player_still() {
        let mut engine = EngineState::new(&flat_config());
        let actions = PlayerAction {
            controls_locked: true,
            ..PlayerAction::default()
        };
        let before = engine.player().body;
        let report = engine.tick(0.0, &actions);
        assert_eq!(engine.player().body, before);
        assert_eq!(report.physics.map(|step| step.substeps), Some(0));
    }
}
