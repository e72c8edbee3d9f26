//! # Player State Management
//!
//! This module owns everything about the player that the simulation needs:
//! - The physical body that collides with the world
//! - The yaw used to turn movement input into a direction
//! - The controller that turns actions into velocity
//!
//! ## Core Components
//! - `PlayerState`: The player's body, orientation and controller
//! - `PlayerController`: Accumulates input and applies it to the body
//!
//! The host reads the player's position each frame to place its camera; the
//! streamer uses the same position as its focal point.

use cgmath::{Point3, Rad, Vector3};

use crate::config::PlayerConfig;

use super::physics::body::MovingBody;
use super::voxels::coords::world_to_chunk;
use super::PlayerAction;

pub mod controller;

pub use controller::PlayerController;

/// The player's body, orientation and controller.
pub struct PlayerState {
    /// The simulated box
    pub body: MovingBody,
    /// Horizontal rotation (around the Y axis)
    pub yaw: Rad<f32>,
    /// Turns actions into velocity
    pub controller: PlayerController,
}

impl PlayerState {
    /// Creates the player at the configured spawn point.
    ///
    /// # Arguments
    /// * `config` - Spawn point, body size and movement tuning
    pub fn new(config: &PlayerConfig) -> Self {
        let [x, y, z] = config.spawn;
        let body = MovingBody::new(
            Point3::new(x, y, z),
            Vector3::new(config.width, config.height, config.width),
        );

        PlayerState {
            body,
            yaw: Rad(0.0),
            controller: PlayerController::new(config),
        }
    }

    /// Processes player input actions and updates the controller state.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.controller.intake_actions(actions);
    }

    /// Applies the recorded input to the body.
    pub fn apply_controls(&mut self) {
        self.controller.apply(&mut self.body, &mut self.yaw);
    }

    /// Bottom-centre of the player's box.
    pub fn position(&self) -> Point3<f32> {
        self.body.position
    }

    /// The chunk the player is standing in.
    pub fn chunk_position(&self) -> Point3<i32> {
        world_to_chunk(self.body.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_at_configured_point() {
        let config = PlayerConfig {
            spawn: [-20.0, 3.0, 40.5],
            ..PlayerConfig::default()
        };
        let player = PlayerState::new(&config);
        assert_eq!(player.position(), Point3::new(-20.0, 3.0, 40.5));
        assert_eq!(player.chunk_position(), Point3::new(-2, 0, 2));
        assert_eq!(player.body.size, Vector3::new(config.width, config.height, config.width));
        assert!(!player.body.on_ground);
    }
}
