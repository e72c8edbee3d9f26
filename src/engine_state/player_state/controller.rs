//! Translates player actions into body velocity.
//!
//! Walking sets the horizontal velocity directly (there is no acceleration
//! curve), relative to the player's yaw. Jumping sets the vertical velocity,
//! but only while the body is standing on something.

use cgmath::{InnerSpace, Rad, Vector3};

use crate::config::PlayerConfig;
use crate::engine_state::physics::body::MovingBody;
use crate::engine_state::PlayerAction;

/// Accumulates one frame of input and applies it to a body.
#[derive(Debug, Clone)]
pub struct PlayerController {
    // Movement amounts (0 or 1)
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    jump_requested: bool,

    // Yaw change requested this frame, in input units
    rotate_horizontal: f32,

    // Configuration
    walk_speed: f32,
    jump_speed: f32,
    sensitivity: f32,
}

impl PlayerController {
    /// Creates a controller from the player configuration.
    pub fn new(config: &PlayerConfig) -> Self {
        PlayerController {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            jump_requested: false,
            rotate_horizontal: 0.0,
            walk_speed: config.walk_speed,
            jump_speed: config.jump_speed,
            sensitivity: config.turn_sensitivity,
        }
    }

    /// Records the actions for this frame.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.amount_forward = if actions.move_forward { 1.0 } else { 0.0 };
        self.amount_backward = if actions.move_backward { 1.0 } else { 0.0 };
        self.amount_left = if actions.move_left { 1.0 } else { 0.0 };
        self.amount_right = if actions.move_right { 1.0 } else { 0.0 };
        self.jump_requested = actions.jump;
        self.rotate_horizontal = actions.yaw_delta;
    }

    /// Applies the recorded input to `body` and `yaw`, then clears it.
    ///
    /// The horizontal velocity is replaced, so releasing every movement key
    /// stops the body on the next step.
    pub fn apply(&mut self, body: &mut MovingBody, yaw: &mut Rad<f32>) {
        *yaw += Rad(self.rotate_horizontal * self.sensitivity);

        let (yaw_sin, yaw_cos) = yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos);
        let wish = forward * (self.amount_forward - self.amount_backward)
            + right * (self.amount_right - self.amount_left);

        let horizontal = if wish.magnitude2() > 0.0 {
            wish.normalize() * self.walk_speed
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };
        body.velocity.x = horizontal.x;
        body.velocity.z = horizontal.z;

        if self.jump_requested && body.on_ground {
            body.velocity.y = self.jump_speed;
            body.on_ground = false;
        }

        self.reset();
    }

    fn reset(&mut self) {
        self.amount_left = 0.0;
        self.amount_right = 0.0;
        self.amount_forward = 0.0;
        self.amount_backward = 0.0;
        self.jump_requested = false;
        self.rotate_horizontal = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn body() -> MovingBody {
        MovingBody::new(Point3::new(0.0, 1.0, 0.0), Vector3::new(0.6, 1.8, 0.6))
    }

    #[test]
    fn test_forward_follows_yaw() {
        let config = PlayerConfig::default();
        let mut controller = PlayerController::new(&config);
        let mut body = body();
        let mut yaw = Rad(0.0);

        controller.intake_actions(&PlayerAction {
            move_forward: true,
            ..PlayerAction::default()
        });
        controller.apply(&mut body, &mut yaw);
        assert!((body.velocity.x - config.walk_speed).abs() < 1e-5);
        assert!(body.velocity.z.abs() < 1e-5);

        // Input is consumed; the next frame without keys stops the body.
        controller.apply(&mut body, &mut yaw);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let config = PlayerConfig::default();
        let mut controller = PlayerController::new(&config);
        let mut body = body();
        let mut yaw = Rad(0.3);

        controller.intake_actions(&PlayerAction {
            move_forward: true,
            move_right: true,
            ..PlayerAction::default()
        });
        controller.apply(&mut body, &mut yaw);
        let speed = Vector3::new(body.velocity.x, 0.0, body.velocity.z).magnitude();
        assert!((speed - config.walk_speed).abs() < 1e-4);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let config = PlayerConfig::default();
        let mut controller = PlayerController::new(&config);
        let mut body = body();
        let mut yaw = Rad(0.0);
        let jump = PlayerAction {
            jump: true,
            ..PlayerAction::default()
        };

        controller.intake_actions(&jump);
        controller.apply(&mut body, &mut yaw);
        assert_eq!(body.velocity.y, 0.0);

        body.on_ground = true;
        controller.intake_actions(&jump);
        controller.apply(&mut body, &mut yaw);
        assert_eq!(body.velocity.y, config.jump_speed);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_yaw_delta_turns() {
        let config = PlayerConfig {
            turn_sensitivity: 0.5,
            ..PlayerConfig::default()
        };
        let mut controller = PlayerController::new(&config);
        let mut body = body();
        let mut yaw = Rad(0.0);

        controller.intake_actions(&PlayerAction {
            yaw_delta: 2.0,
            ..PlayerAction::default()
        });
        controller.apply(&mut body, &mut yaw);
        assert_eq!(yaw, Rad(1.0));
    }
}
