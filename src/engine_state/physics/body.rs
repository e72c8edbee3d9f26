//! The simulated box that walks around the voxel world.

use cgmath::{Point3, Vector3};

use super::aabb::Aabb;

/// A box-shaped body moved by the physics integrator.
///
/// `position` is the centre of the bottom face, so a body standing on a floor
/// whose top is at `y = 1` has `position.y == 1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingBody {
    /// Bottom-centre of the box in world space
    pub position: Point3<f32>,
    /// Width, height and depth of the box
    pub size: Vector3<f32>,
    /// Velocity in blocks per second
    pub velocity: Vector3<f32>,
    /// Extra acceleration applied every step on top of gravity (input force)
    pub acceleration: Vector3<f32>,
    /// Whether the last downward move was stopped by a solid cell
    pub on_ground: bool,
}

impl MovingBody {
    /// Creates a body at rest.
    pub fn new(position: Point3<f32>, size: Vector3<f32>) -> Self {
        MovingBody {
            position,
            size,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            acceleration: Vector3::new(0.0, 0.0, 0.0),
            on_ground: false,
        }
    }

    /// The body's current collision box.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_bottom_center(self.position, self.size)
    }

    /// Moves the body so that one face of its box lies exactly at `coordinate`.
    ///
    /// # Arguments
    /// * `axis` - 0, 1 or 2 for X, Y or Z
    /// * `min_face` - `true` to place the low face, `false` for the high face
    /// * `coordinate` - World coordinate of the face
    pub fn place_face(&mut self, axis: usize, min_face: bool, coordinate: f32) {
        let extent = self.size[axis];
        self.position[axis] = match (axis, min_face) {
            (1, true) => coordinate,
            (1, false) => coordinate - extent,
            (_, true) => coordinate + extent * 0.5,
            (_, false) => coordinate - extent * 0.5,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_face_is_exact() {
        let mut body = MovingBody::new(Point3::new(0.3, 0.8, 0.0), Vector3::new(0.5, 1.75, 0.5));

        body.place_face(1, true, 1.0);
        assert_eq!(body.aabb().min.y, 1.0);

        body.place_face(0, false, 4.0);
        assert_eq!(body.aabb().max.x, 4.0);

        body.place_face(2, true, -2.0);
        assert_eq!(body.aabb().min.z, -2.0);
    }
}
