//! # Physics Integrator
//!
//! Moves a [`MovingBody`] through the voxel world for one frame.
//!
//! ## Step Order
//!
//! Each sub-step runs the same sequence:
//! 1. Depenetration: a body that starts inside solid cells is pushed out along
//!    the face direction needing the smallest move that leaves it free
//! 2. Integration: gravity and the body's own acceleration change its velocity
//! 3. Resolution: the displacement is applied one axis at a time, Y then X
//!    then Z. Each axis queries the box swept over the whole move, so a fast
//!    body cannot skip over a thin wall. A blocked move stops exactly on the
//!    face of the nearest blocking cell and zeroes that velocity component.
//!
//! A frame time larger than `max_substep` is split into equal sub-steps. At
//! most `max_substeps` are taken; time beyond that is dropped so a long stall
//! never produces one huge step.

use cgmath::{Point3, Vector3};

use crate::config::PhysicsConfig;
use crate::engine_state::voxels::block::block_side::BlockSide;

use super::body::MovingBody;
use super::collision::CollisionField;

/// Axis resolution order: Y, then X, then Z.
const AXIS_ORDER: [usize; 3] = [1, 0, 2];

/// Overlaps thinner than this are treated as contact, not penetration.
const CONTACT_EPSILON: f32 = 1e-4;

/// What happened during one `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Number of sub-steps simulated
    pub substeps: u32,
    /// Per axis (X, Y, Z), whether a move along it was blocked in any sub-step
    pub blocked: [bool; 3],
    /// Whether the body had to be pushed out of solid cells
    pub depenetrated: bool,
    /// Frame time not simulated because the sub-step cap was reached
    pub dropped_time: f32,
}

/// Steps bodies against a collision field.
#[derive(Debug, Clone)]
pub struct PhysicsIntegrator {
    config: PhysicsConfig,
}

impl PhysicsIntegrator {
    pub fn new(config: PhysicsConfig) -> Self {
        PhysicsIntegrator { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advances `body` by `dt` seconds.
    ///
    /// # Arguments
    /// * `dt` - Frame time in seconds. Zero, negative or non-finite values leave
    ///   the body untouched.
    /// * `body` - The body to move
    /// * `field` - Solidity of the resident voxels
    ///
    /// # Returns
    /// A `StepReport` describing the sub-steps taken and the collisions seen.
    pub fn update(&self, dt: f32, body: &mut MovingBody, field: &CollisionField<'_>) -> StepReport {
        let mut report = StepReport::default();
        if !dt.is_finite() || dt <= 0.0 {
            return report;
        }

        let (substeps, step, dropped) = self.split(dt);
        report.dropped_time = dropped;
        if dropped > 0.0 {
            log::warn!(
                "Frame time {:.3}s exceeds {} sub-steps, dropping {:.3}s",
                dt,
                substeps,
                report.dropped_time
            );
        }

        for _ in 0..substeps {
            self.substep(step, body, field, &mut report);
            report.substeps += 1;
        }
        report
    }

    /// Number of sub-steps, their length, and the time left unsimulated for a
    /// frame of `dt` seconds.
    fn split(&self, dt: f32) -> (u32, f32, f32) {
        let max_substep = self.config.max_substep;
        if dt <= max_substep {
            return (1, dt, 0.0);
        }

        let needed = (dt / max_substep).ceil();
        if needed > self.config.max_substeps as f32 {
            let count = self.config.max_substeps;
            (count, max_substep, dt - max_substep * count as f32)
        } else {
            let count = needed as u32;
            (count, dt / count as f32, 0.0)
        }
    }

    fn substep(
        &self,
        h: f32,
        body: &mut MovingBody,
        field: &CollisionField<'_>,
        report: &mut StepReport,
    ) {
        if self.depenetrate(body, field) {
            report.depenetrated = true;
        }

        body.velocity += (Vector3::new(0.0, self.config.gravity, 0.0) + body.acceleration) * h;

        body.on_ground = false;
        for axis in AXIS_ORDER {
            let delta = body.velocity[axis] * h;
            if delta == 0.0 {
                continue;
            }
            if Self::move_axis(body, field, axis, delta) {
                report.blocked[axis] = true;
                body.velocity[axis] = 0.0;
                if axis == 1 && delta < 0.0 {
                    body.on_ground = true;
                }
            }
        }
    }

    /// Moves the body by `delta` along one axis.
    ///
    /// # Returns
    /// `true` if the move was cut short by a solid cell.
    fn move_axis(body: &mut MovingBody, field: &CollisionField<'_>, axis: usize, delta: f32) -> bool {
        let start = body.aabb();
        // A face resting against a cell on another axis may sit a rounding error
        // inside it; that cell must not block this move.
        let sweep = start.swept(axis, delta).shrunk_across(axis, CONTACT_EPSILON);

        // Only cells entirely ahead of the leading face can block. Cells the body
        // is already inside are left to depenetration.
        let blockers = field.overlaps_box(&sweep).into_iter().filter(|cell| {
            if delta > 0.0 {
                cell[axis] as f32 >= start.max[axis] - CONTACT_EPSILON
            } else {
                (cell[axis] + 1) as f32 <= start.min[axis] + CONTACT_EPSILON
            }
        });

        let limit = if delta > 0.0 {
            blockers
                .map(|cell| cell[axis] as f32)
                .fold(None, |nearest: Option<f32>, face| Some(nearest.map_or(face, |n| n.min(face))))
        } else {
            blockers
                .map(|cell| (cell[axis] + 1) as f32)
                .fold(None, |nearest: Option<f32>, face| Some(nearest.map_or(face, |n| n.max(face))))
        };

        match limit {
            Some(face) => {
                body.place_face(axis, delta < 0.0, face);
                true
            }
            None => {
                body.position[axis] += delta;
                false
            }
        }
    }

    /// Pushes the body out of any solid cells it overlaps.
    ///
    /// # Returns
    /// `true` if the body was moved.
    fn depenetrate(&self, body: &mut MovingBody, field: &CollisionField<'_>) -> bool {
        let mut moved = false;

        for _ in 0..self.config.depenetration_passes {
            let cells = field.overlaps_box(&body.aabb().shrunk(CONTACT_EPSILON));
            if cells.is_empty() {
                return moved;
            }

            let Some((side, face)) = Self::best_push(body, field, &cells) else {
                break;
            };
            let axis = side.axis();
            body.place_face(axis, side.sign() > 0.0, face);
            if body.velocity[axis] * side.sign() < 0.0 {
                body.velocity[axis] = 0.0;
            }
            moved = true;
        }

        if field.intersects_solid(&body.aabb().shrunk(CONTACT_EPSILON)) {
            log::warn!(
                "Body at {:?} is still embedded after {} depenetration passes",
                body.position,
                self.config.depenetration_passes
            );
            body.velocity = Vector3::new(0.0, 0.0, 0.0);
        }
        moved
    }

    /// Chooses the push direction for the overlapping `cells`.
    ///
    /// Every face direction is tried in `BlockSide::push_out_order`. The
    /// shallowest push that leaves the box free wins; if none does, the
    /// shallowest push overall is used and the next pass continues from there.
    ///
    /// # Returns
    /// The side to push towards and the world coordinate the trailing face of
    /// the box must be placed at.
    fn best_push(
        body: &MovingBody,
        field: &CollisionField<'_>,
        cells: &[Point3<i32>],
    ) -> Option<(BlockSide, f32)> {
        let aabb = body.aabb();
        let mut best_free: Option<(f32, BlockSide, f32)> = None;
        let mut best_any: Option<(f32, BlockSide, f32)> = None;

        for side in BlockSide::push_out_order() {
            let axis = side.axis();
            let (face, depth) = if side.sign() > 0.0 {
                let face = cells.iter().map(|cell| (cell[axis] + 1) as f32).fold(f32::MIN, f32::max);
                (face, face - aabb.min[axis])
            } else {
                let face = cells.iter().map(|cell| cell[axis] as f32).fold(f32::MAX, f32::min);
                (face, aabb.max[axis] - face)
            };

            let mut candidate = *body;
            candidate.place_face(axis, side.sign() > 0.0, face);
            let free = !field.intersects_solid(&candidate.aabb().shrunk(CONTACT_EPSILON));

            if best_any.map_or(true, |(best, _, _)| depth < best) {
                best_any = Some((depth, side, face));
            }
            if free && best_free.map_or(true, |(best, _, _)| depth < best) {
                best_free = Some((depth, side, face));
            }
        }

        best_free
            .or(best_any)
            .map(|(_, side, face)| (side, face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{block_type::BlockType, Block};
    use crate::engine_state::voxels::generator::{GenerationMethod, TerrainGenerator};
    use crate::engine_state::voxels::store::VoxelStore;
    use std::sync::Arc;

    const DT: f32 = 1.0 / 60.0;

    fn floor_store() -> VoxelStore {
        let mut store = VoxelStore::new(
            Arc::new(TerrainGenerator::new(GenerationMethod::Flat { height: 1 })),
            0,
        );
        for x in -1..=0 {
            for z in -1..=0 {
                for y in -1..=0 {
                    store.ensure_chunk(Point3::new(x, y, z)).unwrap();
                }
            }
        }
        store
    }

    fn empty_store_with(cells: &[Point3<i32>]) -> VoxelStore {
        let mut store = VoxelStore::new(Arc::new(TerrainGenerator::new(GenerationMethod::Empty)), 0);
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    store.ensure_chunk(Point3::new(x, y, z)).unwrap();
                }
            }
        }
        for cell in cells {
            store.set(*cell, Block::new(BlockType::STONE)).unwrap();
        }
        store
    }

    /// A floor at `y = 0` with a wall of cells at `x = wall_x` standing on it.
    fn walled_store(wall_x: i32) -> VoxelStore {
        let mut cells = Vec::new();
        for z in -4..=12 {
            for x in -4..=8 {
                cells.push(Point3::new(x, 0, z));
            }
            for y in 1..=15 {
                cells.push(Point3::new(wall_x, y, z));
            }
        }
        empty_store_with(&cells)
    }

    fn player_body(position: Point3<f32>) -> MovingBody {
        MovingBody::new(position, Vector3::new(0.6, 1.8, 0.6))
    }

    #[test]
    fn test_falling_body_rests_on_floor() {
        let store = floor_store();
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
        let mut body = player_body(Point3::new(0.5, 10.0, 0.5));

        for _ in 0..600 {
            integrator.update(DT, &mut body, &field);
        }

        assert_eq!(body.position.y, 1.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let store = floor_store();
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
        let mut body = player_body(Point3::new(0.5, 5.0, 0.5));
        body.velocity = Vector3::new(1.0, -2.0, 3.0);
        let before = body;

        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let report = integrator.update(dt, &mut body, &field);
            assert_eq!(report.substeps, 0);
        }
        assert_eq!(body.position.x.to_bits(), before.position.x.to_bits());
        assert_eq!(body.position.y.to_bits(), before.position.y.to_bits());
        assert_eq!(body.position.z.to_bits(), before.position.z.to_bits());
        assert_eq!(body, before);
    }

    #[test]
    fn test_embedded_body_is_pushed_out_along_shallowest_axis() {
        let store = empty_store_with(&[Point3::new(0, 0, 0)]);
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig::default());

        // Bottom sits 0.25 inside the top of the voxel; every sideways push is deeper.
        let mut body = MovingBody::new(Point3::new(0.5, 0.75, 0.5), Vector3::new(0.5, 0.5, 0.5));
        let report = integrator.update(DT, &mut body, &field);

        assert!(report.depenetrated);
        assert_eq!(body.position, Point3::new(0.5, 1.0, 0.5));
        assert!(!field.intersects_solid(&body.aabb()));
        assert!(body.on_ground);
    }

    #[test]
    fn test_sideways_push_when_it_is_shallower() {
        let store = empty_store_with(&[Point3::new(0, 0, 0)]);
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        });

        // Only 0.125 of the box pokes into the voxel's +X side.
        let mut body = MovingBody::new(Point3::new(1.125, 0.25, 0.5), Vector3::new(0.5, 0.5, 0.5));
        integrator.update(DT, &mut body, &field);

        assert_eq!(body.position, Point3::new(1.25, 0.25, 0.5));
        assert!(!body.on_ground);
    }

    #[test]
    fn test_fast_body_cannot_tunnel_through_wall() {
        let wall: Vec<_> = (-2..4)
            .flat_map(|y| (-2..3).map(move |z| Point3::new(5, y, z)))
            .collect();
        let store = empty_store_with(&wall);
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        });

        let mut body = MovingBody::new(Point3::new(0.5, 0.0, 0.5), Vector3::new(0.5, 1.5, 0.5));
        body.velocity = Vector3::new(600.0, 0.0, 0.0);
        let report = integrator.update(DT, &mut body, &field);

        assert!(report.blocked[0]);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.aabb().max.x, 5.0);
        assert_eq!(body.position.x, 4.75);
    }

    #[test]
    fn test_large_dt_is_split_and_capped() {
        let store = floor_store();
        let field = CollisionField::new(&store);
        let config = PhysicsConfig::default();
        let integrator = PhysicsIntegrator::new(config.clone());
        let mut body = player_body(Point3::new(0.5, 1.5, 0.5));

        let report = integrator.update(config.max_substep * 2.5, &mut body, &field);
        assert_eq!(report.substeps, 3);
        assert_eq!(report.dropped_time, 0.0);

        let report = integrator.update(60.0, &mut body, &field);
        assert_eq!(report.substeps, config.max_substeps);
        assert!(report.dropped_time > 59.0);
        assert_eq!(body.position.y, 1.0);
    }

    #[test]
    fn test_body_walks_along_floor_without_snagging() {
        let store = floor_store();
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
        let mut body = player_body(Point3::new(-8.0, 1.0, -8.0));

        for _ in 0..120 {
            body.velocity.x = 4.0;
            integrator.update(DT, &mut body, &field);
        }
        assert!(body.position.x > -1.0);
        assert_eq!(body.position.y, 1.0);
        assert!(body.on_ground);
    }
    /// Walks diagonally into the wall for two seconds.
    fn slide_along_wall(wall_x: i32, start_x: f32, push_x: f32) -> MovingBody {
        let store = walled_store(wall_x);
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
        let mut body = player_body(Point3::new(start_x, 1.0, 0.5));

        for _ in 0..120 {
            body.velocity.x = push_x;
            body.velocity.z = 3.0;
            integrator.update(DT, &mut body, &field);
        }
        body
    }

    #[test]
    fn test_body_slides_along_wall_on_its_low_side() {
        let body = slide_along_wall(0, 2.3, -3.0);

        assert!((body.aabb().min.x - 1.0).abs() < 1e-4);
        assert!(body.position.z > 6.4);
        assert_eq!(body.position.y, 1.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_body_slides_along_wall_on_its_high_side() {
        let body = slide_along_wall(3, 0.7, 3.0);

        assert!((body.aabb().max.x - 3.0).abs() < 1e-4);
        assert!(body.position.z > 6.4);
        assert_eq!(body.position.y, 1.0);
        assert!(body.on_ground);
    }

    /// Drops the body from `y = 12` while it presses against the wall.
    fn fall_against_wall(wall_x: i32, start_x: f32, push_x: f32) -> MovingBody {
        let store = walled_store(wall_x);
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
        let mut body = player_body(Point3::new(start_x, 12.0, 0.5));

        for _ in 0..60 {
            body.velocity.x = push_x;
            let previous_y = body.position.y;
            integrator.update(DT, &mut body, &field);
            assert!(!body.on_ground, "stuck to the wall at {:?}", body.position);
            assert!(body.position.y < previous_y);
        }

        for _ in 0..240 {
            body.velocity.x = push_x;
            integrator.update(DT, &mut body, &field);
        }
        assert_eq!(body.position.y, 1.0);
        assert!(body.on_ground);
        body
    }

    #[test]
    fn test_body_falls_past_wall_on_its_low_side() {
        let body = fall_against_wall(0, 2.3, -3.0);
        assert!((body.aabb().min.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_body_falls_past_wall_on_its_high_side() {
        let body = fall_against_wall(3, 0.7, 3.0);
        assert!((body.aabb().max.x - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_body_pressed_against_ceiling_still_walks() {
        let mut cells = Vec::new();
        for x in -4..=8 {
            for z in -2..=2 {
                cells.push(Point3::new(x, 3, z));
            }
        }
        let store = empty_store_with(&cells);
        let field = CollisionField::new(&store);
        let integrator = PhysicsIntegrator::new(PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        });
        let mut body = player_body(Point3::new(-3.0, 1.0, 0.5));

        for _ in 0..60 {
            body.velocity.x = 3.0;
            body.velocity.y = 2.0;
            integrator.update(DT, &mut body, &field);
        }
        assert!((body.aabb().max.y - 3.0).abs() < 1e-4);
        assert!(body.position.x > -0.1);
        assert!(!body.on_ground);
    }
}
