//! # Collision Field
//!
//! A read-only view that answers "which solid cells does this box overlap".
//!
//! The field borrows the voxel store for the duration of one physics update.
//! Cells in chunks that are not resident read as empty, so a body can fall
//! out of the loaded area but never collides with stale data.

use cgmath::Point3;

use crate::engine_state::voxels::store::VoxelStore;

use super::aabb::Aabb;

/// Solidity queries over the resident voxels.
#[derive(Clone, Copy)]
pub struct CollisionField<'a> {
    store: &'a VoxelStore,
}

impl<'a> CollisionField<'a> {
    pub fn new(store: &'a VoxelStore) -> Self {
        CollisionField { store }
    }

    /// Whether the lattice cell at `position` is solid.
    #[inline]
    pub fn is_solid(&self, position: Point3<i32>) -> bool {
        self.store.is_solid(position)
    }

    /// Every solid cell whose unit cube overlaps `aabb` with positive volume.
    ///
    /// Cells are reported in Y, X, Z loop order. A degenerate box overlaps
    /// nothing.
    pub fn overlaps_box(&self, aabb: &Aabb) -> Vec<Point3<i32>> {
        let mut cells = Vec::new();
        self.visit_overlaps(aabb, |cell| {
            cells.push(cell);
            true
        });
        cells
    }

    /// Whether `aabb` overlaps any solid cell. Stops at the first hit.
    pub fn intersects_solid(&self, aabb: &Aabb) -> bool {
        let mut hit = false;
        self.visit_overlaps(aabb, |_| {
            hit = true;
            false
        });
        hit
    }

    /// Calls `visit` for each overlapping solid cell until it returns `false`.
    fn visit_overlaps(&self, aabb: &Aabb, mut visit: impl FnMut(Point3<i32>) -> bool) {
        if aabb.is_degenerate() {
            return;
        }

        let (xs, ys, zs) = (aabb.cell_range(0), aabb.cell_range(1), aabb.cell_range(2));
        for y in ys {
            for x in xs.clone() {
                for z in zs.clone() {
                    let cell = Point3::new(x, y, z);
                    if self.is_solid(cell) && !visit(cell) {
                        return;
                    }
                }
            }
        }
    }
}
