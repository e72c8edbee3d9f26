//! Axis-aligned bounding boxes.
//!
//! Boxes are treated as half-open for overlap purposes: two boxes that only
//! share a face do not intersect. That makes a body resting exactly on a
//! voxel face collision-free.

use std::ops::Range;

use cgmath::{Point3, Vector3};

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// Box whose bottom face is centred on `position`.
    pub fn from_bottom_center(position: Point3<f32>, size: Vector3<f32>) -> Self {
        let half_x = size.x * 0.5;
        let half_z = size.z * 0.5;
        Aabb {
            min: Point3::new(position.x - half_x, position.y, position.z - half_z),
            max: Point3::new(position.x + half_x, position.y + size.y, position.z + half_z),
        }
    }

    /// The unit cube of a lattice cell.
    pub fn from_cell(cell: Point3<i32>) -> Self {
        let min = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
        Aabb {
            min,
            max: min + Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// `true` when the box has no volume along some axis.
    pub fn is_degenerate(&self) -> bool {
        !(self.min.x < self.max.x && self.min.y < self.max.y && self.min.z < self.max.z)
    }

    /// Positive-volume intersection test. Touching faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Self {
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// The box pulled in by `margin` on every side.
    pub fn shrunk(&self, margin: f32) -> Self {
        let inset = Vector3::new(margin, margin, margin);
        Aabb {
            min: self.min + inset,
            max: self.max - inset,
        }
    }

    /// The box pulled in by `margin` on the two axes other than `axis`.
    pub fn shrunk_across(&self, axis: usize, margin: f32) -> Self {
        let mut inset = Vector3::new(margin, margin, margin);
        inset[axis] = 0.0;
        Aabb {
            min: self.min + inset,
            max: self.max - inset,
        }
    }

    /// The box swept along one axis by `delta`.
    pub fn swept(&self, axis: usize, delta: f32) -> Self {
        let mut offset = Vector3::new(0.0, 0.0, 0.0);
        offset[axis] = delta;
        self.union(&self.translated(offset))
    }

    /// Lattice cells the box can touch along `axis`: `[floor(min), ceil(max))`.
    ///
    /// When `max` lies on an integer the range stops just below it, so a box
    /// touching a cell face never includes that cell.
    pub fn cell_range(&self, axis: usize) -> Range<i32> {
        self.min[axis].floor() as i32..self.max[axis].ceil() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let cell = Aabb::from_cell(Point3::new(0, 0, 0));
        let above = Aabb::new(Point3::new(0.2, 1.0, 0.2), Point3::new(0.8, 2.0, 0.8));
        assert!(!cell.intersects(&above));
        assert!(cell.intersects(&above.translated(Vector3::new(0.0, -0.01, 0.0))));
    }

    #[test]
    fn test_from_bottom_center() {
        let aabb = Aabb::from_bottom_center(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.5, 1.5, 1.0));
        assert_eq!(aabb.min, Point3::new(0.75, 2.0, 2.5));
        assert_eq!(aabb.max, Point3::new(1.25, 3.5, 3.5));
    }

    #[test]
    fn test_shrunk_across_keeps_the_moving_axis() {
        let aabb = Aabb::new(Point3::new(0.0, 1.0, 2.0), Point3::new(1.0, 3.0, 4.0));
        let narrowed = aabb.shrunk_across(1, 0.25);
        assert_eq!(narrowed.min, Point3::new(0.25, 1.0, 2.25));
        assert_eq!(narrowed.max, Point3::new(0.75, 3.0, 3.75));
    }

    #[test]
    fn test_cell_range_excludes_touched_face() {
        let aabb = Aabb::new(Point3::new(-0.5, 1.0, 0.0), Point3::new(0.5, 3.0, 1.5));
        assert_eq!(aabb.cell_range(0), -1..1);
        assert_eq!(aabb.cell_range(1), 1..3);
        assert_eq!(aabb.cell_range(2), 0..2);
    }

    #[test]
    fn test_degenerate() {
        let flat = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 1.0));
        assert!(flat.is_degenerate());
        assert!(!Aabb::from_cell(Point3::new(0, 0, 0)).is_degenerate());
    }

    #[test]
    fn test_swept_covers_both_ends() {
        let aabb = Aabb::from_cell(Point3::new(0, 0, 0)).swept(1, -2.5);
        assert_eq!(aabb.min, Point3::new(0.0, -2.5, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 1.0));
    }
}
