//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the axis each one
//! is perpendicular to.

/// Represents the six possible faces of a voxel block.
///
/// Each variant carries a fixed integer value. The order is:
/// [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in discriminant order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Faces in the order ties are broken when pushing a body out of terrain:
    /// up first, then down, then the horizontal axes.
    pub fn push_out_order() -> [BlockSide; 6] {
        [
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Index of the axis this face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(self) -> usize {
        match self {
            BlockSide::LEFT | BlockSide::RIGHT => 0,
            BlockSide::BOTTOM | BlockSide::TOP => 1,
            BlockSide::FRONT | BlockSide::BACK => 2,
        }
    }

    /// `1.0` if the face points along the positive axis, `-1.0` otherwise.
    pub fn sign(self) -> f32 {
        match self {
            BlockSide::RIGHT | BlockSide::TOP | BlockSide::FRONT => 1.0,
            BlockSide::LEFT | BlockSide::BOTTOM | BlockSide::BACK => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_axis_has_one_face_per_direction() {
        for axis in 0..3 {
            let signs: Vec<f32> = BlockSide::all()
                .into_iter()
                .filter(|side| side.axis() == axis)
                .map(BlockSide::sign)
                .collect();
            assert_eq!(signs.len(), 2);
            assert_eq!(signs[0] + signs[1], 0.0);
        }
    }

    #[test]
    fn test_push_out_order_prefers_up() {
        assert_eq!(BlockSide::push_out_order()[0], BlockSide::TOP);
        assert_eq!(BlockSide::push_out_order().len(), BlockSide::all().len());
    }
}
