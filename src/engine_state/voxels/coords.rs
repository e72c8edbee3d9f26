//! Conversions between world space, lattice coordinates and chunk coordinates.
//!
//! Lattice coordinates address single voxels; the voxel at `(x, y, z)` fills the
//! unit cube `[x, x+1) × [y, y+1) × [z, z+1)`. Chunk coordinates use Euclidean
//! division so negative lattice coordinates land in the correct chunk.

use cgmath::Point3;

use super::chunk::CHUNK_DIMENSION;

/// Chunk coordinate containing a lattice cell.
#[inline]
pub fn lattice_to_chunk(position: Point3<i32>) -> Point3<i32> {
    Point3::new(
        position.x.div_euclid(CHUNK_DIMENSION),
        position.y.div_euclid(CHUNK_DIMENSION),
        position.z.div_euclid(CHUNK_DIMENSION),
    )
}

/// Position of a lattice cell inside its chunk, each component in `0..CHUNK_DIMENSION`.
#[inline]
pub fn lattice_to_local(position: Point3<i32>) -> Point3<usize> {
    Point3::new(
        position.x.rem_euclid(CHUNK_DIMENSION) as usize,
        position.y.rem_euclid(CHUNK_DIMENSION) as usize,
        position.z.rem_euclid(CHUNK_DIMENSION) as usize,
    )
}

/// Lattice coordinate of a chunk's minimum corner.
#[inline]
pub fn chunk_origin(chunk_position: Point3<i32>) -> Point3<i32> {
    Point3::new(
        chunk_position.x * CHUNK_DIMENSION,
        chunk_position.y * CHUNK_DIMENSION,
        chunk_position.z * CHUNK_DIMENSION,
    )
}

/// Lattice cell containing a world-space point.
#[inline]
pub fn world_to_lattice(position: Point3<f32>) -> Point3<i32> {
    Point3::new(
        position.x.floor() as i32,
        position.y.floor() as i32,
        position.z.floor() as i32,
    )
}

/// Chunk containing a world-space point, i.e. `floor(position / CHUNK_DIMENSION)`.
#[inline]
pub fn world_to_chunk(position: Point3<f32>) -> Point3<i32> {
    lattice_to_chunk(world_to_lattice(position))
}

/// Squared euclidean distance between two chunk coordinates.
#[inline]
pub fn chunk_distance_squared(a: Point3<i32>, b: Point3<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    let dz = (a.z - b.z) as i64;
    dx * dx + dy * dy + dz * dz
}
