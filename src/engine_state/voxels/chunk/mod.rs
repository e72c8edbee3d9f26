//! # Chunk Module
//!
//! This module provides the `Chunk` struct for managing 16x16x16 blocks of
//! voxel data.
//!
//! ## Storage
//!
//! Each chunk keeps two views of its content:
//! - `blocks`: a dense vector with one `Block` per cell, so reads and writes are O(1)
//! - `solid_array`: a bit vector (1 bit per cell) marking which cells are solid
//!
//! Collision only ever asks "is this cell solid", which is answered from the bit
//! vector alone. Both views are updated together by `set_block_at`, the only
//! mutation entry point, so they can never disagree.
//!
//! Cells are laid out with X varying fastest, then Y, then Z.

use bitvec::prelude::BitVec;
use cgmath::Point3;

use super::block::block_type::BlockType;
use super::block::Block;
use super::coords::chunk_origin;

pub mod chunk_creation;

pub use chunk_creation::ChunkCreationIterator;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 16x16x16 collection of voxel blocks in the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,
    /// One block per cell.
    blocks: Vec<Block>,
    /// One bit per cell, set when the cell is solid.
    solid_array: BitVec,
    /// Number of set bits in `solid_array`.
    solid_count: usize,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: Point3<i32>) -> Self {
        Chunk {
            position,
            blocks: vec![Block::AIR; CHUNK_SIZE as usize],
            solid_array: BitVec::repeat(false, CHUNK_SIZE as usize),
            solid_count: 0,
        }
    }

    /// Creates a chunk with every cell set to `block_type`.
    pub fn filled(position: Point3<i32>, block_type: BlockType) -> Self {
        let solid = block_type.is_solid();
        Chunk {
            position,
            blocks: vec![Block::new(block_type); CHUNK_SIZE as usize],
            solid_array: BitVec::repeat(solid, CHUNK_SIZE as usize),
            solid_count: if solid { CHUNK_SIZE as usize } else { 0 },
        }
    }

    /// Flat index of a chunk-relative cell.
    #[inline]
    pub fn index_of(cx: usize, cy: usize, cz: usize) -> usize {
        cx + CHUNK_DIMENSION as usize * cy + CHUNK_PLANE_SIZE as usize * cz
    }

    /// Chunk-relative cell of a flat index. Inverse of [`Chunk::index_of`].
    #[inline]
    pub fn local_of(index: usize) -> Point3<usize> {
        let dimension = CHUNK_DIMENSION as usize;
        Point3::new(
            index % dimension,
            (index / dimension) % dimension,
            index / (dimension * dimension),
        )
    }

    /// Whether a chunk-relative coordinate lies inside the chunk.
    #[inline]
    pub fn in_bounds(local: Point3<usize>) -> bool {
        let dimension = CHUNK_DIMENSION as usize;
        local.x < dimension && local.y < dimension && local.z < dimension
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// Out-of-range coordinates read as air.
    pub fn get_block_at(&self, local: Point3<usize>) -> Block {
        if !Self::in_bounds(local) {
            return Block::AIR;
        }
        self.blocks[Self::index_of(local.x, local.y, local.z)]
    }

    /// Writes a block and keeps the solidity mask in step.
    ///
    /// # Returns
    /// The block previously stored at that cell, or `None` if the coordinate is
    /// outside the chunk.
    pub fn set_block_at(&mut self, local: Point3<usize>, block: Block) -> Option<Block> {
        if !Self::in_bounds(local) {
            return None;
        }
        let index = Self::index_of(local.x, local.y, local.z);
        let previous = self.blocks[index];
        let was_solid = self.solid_array[index];
        let is_solid = block.is_solid();

        self.blocks[index] = block;
        if was_solid != is_solid {
            self.solid_array.set(index, is_solid);
            if is_solid {
                self.solid_count += 1;
            } else {
                self.solid_count -= 1;
            }
        }
        Some(previous)
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    ///
    /// # Returns
    /// `true` if the block is solid, `false` if it's air or out of bounds.
    pub fn is_block_solid(&self, cx: usize, cy: usize, cz: usize) -> bool {
        if !Self::in_bounds(Point3::new(cx, cy, cz)) {
            return false;
        }
        self.solid_array[Self::index_of(cx, cy, cz)]
    }

    /// Number of solid cells in this chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_count
    }

    /// `true` when every cell is air.
    pub fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    /// Lattice coordinate of this chunk's minimum corner.
    pub fn origin(&self) -> Point3<i32> {
        chunk_origin(self.position)
    }

}
