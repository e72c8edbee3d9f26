//! # Chunk Creation Module
//!
//! A builder that fills a chunk one cell at a time in storage order
//! (X fastest, then Y, then Z). Generators push block types in that order and
//! the builder keeps the dense block array and the solidity mask consistent.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{Chunk, CHUNK_SIZE};

/// A builder for populating chunks in storage order.
pub struct ChunkCreationIterator {
    /// The chunk coordinate of the chunk being created
    position: Point3<i32>,
    /// Blocks pushed so far
    blocks: Vec<Block>,
    /// Solidity bit for every pushed block
    solid_array: BitVec,
    /// Number of solid blocks pushed so far
    solid_count: usize,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given position.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            position,
            blocks: Vec::with_capacity(CHUNK_SIZE as usize),
            solid_array: BitVec::with_capacity(CHUNK_SIZE as usize),
            solid_count: 0,
        }
    }

    /// Number of cells pushed so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// `true` until the first block is pushed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Adds a block at the current cell and advances to the next one.
    ///
    /// Blocks pushed past the end of the chunk are ignored.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if self.blocks.len() >= CHUNK_SIZE as usize {
            log::warn!(
                "Chunk {:?} is already full, dropping extra {:?}",
                self.position,
                block_type
            );
            return;
        }

        let is_solid = block_type.is_solid();
        self.blocks.push(Block::new(block_type));
        self.solid_array.push(is_solid);
        if is_solid {
            self.solid_count += 1;
        }
    }

    /// Finalizes the chunk. Cells that were never pushed are air.
    pub fn return_chunk(mut self) -> Chunk {
        let remaining = CHUNK_SIZE as usize - self.blocks.len();
        self.blocks.extend(std::iter::repeat(Block::AIR).take(remaining));
        self.solid_array.resize(CHUNK_SIZE as usize, false);

        Chunk {
            position: self.position,
            blocks: self.blocks,
            solid_array: self.solid_array,
            solid_count: self.solid_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_order_is_x_then_y_then_z() {
        let mut cci = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        cci.push_block_type(BlockType::AIR);
        cci.push_block_type(BlockType::DIRT);
        let chunk = cci.return_chunk();

        assert!(!chunk.is_block_solid(0, 0, 0));
        assert!(chunk.is_block_solid(1, 0, 0));
        assert!(!chunk.is_block_solid(0, 1, 0));
        assert_eq!(chunk.solid_count(), 1);
    }

    #[test]
    fn test_partial_chunk_is_padded_with_air() {
        let mut cci = ChunkCreationIterator::new(Point3::new(2, 0, 0));
        for _ in 0..10 {
            cci.push_block_type(BlockType::STONE);
        }
        assert_eq!(cci.len(), 10);
        let chunk = cci.return_chunk();
        assert_eq!(chunk.solid_count(), 10);
        assert!(!chunk.is_block_solid(10, 0, 0));
        assert_eq!(chunk.position, Point3::new(2, 0, 0));
    }

    #[test]
    fn test_overfull_pushes_are_dropped() {
        let mut cci = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        for _ in 0..(CHUNK_SIZE + 5) {
            cci.push_block_type(BlockType::DIRT);
        }
        assert_eq!(cci.return_chunk().solid_count(), CHUNK_SIZE as usize);
    }
}
