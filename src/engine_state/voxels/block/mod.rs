//! # Block Module
//!
//! This module provides the voxel value stored at every lattice cell: a compact
//! block type id. It also defines the six block faces, which physics uses as the
//! candidate directions when pushing a body out of solid terrain.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel in the world.
///
/// This is a lightweight structure that stores only the block type id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// The empty voxel. Every non-resident cell reads as this.
    pub const AIR: Block = Block { block_type: 0 };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes the stored id into a `BlockType`.
    pub fn block_type(&self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type)
    }

    /// Whether this voxel blocks movement.
    pub fn is_solid(&self) -> bool {
        self.block_type().is_solid()
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

impl From<BlockType> for Block {
    fn from(block_type: BlockType) -> Self {
        Block::new(block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_constant_matches_block_type() {
        assert_eq!(Block::AIR, Block::new(BlockType::AIR));
        assert_eq!(Block::default(), Block::AIR);
        assert!(!Block::AIR.is_solid());
        assert!(Block::from(BlockType::GRASS).is_solid());
    }
}
