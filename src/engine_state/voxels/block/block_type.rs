//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides conversion from the compact on-chunk representation and the
//! solidity rule used by collision.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the values stored in each chunk, so the order of the
/// variants is part of the chunk format. The `FromPrimitive` derive allows
/// conversion back from the stored integer.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum BlockType {
    /// Empty space. The only non-solid block.
    AIR,

    /// A basic dirt block found below the surface.
    DIRT,

    /// Grass-topped surface block.
    GRASS,

    /// Tree trunk block.
    WOOD,

    /// Plain white block, used for tests and markers.
    WHITE,

    /// Bulk underground block.
    STONE,

    /// Surface block at and below the shoreline.
    SAND,

    /// Coal ore embedded in stone.
    COAL_ORE,

    /// Iron ore embedded in stone.
    IRON_ORE,

    /// Indestructible floor of the world.
    BEDROCK,
}

impl BlockType {
    /// Converts a stored `BlockTypeSize` back to a `BlockType`.
    ///
    /// Unknown ids decode as `WHITE` so a corrupt value still collides like a
    /// solid block instead of opening a hole in the terrain.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        BlockType::from_u8(btype).unwrap_or(BlockType::WHITE)
    }

    /// Whether a body can pass through this block.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }
}
