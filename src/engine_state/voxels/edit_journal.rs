//! # Edit Journal
//!
//! Remembers every block written through the store so that edits survive a
//! chunk being evicted and regenerated later.
//!
//! Edits are keyed by chunk coordinate and flat cell index. Only the latest
//! write to a cell is kept.

use std::collections::{BTreeMap, HashMap};

use cgmath::Point3;

use super::block::Block;
use super::chunk::Chunk;

/// Per-chunk record of blocks written after generation.
#[derive(Debug, Default)]
pub struct EditJournal {
    edits: HashMap<Point3<i32>, BTreeMap<usize, Block>>,
}

impl EditJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        EditJournal::default()
    }

    /// Records that `block` was written at `local` inside chunk `chunk_position`.
    pub fn record(&mut self, chunk_position: Point3<i32>, local: Point3<usize>, block: Block) {
        let index = Chunk::index_of(local.x, local.y, local.z);
        self.edits
            .entry(chunk_position)
            .or_default()
            .insert(index, block);
    }

    /// Re-applies the journaled edits for `chunk` on top of its generated content.
    ///
    /// # Returns
    /// The number of cells rewritten.
    pub fn apply(&self, chunk: &mut Chunk) -> usize {
        let Some(edits) = self.edits.get(&chunk.position) else {
            return 0;
        };

        for (&index, &block) in edits {
            chunk.set_block_at(Chunk::local_of(index), block);
        }
        log::debug!(
            "Replayed {} journaled edits into chunk {:?}",
            edits.len(),
            chunk.position
        );
        edits.len()
    }

    /// Number of edited cells recorded for one chunk.
    pub fn edits_for(&self, chunk_position: Point3<i32>) -> usize {
        self.edits.get(&chunk_position).map_or(0, BTreeMap::len)
    }

    /// Total number of edited cells across all chunks.
    pub fn len(&self) -> usize {
        self.edits.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn test_latest_write_wins() {
        let mut journal = EditJournal::new();
        let chunk_position = Point3::new(0, 0, 0);
        let local = Point3::new(1, 2, 3);

        journal.record(chunk_position, local, Block::new(BlockType::DIRT));
        journal.record(chunk_position, local, Block::new(BlockType::WOOD));
        assert_eq!(journal.len(), 1);

        let mut chunk = Chunk::empty(chunk_position);
        assert_eq!(journal.apply(&mut chunk), 1);
        assert_eq!(chunk.get_block_at(local).block_type(), BlockType::WOOD);
        assert_eq!(chunk.solid_count(), 1);
    }

    #[test]
    fn test_apply_only_touches_matching_chunk() {
        let mut journal = EditJournal::new();
        journal.record(Point3::new(1, 0, 0), Point3::new(0, 0, 0), Block::AIR);

        let mut other = Chunk::filled(Point3::new(0, 0, 0), BlockType::STONE);
        assert_eq!(journal.apply(&mut other), 0);
        assert_eq!(other.solid_count(), crate::engine_state::voxels::chunk::CHUNK_SIZE as usize);
        assert_eq!(journal.edits_for(Point3::new(1, 0, 0)), 1);
        assert_eq!(journal.edits_for(Point3::new(0, 0, 0)), 0);
    }

    #[test]
    fn test_recorded_air_carves_generated_content() {
        let mut journal = EditJournal::new();
        let chunk_position = Point3::new(0, -1, 0);
        journal.record(chunk_position, Point3::new(8, 15, 8), Block::AIR);

        let mut chunk = Chunk::filled(chunk_position, BlockType::STONE);
        journal.apply(&mut chunk);
        assert!(!chunk.is_block_solid(8, 15, 8));
        assert!(!journal.is_empty());
    }
}
