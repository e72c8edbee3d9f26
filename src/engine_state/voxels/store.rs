//! # Voxel Store
//!
//! Sparse storage of resident chunks keyed by chunk coordinate.
//!
//! The store is the single owner of chunk data. It answers block queries for any
//! lattice position (cells in chunks that are not resident read as air), accepts
//! writes into resident chunks, and creates or drops chunks on request from the
//! streamer. Chunks produced on worker threads enter through [`VoxelStore::publish`]
//! as whole values, so a reader never sees a partially generated chunk.
//!
//! An optional resident budget bounds memory use. When it is exhausted new chunks
//! are refused with [`EngineError::GenerationFailure`] and the coordinate simply
//! stays unresident.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;

use crate::error::{EngineError, EngineResult};

use super::block::Block;
use super::chunk::Chunk;
use super::coords::{lattice_to_chunk, lattice_to_local};
use super::edit_journal::EditJournal;
use super::generator::TerrainGenerator;

/// What `ensure_chunk` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The chunk was generated and is now resident.
    Generated,
    /// The chunk was already resident; nothing changed.
    AlreadyResident,
}

/// Lifetime counters for chunk churn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Chunks generated inline by `ensure_chunk`
    pub generated: u64,
    /// Chunks inserted by `publish`
    pub published: u64,
    /// Chunks removed by `evict`
    pub evicted: u64,
    /// Chunks refused because the resident budget was exhausted
    pub rejected: u64,
}

/// Owns every resident chunk.
pub struct VoxelStore {
    chunks: HashMap<Point3<i32>, Chunk>,
    generator: Arc<TerrainGenerator>,
    seed: u32,
    max_resident_chunks: Option<usize>,
    journal: Option<EditJournal>,
    stats: StoreStats,
}

impl VoxelStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `generator` - Generator used by `ensure_chunk`, shared with background workers
    /// * `seed` - World seed passed to every generation call
    pub fn new(generator: Arc<TerrainGenerator>, seed: u32) -> Self {
        VoxelStore {
            chunks: HashMap::new(),
            generator,
            seed,
            max_resident_chunks: None,
            journal: None,
            stats: StoreStats::default(),
        }
    }

    /// Limits the number of resident chunks. `None` means unbounded.
    pub fn with_budget(mut self, max_resident_chunks: Option<usize>) -> Self {
        self.max_resident_chunks = max_resident_chunks;
        self
    }

    /// Turns the edit journal on or off.
    pub fn with_edit_journal(mut self, retain_edits: bool) -> Self {
        self.journal = retain_edits.then(EditJournal::new);
        self
    }

    /// Reads the block at a lattice position. Non-resident cells are air.
    pub fn get(&self, position: Point3<i32>) -> Block {
        match self.chunks.get(&lattice_to_chunk(position)) {
            Some(chunk) => chunk.get_block_at(lattice_to_local(position)),
            None => Block::AIR,
        }
    }

    /// Solidity of the cell at a lattice position.
    #[inline]
    pub fn is_solid(&self, position: Point3<i32>) -> bool {
        let Some(chunk) = self.chunks.get(&lattice_to_chunk(position)) else {
            return false;
        };
        let local = lattice_to_local(position);
        chunk.is_block_solid(local.x, local.y, local.z)
    }

    /// Writes a block at a lattice position.
    ///
    /// # Returns
    /// `EngineError::InvalidState` if the containing chunk is not resident. The
    /// write is never dropped silently.
    pub fn set(&mut self, position: Point3<i32>, block: Block) -> EngineResult<()> {
        let chunk_position = lattice_to_chunk(position);
        let Some(chunk) = self.chunks.get_mut(&chunk_position) else {
            return Err(EngineError::invalid_state(
                position,
                format!("chunk {:?} is not resident", chunk_position),
            ));
        };

        let local = lattice_to_local(position);
        chunk.set_block_at(local, block);
        if let Some(journal) = self.journal.as_mut() {
            journal.record(chunk_position, local, block);
        }
        Ok(())
    }

    /// Makes the chunk at `chunk_position` resident, generating it if needed.
    pub fn ensure_chunk(&mut self, chunk_position: Point3<i32>) -> EngineResult<EnsureOutcome> {
        if self.chunks.contains_key(&chunk_position) {
            return Ok(EnsureOutcome::AlreadyResident);
        }
        self.check_budget(chunk_position)?;

        let chunk = self.generator.generate(chunk_position, self.seed);
        self.insert(chunk);
        self.stats.generated += 1;
        log::debug!("Generated chunk {:?}", chunk_position);
        Ok(EnsureOutcome::Generated)
    }

    /// Inserts a chunk produced elsewhere.
    ///
    /// # Returns
    /// `Ok(true)` if the chunk became resident, `Ok(false)` if the coordinate was
    /// already resident (the incoming chunk is dropped).
    pub fn publish(&mut self, chunk: Chunk) -> EngineResult<bool> {
        if self.chunks.contains_key(&chunk.position) {
            return Ok(false);
        }
        self.check_budget(chunk.position)?;

        let chunk_position = chunk.position;
        self.insert(chunk);
        self.stats.published += 1;
        log::debug!("Published chunk {:?}", chunk_position);
        Ok(true)
    }

    /// Removes a chunk and frees its storage.
    ///
    /// # Returns
    /// `true` if the chunk was resident.
    pub fn evict(&mut self, chunk_position: Point3<i32>) -> bool {
        if self.chunks.remove(&chunk_position).is_none() {
            return false;
        }
        self.stats.evicted += 1;
        log::debug!("Evicted chunk {:?}", chunk_position);
        true
    }

    pub fn is_resident(&self, chunk_position: Point3<i32>) -> bool {
        self.chunks.contains_key(&chunk_position)
    }

    /// Coordinates of every resident chunk, in no particular order.
    pub fn resident_positions(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.chunks.keys().copied()
    }

    pub fn resident_count(&self) -> usize {
        self.chunks.len()
    }

    /// Borrow a resident chunk.
    pub fn chunk(&self, chunk_position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&chunk_position)
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Total number of solid cells across all resident chunks.
    pub fn solid_voxel_count(&self) -> usize {
        self.chunks.values().map(Chunk::solid_count).sum()
    }

    pub fn generator(&self) -> &Arc<TerrainGenerator> {
        &self.generator
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn journal(&self) -> Option<&EditJournal> {
        self.journal.as_ref()
    }

    fn check_budget(&mut self, chunk_position: Point3<i32>) -> EngineResult<()> {
        match self.max_resident_chunks {
            Some(max) if self.chunks.len() >= max => {
                self.stats.rejected += 1;
                Err(EngineError::generation_failure(
                    chunk_position,
                    format!("resident chunk budget of {} exhausted", max),
                ))
            }
            _ => Ok(()),
        }
    }

    fn insert(&mut self, mut chunk: Chunk) {
        if let Some(journal) = self.journal.as_ref() {
            journal.apply(&mut chunk);
        }
        self.chunks.insert(chunk.position, chunk);
    }
}
