//! # World Module
//!
//! This module provides the `World` struct, the host-facing entry point to the
//! voxel data. It owns the [`VoxelStore`] and the [`WorldStreamer`] and exposes
//! the handful of calls the rest of the engine needs: stream around a focal
//! point, read and write blocks, and hand out a collision view for physics.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks inside the streaming radius are
//! kept in memory, so the world is effectively unbounded while memory use
//! stays proportional to the radius.

use std::sync::Arc;

use cgmath::Point3;

use crate::config::WorldConfig;
use crate::engine_state::physics::collision::CollisionField;
use crate::error::EngineResult;

use super::block::Block;
use super::generator::TerrainGenerator;
use super::store::VoxelStore;
use super::streamer::{StreamReport, WorldStreamer};

/// Represents a voxel world composed of streamed chunks.
pub struct World {
    store: VoxelStore,
    streamer: WorldStreamer,
}

impl World {
    /// Creates a new, empty world from its configuration.
    ///
    /// No chunk is resident until the first `update`.
    pub fn new(config: &WorldConfig) -> Self {
        let generator = Arc::new(TerrainGenerator::new(config.generation.clone()));
        let store = VoxelStore::new(generator, config.seed)
            .with_budget(config.max_resident_chunks)
            .with_edit_journal(config.retain_edits);
        let streamer = WorldStreamer::with_workers(config.stream_radius, config.background_workers);

        log::info!(
            "World created (seed {}, radius {}, {} generation workers)",
            config.seed,
            config.stream_radius,
            config.background_workers
        );
        World { store, streamer }
    }

    /// Brings the resident chunks in line with the focal position.
    ///
    /// Finished background chunks are published first, then the streamer
    /// evicts and requests chunks for the new focal position.
    ///
    /// # Arguments
    /// * `focal` - The world-space focal position (usually the player)
    pub fn update(&mut self, focal: Point3<f32>) -> StreamReport {
        let polled = self.streamer.poll(&mut self.store);
        let mut report = self.streamer.update(focal, &mut self.store);
        report.published += polled.published;
        report.discarded += polled.discarded;
        report.failed += polled.failed;
        report
    }

    /// Reads the block at a lattice position. Cells outside resident chunks are air.
    pub fn get_block(&self, position: Point3<i32>) -> Block {
        self.store.get(position)
    }

    /// Writes a block at a lattice position.
    ///
    /// # Returns
    /// `EngineError::InvalidState` if the containing chunk is not resident.
    pub fn set_block(&mut self, position: Point3<i32>, block: Block) -> EngineResult<()> {
        self.store.set(position, block)
    }

    /// Read-only collision view over the resident chunks.
    pub fn collision_field(&self) -> CollisionField<'_> {
        CollisionField::new(&self.store)
    }

    pub fn is_chunk_loaded(&self, chunk_position: Point3<i32>) -> bool {
        self.store.is_resident(chunk_position)
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.store.resident_count()
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn streamer(&self) -> &WorldStreamer {
        &self.streamer
    }

    /// Logs residency and churn counters at info level.
    pub fn log_stats(&self) {
        let stats = self.store.stats();
        log::info!(
            "Chunks resident: {} ({} pending, {} solid voxels); generated {}, published {}, evicted {}, rejected {}",
            self.store.resident_count(),
            self.streamer.pending_count(),
            self.store.solid_voxel_count(),
            stats.generated,
            stats.published,
            stats.evicted,
            stats.rejected
        );
    }
}
