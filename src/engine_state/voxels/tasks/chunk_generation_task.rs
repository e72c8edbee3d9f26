//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which generates one chunk on
//! a worker thread. It is scheduled by the streamer in background mode for every
//! coordinate that enters the streaming radius.

use std::sync::Arc;

use cgmath::Point3;

use crate::engine_state::{
    task_management::task::{Task, TaskContext, TaskResult},
    voxels::{chunk::Chunk, generator::TerrainGenerator},
};

/// A task that generates chunk data on a worker thread.
///
/// The task only runs the pure generator. The finished chunk travels back in
/// a [`ChunkGenerationTaskResult`] and is published on the tick thread.
pub struct ChunkGenerationTask {
    /// Shared, immutable generator
    generator: Arc<TerrainGenerator>,
    /// The position of the chunk to generate (in chunk coordinates)
    position: Point3<i32>,
    /// World seed
    seed: u32,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The generator shared with the store
    /// * `position` - The chunk coordinates of the chunk to generate
    /// * `seed` - The world seed
    pub fn new(generator: Arc<TerrainGenerator>, position: Point3<i32>, seed: u32) -> Self {
        ChunkGenerationTask {
            generator,
            position,
            seed,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkGenerationTaskResult {
            chunk: self.generator.generate(self.position, self.seed),
        })
    }
}

/// The result of a chunk generation task.
pub struct ChunkGenerationTaskResult {
    /// The generated chunk
    chunk: Chunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Publishes the chunk if its coordinate is still wanted.
    ///
    /// Chunks for coordinates that left the streaming radius while the task was
    /// running are discarded. A publish that fails (for example on an exhausted
    /// budget) leaves the coordinate unresident and no longer pending, so the
    /// next streaming update requests it again.
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task + Send>> {
        let position = self.chunk.position;
        context.pending.remove(&position);

        if !context.wanted.contains(&position) {
            log::debug!("Discarding stale chunk {:?}", position);
            context.tally.discarded += 1;
            return Vec::new();
        }

        match context.store.publish(self.chunk) {
            Ok(true) => context.tally.published += 1,
            Ok(false) => {}
            Err(err) => {
                log::warn!("{}", err);
                context.tally.failed += 1;
            }
        }

        Vec::new()
    }
}
