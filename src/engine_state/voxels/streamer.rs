//! # World Streamer
//!
//! Keeps the set of resident chunks equal to a cube of chunk coordinates around
//! a focal point (normally the player).
//!
//! Every `update` computes the target cube (Chebyshev distance at most `radius`
//! from the focal chunk), evicts resident chunks outside it, and then brings in
//! missing chunks nearest-first. With no background workers the missing chunks
//! are generated inline, so the resident set equals the target as soon as
//! `update` returns. With workers, generation requests go to the task manager
//! and finished chunks are published by `poll`, but only if their coordinate is
//! still in the target at that point.

use std::collections::HashSet;

use cgmath::Point3;

use crate::engine_state::task_management::{
    task::{ResultTally, TaskContext},
    TaskManager,
};

use super::coords::{chunk_distance_squared, world_to_chunk};
use super::store::{EnsureOutcome, VoxelStore};
use super::tasks::chunk_generation_task::ChunkGenerationTask;

/// What one `update` or `poll` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamReport {
    /// Chunks evicted because they left the target cube
    pub evicted: usize,
    /// Chunks generated inline
    pub generated: usize,
    /// Generation requests handed to background workers
    pub requested: usize,
    /// Background chunks made resident
    pub published: usize,
    /// Background chunks thrown away as no longer wanted
    pub discarded: usize,
    /// Chunks that could not be made resident this time
    pub failed: usize,
}

impl StreamReport {
    /// `true` when nothing was loaded, unloaded, requested or received.
    pub fn is_quiet(&self) -> bool {
        *self == StreamReport::default()
    }

    fn absorb(&mut self, tally: ResultTally) {
        self.published += tally.published;
        self.discarded += tally.discarded;
        self.failed += tally.failed;
    }
}

/// Drives the chunk lifecycle around a moving focal point.
pub struct WorldStreamer {
    radius: i32,
    center: Option<Point3<i32>>,
    target: HashSet<Point3<i32>>,
    pending: HashSet<Point3<i32>>,
    task_manager: Option<TaskManager>,
}

impl WorldStreamer {
    /// Creates a streamer that generates chunks inline.
    pub fn new(radius: i32) -> Self {
        WorldStreamer {
            radius: radius.max(0),
            center: None,
            target: HashSet::new(),
            pending: HashSet::new(),
            task_manager: None,
        }
    }

    /// Creates a streamer that generates chunks on `workers` background threads.
    /// Zero workers falls back to inline generation.
    pub fn with_workers(radius: i32, workers: usize) -> Self {
        let mut streamer = WorldStreamer::new(radius);
        if workers > 0 {
            streamer.task_manager = Some(TaskManager::new(workers));
        }
        streamer
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Focal chunk of the last update, if any.
    pub fn center(&self) -> Option<Point3<i32>> {
        self.center
    }

    /// Chunk coordinates that should be resident.
    pub fn target_positions(&self) -> &HashSet<Point3<i32>> {
        &self.target
    }

    /// Number of background generation requests not yet returned.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether chunk generation currently runs on background workers.
    pub fn is_background(&self) -> bool {
        self.task_manager
            .as_ref()
            .is_some_and(|manager| manager.live_workers() > 0)
    }

    /// Streams the world around `focal`.
    ///
    /// # Arguments
    /// * `focal` - World-space focal position
    /// * `store` - The store whose resident set is brought in line with the target
    ///
    /// # Returns
    /// What was evicted, generated or requested.
    pub fn update(&mut self, focal: Point3<f32>, store: &mut VoxelStore) -> StreamReport {
        let center = world_to_chunk(focal);
        if self.center != Some(center) {
            if let Some(previous) = self.center {
                log::debug!("Focal chunk moved {:?} -> {:?}", previous, center);
            }
            self.center = Some(center);
            self.target = Self::target_cube(center, self.radius);
        }

        let mut report = StreamReport::default();

        let stale: Vec<_> = store
            .resident_positions()
            .filter(|position| !self.target.contains(position))
            .collect();
        for position in stale {
            if store.evict(position) {
                report.evicted += 1;
            }
        }

        let mut missing: Vec<_> = self
            .target
            .iter()
            .copied()
            .filter(|position| !store.is_resident(*position) && !self.pending.contains(position))
            .collect();
        missing.sort_by_key(|position| {
            (
                chunk_distance_squared(*position, center),
                position.x,
                position.y,
                position.z,
            )
        });

        if self.is_background() {
            self.request(missing, store, &mut report);
        } else {
            Self::generate_inline(missing, store, &mut report);
        }

        if !report.is_quiet() {
            log::debug!("Stream update around {:?}: {:?}", center, report);
        }
        report
    }

    /// Publishes finished background chunks that are still wanted.
    ///
    /// A no-op in inline mode.
    pub fn poll(&mut self, store: &mut VoxelStore) -> StreamReport {
        let mut report = StreamReport::default();
        let Some(manager) = self.task_manager.as_mut() else {
            return report;
        };

        let mut context = TaskContext::new(store, &self.target, &mut self.pending);
        manager.process_completed_tasks(&mut context);
        report.absorb(context.tally);
        manager.process_queued_tasks();

        if manager.live_workers() == 0 && !self.pending.is_empty() {
            log::warn!(
                "All generation workers are gone; {} chunks will be generated inline",
                self.pending.len()
            );
            self.pending.clear();
        }
        report
    }

    fn generate_inline(
        missing: Vec<Point3<i32>>,
        store: &mut VoxelStore,
        report: &mut StreamReport,
    ) {
        let total = missing.len();
        for (done, position) in missing.into_iter().enumerate() {
            match store.ensure_chunk(position) {
                Ok(EnsureOutcome::Generated) => report.generated += 1,
                Ok(EnsureOutcome::AlreadyResident) => {}
                Err(err) => {
                    // Everything further out would hit the same limit.
                    report.failed += total - done;
                    log::warn!("{}; {} chunks deferred to the next update", err, total - done);
                    break;
                }
            }
        }
    }

    fn request(&mut self, missing: Vec<Point3<i32>>, store: &VoxelStore, report: &mut StreamReport) {
        let Some(manager) = self.task_manager.as_mut() else {
            return;
        };
        for position in missing {
            manager.publish_task(Box::new(ChunkGenerationTask::new(
                store.generator().clone(),
                position,
                store.seed(),
            )));
            self.pending.insert(position);
            report.requested += 1;
        }
    }

    fn target_cube(center: Point3<i32>, radius: i32) -> HashSet<Point3<i32>> {
        let mut target = HashSet::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    target.insert(Point3::new(center.x + dx, center.y + dy, center.z + dz));
                }
            }
        }
        target
    }
}
