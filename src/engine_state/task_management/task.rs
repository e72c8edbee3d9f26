//! # Task System Core Traits
//!
//! This module defines the building blocks of the task system, which runs
//! work on background threads and hands the results back to the tick thread.
//!
//! ## Core Components
//! - `Task`: A unit of work that can be executed on a worker thread
//! - `TaskResult`: The result of a completed task, applied on the tick thread
//! - `TaskContext`: The world state a result is allowed to touch
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the tick thread with a `TaskContext`
//! 5. The result can spawn follow-up tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the tick thread
//! - Tasks own everything they read; shared inputs are immutable and behind `Arc`

use std::collections::HashSet;

use cgmath::Point3;

use crate::engine_state::voxels::store::VoxelStore;

/// A unit of work that can be executed on a worker thread.
///
/// Tasks should be self-contained and own all the data they need. They must
/// never reach into the world directly; anything that changes world state is
/// deferred to the `TaskResult`.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// This runs on a background thread. Errors are handled internally and
    /// reported through the returned result.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be handled on the tick thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Applies the result on the tick thread.
    ///
    /// # Arguments
    /// * `context` - Mutable access to the store plus the streamer's bookkeeping
    ///
    /// # Returns
    /// Follow-up tasks to schedule (usually empty).
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task + Send>>;
}

/// Counters filled in while results are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultTally {
    /// Chunks that became resident
    pub published: usize,
    /// Chunks thrown away because their coordinate was no longer wanted
    pub discarded: usize,
    /// Chunks that could not be made resident
    pub failed: usize,
}

/// The state a task result may read and modify.
pub struct TaskContext<'a> {
    /// The store finished chunks are published into
    pub store: &'a mut VoxelStore,
    /// Chunk coordinates the streamer currently wants resident
    pub wanted: &'a HashSet<Point3<i32>>,
    /// Chunk coordinates with a generation request in flight
    pub pending: &'a mut HashSet<Point3<i32>>,
    /// What happened to the results handled so far
    pub tally: ResultTally,
}

impl<'a> TaskContext<'a> {
    pub fn new(
        store: &'a mut VoxelStore,
        wanted: &'a HashSet<Point3<i32>>,
        pending: &'a mut HashSet<Point3<i32>>,
    ) -> Self {
        TaskContext {
            store,
            wanted,
            pending,
            tally: ResultTally::default(),
        }
    }
}
