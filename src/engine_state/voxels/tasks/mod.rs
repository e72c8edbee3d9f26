//! # Voxel Task System
//!
//! Tasks related to voxel world generation. They run on the task manager's
//! workers so streaming never stalls the tick.

pub mod chunk_generation_task;
