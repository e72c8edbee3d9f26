//! # Voxel World Core
//!
//! This module holds the voxel data of the world and everything that decides
//! which part of it lives in memory.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: The value of one lattice cell, and the six cube faces
//! * **Chunk**: A 16x16x16 array of blocks with a solidity bit mask
//! * **Generator**: Deterministic terrain generation from chunk coordinate and seed
//! * **Store**: The sparse map of resident chunks, the only owner of chunk data
//! * **Streamer**: Loads and unloads chunks around a focal point
//! * **World**: The facade the engine and the host talk to
//! * **Tasks**: Chunk generation on worker threads
//!
//! ## Data Flow
//!
//! 1. The host moves the focal point and calls `World::update`
//! 2. The streamer evicts chunks that left the radius
//! 3. Missing chunks are generated inline, or on workers and published later
//! 4. Physics reads solidity through a `CollisionField` over the store

pub mod block;
pub mod chunk;
pub mod coords;
pub mod edit_journal;
pub mod generator;
pub mod store;
pub mod streamer;
pub mod tasks;
pub mod world;
