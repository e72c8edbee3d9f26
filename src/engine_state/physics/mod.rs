//! # Physics
//!
//! Box-versus-voxel collision for bodies moving through the streamed world.
//!
//! ## Key Components
//!
//! * `aabb` - Axis-aligned boxes with half-open overlap rules
//! * `body` - The `MovingBody` that gets simulated
//! * `collision` - `CollisionField`, the read-only solidity view over the store
//! * `integrator` - `PhysicsIntegrator`, which steps a body once per frame

pub mod aabb;
pub mod body;
pub mod collision;
pub mod integrator;
