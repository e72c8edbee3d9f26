//! # Engine Errors
//!
//! Error types shared by the voxel store, the streamer and configuration loading.
//!
//! Only contract violations and configuration problems are errors. Degenerate
//! input (a zero `dt`, an empty query box) is handled locally as a no-op, and a
//! failed chunk generation leaves the chunk unresident until the next streaming
//! update retries it.

use cgmath::Point3;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Main error type for the voxel sandbox.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A caller broke a store contract, e.g. wrote into a chunk that is not resident.
    #[error("invalid state at {position:?}: {reason}")]
    InvalidState {
        /// Lattice or chunk coordinate the operation targeted
        position: Point3<i32>,
        /// What went wrong
        reason: String,
    },

    /// A chunk could not be produced. The chunk stays unresident and reads as air.
    #[error("failed to generate chunk {position:?}: {reason}")]
    GenerationFailure {
        /// Chunk coordinate that could not be generated
        position: Point3<i32>,
        /// Why generation failed
        reason: String,
    },

    /// A configuration value is out of range.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `EngineConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl EngineError {
    /// Convenience constructor for [`EngineError::InvalidState`].
    pub fn invalid_state(position: Point3<i32>, reason: impl Into<String>) -> Self {
        EngineError::InvalidState {
            position,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`EngineError::GenerationFailure`].
    pub fn generation_failure(position: Point3<i32>, reason: impl Into<String>) -> Self {
        EngineError::GenerationFailure {
            position,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`EngineError::InvalidConfig`].
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the streamer should simply retry the operation on a later update.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::GenerationFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_is_retryable() {
        let err = EngineError::generation_failure(Point3::new(1, 2, 3), "budget exhausted");
        assert!(err.is_retryable());
        assert!(err.to_string().contains("budget exhausted"));
    }

    #[test]
    fn test_invalid_state_is_not_retryable() {
        let err = EngineError::invalid_state(Point3::new(0, 0, 0), "chunk not resident");
        assert!(!err.is_retryable());
    }
}
