//! Error types for the Strand simulator.
//!
//! All crates return `StrandResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Strand simulator.
#[derive(Debug, Error)]
pub enum StrandError {
    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Collider descriptor is malformed (negative radius, zero scale, NaN).
    #[error("Invalid collider: {0}")]
    InvalidCollider(String),

    /// A node index was outside the cable.
    #[error("Node index {index} out of range (node count: {count})")]
    NodeOutOfRange {
        index: usize,
        count: usize,
    },

    /// Scheduler lifecycle misuse (starting twice, restarting after stop).
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, StrandError>`.
pub type StrandResult<T> = Result<T, StrandError>;
