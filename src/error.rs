//! Error types for the simulation core.
//!
//! Everything here is an input-validation failure reported before the frame
//! loop mutates any state. Degenerate geometry inside the loop (coincident
//! centers, zero-length joint axes) is recovered locally by skipping that
//! resolution for the frame and never surfaces as an error.

use thiserror::Error;

/// Errors produced by simulation setup and execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A run was started with no registered bodies.
    #[error("cannot run a simulation with no bodies")]
    NoBodies,

    /// A joint referenced a body index outside the registered range.
    #[error("joint references body index {index} but only {count} bodies are registered")]
    InvalidJointIndex { index: usize, count: usize },

    /// A joint referenced the same body on both sides.
    #[error("joint must connect two distinct bodies (both sides are index {0})")]
    JointBodiesEqual(usize),

    /// A handle captured before a reset was used afterwards.
    #[error("body handle is stale (the simulation was reset)")]
    StaleBody,

    /// A settings value was outside its accepted range.
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting {
        key: &'static str,
        reason: &'static str,
    },
}

/// Convenient result alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
