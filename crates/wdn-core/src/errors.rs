//! Cross-cutting error types for Warden.
//!
//! This module defines errors that can originate from any crate in the system.
//! Domain-specific errors (e.g., `DatabaseError`, `ConfigError`) are defined in
//! their respective crates; CLI-level convergence happens in `wdn-cli` via
//! `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Warden crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// A derived trait dimension fell outside the [1,7] bound.
    ///
    /// This is a programming-logic bug in a trait source, never a user-facing
    /// error. It must not be clamped away — clamping would mask deriver bugs.
    #[error("Invariant violation: trait {dimension} out of range [1,7]: {value}")]
    InvariantViolation { dimension: &'static str, value: i64 },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
