//! Cross-cutting error types for Cradle.
//!
//! This module defines errors that can originate from any crate in the system.
//! Domain-specific errors (e.g., `DatabaseError`, `VaccinationError`,
//! `ReferenceError`) are defined in their respective crates.

use thiserror::Error;

/// Errors that can be raised by any Cradle crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
