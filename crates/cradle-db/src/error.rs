//! Database and reconciler error types for cradle-db.

use chrono::NaiveDate;
use thiserror::Error;

use cradle_core::enums::DoseType;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Validation and persistence failures from the vaccination reconciler.
///
/// Every variant is detected before the single upsert, except `Store`, which
/// is the upsert (or a read) failing. A rejected submission therefore never
/// leaves partial state, and each failure kind stays distinguishable to the
/// caller.
#[derive(Debug, Error)]
pub enum VaccinationError {
    /// A required request field was empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The child does not belong to the requesting user's account.
    #[error("Child {child_id} does not belong to user {user_id}")]
    Unauthorized { child_id: String, user_id: String },

    /// The dose type is not part of this vaccine's series (or the vaccine is
    /// unknown, in which case `accepted` is empty).
    #[error("Invalid dose '{dose_type}' for vaccine '{disease}'")]
    InvalidDose {
        disease: String,
        dose_type: DoseType,
        accepted: Vec<DoseType>,
    },

    /// An earlier dose in the series has not been completed.
    #[error("Cannot record '{dose_type}' for '{disease}': previous doses not completed: {missing:?}")]
    OrderingViolation {
        disease: String,
        dose_type: DoseType,
        missing: Vec<DoseType>,
    },

    /// The submitted date precedes the minimum interval after the previous dose.
    #[error("Dose '{dose_type}' for '{disease}' is too early; earliest allowed date is {earliest_allowed}")]
    IntervalViolation {
        disease: String,
        dose_type: DoseType,
        earliest_allowed: NaiveDate,
    },

    /// No child with the given ID exists.
    #[error("Child not found: {0}")]
    ChildNotFound(String),

    /// Underlying persistence failure.
    #[error(transparent)]
    Store(#[from] DatabaseError),
}
