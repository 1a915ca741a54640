//! Service layer tying the database to the immunization reference table.
//!
//! `CradleService` wraps `CradleDb` (raw database access), the immutable
//! `ImmunizationReference`, and the reminder defaults applied to new records.
//! All repo and reconciler methods are implemented as `impl CradleService`.

use cradle_config::{CradleConfig, ReminderConfig};
use cradle_schedule::ImmunizationReference;

use crate::CradleDb;
use crate::error::DatabaseError;

/// Orchestrates vaccination state: repos for accounts, children, and records,
/// plus the reconciler workflow on top of them.
///
/// The reference table is loaded once and shared by reference into the
/// schedule generator; nothing here mutates it.
pub struct CradleService {
    db: CradleDb,
    reference: ImmunizationReference,
    reminders: ReminderConfig,
}

impl CradleService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    /// * `reference` — The immunization reference table to schedule against.
    /// * `reminders` — Defaults stamped onto newly created records.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(
        db_path: &str,
        reference: ImmunizationReference,
        reminders: ReminderConfig,
    ) -> Result<Self, DatabaseError> {
        let db = CradleDb::open_local(db_path).await?;
        tracing::info!(path = db_path, "cradle service opened");
        Ok(Self {
            db,
            reference,
            reminders,
        })
    }

    /// Create a service from layered configuration: opens the configured
    /// database and loads the reference table (the embedded default, or the
    /// configured override file).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the
    /// reference table fails to load or validate.
    pub async fn from_config(config: &CradleConfig) -> Result<Self, DatabaseError> {
        let reference = match &config.reference.table_path {
            Some(path) => ImmunizationReference::from_path(path),
            None => ImmunizationReference::load_default(),
        }
        .map_err(|e| DatabaseError::Other(e.into()))?;

        Self::new_local(&config.database.path, reference, config.reminders.clone()).await
    }

    /// Create from an existing `CradleDb` (for testing).
    #[must_use]
    pub fn from_db(
        db: CradleDb,
        reference: ImmunizationReference,
        reminders: ReminderConfig,
    ) -> Self {
        Self {
            db,
            reference,
            reminders,
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &CradleDb {
        &self.db
    }

    /// Access the immunization reference table.
    #[must_use]
    pub const fn reference(&self) -> &ImmunizationReference {
        &self.reference
    }

    /// Reminder defaults applied to newly created records.
    #[must_use]
    pub const fn reminder_defaults(&self) -> &ReminderConfig {
        &self.reminders
    }
}
