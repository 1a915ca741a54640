//! # cradle-db
//!
//! libSQL persistence for Cradle: accounts, child profiles, and vaccination
//! records, plus the vaccination record reconciler that sits on top of them.
//!
//! The store treats each (child, disease, dose) tuple as an independently
//! lockable unit: record writes go through a single `INSERT .. ON CONFLICT`
//! upsert against the tuple's UNIQUE constraint, so concurrent submissions
//! for different tuples never block each other and same-tuple submissions
//! serialize at the database.

pub mod error;
pub mod helpers;
mod migrations;
pub mod reconciler;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Cradle state operations.
///
/// Wraps a libSQL database and connection, and provides prefixed ID
/// generation. Repository methods live on the service layer.
pub struct CradleDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CradleDb {
    /// Open a local-only database at the given path (or `":memory:"`).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let cradle_db = Self { db, conn };
        cradle_db.run_migrations().await?;
        Ok(cradle_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"vac-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
