//! Repository modules implementing CRUD operations for Cradle entities.
//!
//! Each module adds methods to `CradleService` via `impl CradleService` blocks.

pub mod account;
pub mod vaccination;
