//! ID prefix constants for all Cradle entities.
//!
//! IDs are `"{prefix}-{8 hex chars}"`, generated by the database layer via
//! `randomblob(4)`. Keeping the prefixes here lets every crate format and
//! recognize IDs without touching the database crate.

pub const PREFIX_ACCOUNT: &str = "acc";
pub const PREFIX_CHILD: &str = "chd";
pub const PREFIX_RECORD: &str = "vac";

/// All known prefixes, for exhaustive ID-generation tests.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_ACCOUNT, PREFIX_CHILD, PREFIX_RECORD];
