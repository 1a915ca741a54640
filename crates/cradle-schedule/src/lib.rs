//! # cradle-schedule
//!
//! The immunization reference table and the schedule generator.
//!
//! The reference table is immutable configuration: which diseases exist, the
//! dose series each one declares (with birth-relative month offsets), whether
//! the vaccine is optional, and the minimum-interval overrides between doses.
//! It is loaded once at process start — from the embedded default or from a
//! TOML override — and shared by reference into the generator and the
//! reconciler.
//!
//! The generator itself is a pure function: (date of birth, administered-dose
//! facts) → the complete chart, one entry per (disease, dose) in the table,
//! sorted by expected date. No I/O, no shared state, safe to call from any
//! number of in-flight requests.

pub mod dates;
pub mod generator;
pub mod reference;

pub use generator::{generate_chart, next_due};
pub use reference::{DiseaseSchedule, ImmunizationReference, ReferenceError, ScheduledDose};
